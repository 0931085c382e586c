//! In-memory sink for testing.

use crate::error::{SinkError, SinkResult};
use crate::sink::LogSink;
use parking_lot::RwLock;

/// An in-memory sink.
///
/// This sink keeps all appended bytes in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral logs that do not need to survive the process
///
/// # Thread Safety
///
/// This sink is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use framelog_storage::{LogSink, MemorySink};
///
/// let mut sink = MemorySink::new();
/// let offset = sink.append(b"log bytes").unwrap();
/// assert_eq!(offset, 0);
/// assert_eq!(sink.size().unwrap(), 9);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    data: RwLock<Vec<u8>>,
}

impl MemorySink {
    /// Creates a new empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory sink with pre-existing contents.
    ///
    /// Useful for testing reopen and recovery scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Returns a copy of the full sink contents.
    ///
    /// Useful for asserting on the exact bytes a writer produced.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    /// Clears all data from the sink.
    pub fn clear(&mut self) {
        self.data.write().clear();
    }
}

impl LogSink for MemorySink {
    fn append(&mut self, new_data: &[u8]) -> SinkResult<u64> {
        let mut data = self.data.write();
        let offset = data.len() as u64;
        data.extend_from_slice(new_data);
        Ok(offset)
    }

    fn flush(&mut self) -> SinkResult<()> {
        // Nothing buffered in memory
        Ok(())
    }

    fn sync(&mut self) -> SinkResult<()> {
        // No metadata to sync
        Ok(())
    }

    fn size(&self) -> SinkResult<u64> {
        Ok(self.data.read().len() as u64)
    }

    fn read_at(&self, offset: u64, len: usize) -> SinkResult<Vec<u8>> {
        let data = self.data.read();
        let size = data.len() as u64;
        let offset_usize = offset as usize;
        let end = offset_usize.saturating_add(len);

        if offset > size || end > data.len() {
            return Err(SinkError::ReadPastEnd { offset, len, size });
        }

        Ok(data[offset_usize..end].to_vec())
    }

    fn truncate(&mut self, new_size: u64) -> SinkResult<()> {
        let mut data = self.data.write();
        let current_size = data.len() as u64;

        if new_size > current_size {
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "cannot truncate to size {} which is greater than current size {}",
                    new_size, current_size
                ),
            )));
        }

        data.truncate(new_size as usize);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let sink = MemorySink::new();
        assert_eq!(sink.size().unwrap(), 0);
        assert!(sink.data().is_empty());
    }

    #[test]
    fn memory_append_returns_offsets() {
        let mut sink = MemorySink::new();

        let offset1 = sink.append(b"hello").unwrap();
        assert_eq!(offset1, 0);

        let offset2 = sink.append(b" world").unwrap();
        assert_eq!(offset2, 5);

        assert_eq!(sink.size().unwrap(), 11);
    }

    #[test]
    fn memory_read_at_returns_appended_bytes() {
        let mut sink = MemorySink::new();
        sink.append(b"hello world").unwrap();

        let data = sink.read_at(0, 5).unwrap();
        assert_eq!(&data, b"hello");

        let data = sink.read_at(6, 5).unwrap();
        assert_eq!(&data, b"world");
    }

    #[test]
    fn memory_read_past_end_fails() {
        let mut sink = MemorySink::new();
        sink.append(b"hello").unwrap();

        let result = sink.read_at(10, 5);
        assert!(matches!(result, Err(SinkError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_read_extending_past_end_fails() {
        let mut sink = MemorySink::new();
        sink.append(b"hello").unwrap();

        let result = sink.read_at(3, 10);
        assert!(matches!(result, Err(SinkError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_empty_append_keeps_offset() {
        let mut sink = MemorySink::new();
        let offset = sink.append(b"").unwrap();
        assert_eq!(offset, 0);
        assert_eq!(sink.size().unwrap(), 0);
    }

    #[test]
    fn memory_zero_length_read() {
        let mut sink = MemorySink::new();
        sink.append(b"hello").unwrap();

        let data = sink.read_at(2, 0).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn memory_with_data_preloads() {
        let sink = MemorySink::with_data(b"preloaded".to_vec());
        assert_eq!(sink.size().unwrap(), 9);
        assert_eq!(sink.read_at(0, 9).unwrap(), b"preloaded");
    }

    #[test]
    fn memory_clear_empties_sink() {
        let mut sink = MemorySink::new();
        sink.append(b"some data").unwrap();
        sink.clear();
        assert_eq!(sink.size().unwrap(), 0);
    }

    #[test]
    fn memory_flush_and_sync_succeed() {
        let mut sink = MemorySink::new();
        sink.append(b"data").unwrap();
        assert!(sink.flush().is_ok());
        assert!(sink.sync().is_ok());
    }

    #[test]
    fn memory_truncate_partial() {
        let mut sink = MemorySink::new();
        sink.append(b"hello world").unwrap();

        sink.truncate(5).unwrap();
        assert_eq!(sink.size().unwrap(), 5);
        assert_eq!(sink.read_at(0, 5).unwrap(), b"hello");
    }

    #[test]
    fn memory_truncate_to_larger_size_fails() {
        let mut sink = MemorySink::new();
        sink.append(b"hello").unwrap();

        let result = sink.truncate(100);
        assert!(result.is_err());
    }

    #[test]
    fn memory_boxed_sink_dispatches() {
        let mut sink: Box<dyn LogSink> = Box::new(MemorySink::new());
        sink.append(b"boxed").unwrap();
        assert_eq!(sink.size().unwrap(), 5);
        assert_eq!(sink.read_at(0, 5).unwrap(), b"boxed");
    }

    #[test]
    fn memory_borrowed_sink_dispatches() {
        let mut sink = MemorySink::new();
        {
            let mut borrowed = &mut sink;
            borrowed.append(b"borrowed").unwrap();
        }
        assert_eq!(sink.size().unwrap(), 8);
    }
}
