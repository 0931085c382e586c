//! Fault injection for sinks.
//!
//! Provides a sink wrapper that simulates crashes at controlled points
//! so recovery behavior can be exercised deterministically.
//!
//! ## Test Strategy
//!
//! 1. **Crash mid-append** - the byte budget runs out inside a fragment,
//!    leaving a partial prefix behind
//! 2. **Crash between fragments** - a spanning record loses its tail
//! 3. **Crash on flush** - appended bytes survive but durability fails
//!
//! Reads keep working after a simulated crash: hand the wrapper (or its
//! inner sink) to a `LogReader` to see what a recovery pass would find.

use framelog_storage::{LogSink, SinkError, SinkResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A sink wrapper that can simulate crashes.
pub struct CrashingSink {
    inner: Box<dyn LogSink>,
    crash_after_bytes: AtomicUsize,
    bytes_written: AtomicUsize,
    crashed: AtomicBool,
    fail_on_flush: AtomicBool,
}

impl CrashingSink {
    /// Creates a new crashing sink wrapping an inner sink.
    pub fn new(inner: Box<dyn LogSink>) -> Self {
        Self {
            inner,
            crash_after_bytes: AtomicUsize::new(usize::MAX),
            bytes_written: AtomicUsize::new(0),
            crashed: AtomicBool::new(false),
            fail_on_flush: AtomicBool::new(false),
        }
    }

    /// Creates a crashing sink over a fresh in-memory sink.
    pub fn in_memory() -> Self {
        Self::new(Box::new(framelog_storage::MemorySink::new()))
    }

    /// Sets the sink to crash once the given number of bytes has been
    /// appended.
    ///
    /// An append that crosses the budget persists the partial prefix
    /// before failing, the same shape a torn OS write leaves behind.
    pub fn crash_after(&self, bytes: usize) {
        self.crash_after_bytes.store(bytes, Ordering::SeqCst);
    }

    /// Sets whether flush and sync should fail.
    pub fn set_fail_on_flush(&self, fail: bool) {
        self.fail_on_flush.store(fail, Ordering::SeqCst);
    }

    /// Resets the crash state.
    pub fn reset(&self) {
        self.crash_after_bytes.store(usize::MAX, Ordering::SeqCst);
        self.bytes_written.store(0, Ordering::SeqCst);
        self.crashed.store(false, Ordering::SeqCst);
        self.fail_on_flush.store(false, Ordering::SeqCst);
    }

    /// Returns whether the sink has crashed.
    pub fn has_crashed(&self) -> bool {
        self.crashed.load(Ordering::SeqCst)
    }

    /// Consumes the wrapper and returns the inner sink.
    pub fn into_inner(self) -> Box<dyn LogSink> {
        self.inner
    }
}

impl LogSink for CrashingSink {
    fn append(&mut self, bytes: &[u8]) -> SinkResult<u64> {
        let current = self.bytes_written.fetch_add(bytes.len(), Ordering::SeqCst);
        let crash_threshold = self.crash_after_bytes.load(Ordering::SeqCst);

        if current >= crash_threshold {
            self.crashed.store(true, Ordering::SeqCst);
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated crash during append",
            )));
        }

        // Check if this append will cross the crash threshold
        if current + bytes.len() > crash_threshold {
            self.crashed.store(true, Ordering::SeqCst);
            // Persist partial data up to the crash point
            let partial_len = crash_threshold - current;
            if partial_len > 0 {
                let _ = self.inner.append(&bytes[..partial_len]);
            }
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated crash during partial append",
            )));
        }

        self.inner.append(bytes)
    }

    fn flush(&mut self) -> SinkResult<()> {
        if self.fail_on_flush.load(Ordering::SeqCst) {
            self.crashed.store(true, Ordering::SeqCst);
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated crash during flush",
            )));
        }
        self.inner.flush()
    }

    fn sync(&mut self) -> SinkResult<()> {
        if self.fail_on_flush.load(Ordering::SeqCst) {
            self.crashed.store(true, Ordering::SeqCst);
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated crash during sync",
            )));
        }
        self.inner.sync()
    }

    fn size(&self) -> SinkResult<u64> {
        self.inner.size()
    }

    fn read_at(&self, offset: u64, len: usize) -> SinkResult<Vec<u8>> {
        self.inner.read_at(offset, len)
    }

    fn truncate(&mut self, new_size: u64) -> SinkResult<()> {
        self.inner.truncate(new_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelog_core::{LogReader, LogWriter, BLOCK_SIZE, HEADER_SIZE};

    #[test]
    fn normal_operation_passes_through() {
        let mut sink = CrashingSink::in_memory();

        let data = b"test data";
        let offset = sink.append(data).unwrap();
        sink.flush().unwrap();

        assert_eq!(sink.read_at(offset, data.len()).unwrap(), data);
        assert!(!sink.has_crashed());
    }

    #[test]
    fn append_past_the_budget_fails() {
        let mut sink = CrashingSink::in_memory();
        sink.crash_after(10);

        sink.append(&[1u8; 5]).unwrap();
        let result = sink.append(&[2u8; 10]);
        assert!(result.is_err());
        assert!(sink.has_crashed());
    }

    #[test]
    fn torn_append_keeps_the_partial_prefix() {
        let mut sink = CrashingSink::in_memory();
        sink.crash_after(8);

        assert!(sink.append(&[0xab; 12]).is_err());
        assert!(sink.has_crashed());
        assert_eq!(sink.size().unwrap(), 8);
        assert_eq!(sink.read_at(0, 8).unwrap(), vec![0xab; 8]);
    }

    #[test]
    fn flush_fails_when_asked() {
        let mut sink = CrashingSink::in_memory();
        sink.set_fail_on_flush(true);

        assert!(sink.flush().is_err());
        assert!(sink.has_crashed());
    }

    #[test]
    fn reset_clears_crash_state() {
        let mut sink = CrashingSink::in_memory();
        sink.crash_after(0);
        assert!(sink.append(b"x").is_err());

        sink.reset();
        assert!(!sink.has_crashed());
        sink.append(b"x").unwrap();
    }

    #[test]
    fn reader_recovers_records_appended_before_the_crash() {
        let sink = CrashingSink::in_memory();
        // Two whole records fit under the budget; the third is torn
        // 40 bytes into its payload.
        sink.crash_after(2 * (HEADER_SIZE + 100) + HEADER_SIZE + 40);

        let mut writer = LogWriter::new(sink);
        writer.append(&[1u8; 100]).unwrap();
        writer.append(&[2u8; 100]).unwrap();
        assert!(writer.append(&[3u8; 100]).is_err());

        let sink = writer.into_inner();
        assert!(sink.has_crashed());

        let mut reader = LogReader::new(sink.into_inner()).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap(), vec![1u8; 100]);
        assert_eq!(reader.read_record().unwrap().unwrap(), vec![2u8; 100]);
        assert_eq!(reader.read_record().unwrap(), None);
    }

    #[test]
    fn spanning_record_torn_mid_stream_is_dropped_on_recovery() {
        let sink = CrashingSink::in_memory();
        sink.crash_after(BLOCK_SIZE + 1000);

        let mut writer = LogWriter::new(sink);
        writer.append(b"intact").unwrap();
        let big = vec![7u8; BLOCK_SIZE * 2];
        assert!(writer.append(&big).is_err());

        let mut reader = LogReader::new(writer.into_inner().into_inner()).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap(), b"intact");
        assert_eq!(reader.read_record().unwrap(), None);
    }

    #[test]
    fn truncating_the_torn_tail_lets_writing_resume() {
        let record_len = (HEADER_SIZE + 4) as u64;
        let sink = CrashingSink::in_memory();
        // Two whole records fit; the third loses all but one payload byte.
        sink.crash_after(2 * (HEADER_SIZE + 4) + HEADER_SIZE + 1);

        let mut writer = LogWriter::new(sink);
        writer.append(b"keep").unwrap();
        writer.append(b"also").unwrap();
        assert!(writer.append(b"torn").is_err());
        // The cursor advances past the failed record even though the sink
        // holds only a torn prefix of it.
        assert_eq!(writer.block_offset(), 3 * (HEADER_SIZE + 4));

        let mut sink = writer.into_inner();
        sink.reset();

        // Recovery pass: find the end of the last complete record.
        let mut reader = LogReader::new(&mut sink).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap(), b"keep");
        assert_eq!(reader.read_record().unwrap().unwrap(), b"also");
        assert_eq!(reader.read_record().unwrap(), None);
        let valid_end = reader.last_record_offset().unwrap() + record_len;
        drop(reader);

        // Drop the torn tail and resume from the sink's real size.
        sink.truncate(valid_end).unwrap();
        let size = sink.size().unwrap();
        let mut writer = LogWriter::resume(sink, size);
        writer.append(b"fresh").unwrap();

        let mut reader = LogReader::new(writer.into_inner().into_inner()).unwrap();
        let records = reader.read_all().unwrap();
        assert_eq!(
            records,
            vec![b"keep".to_vec(), b"also".to_vec(), b"fresh".to_vec()]
        );
    }

    #[test]
    fn record_survives_when_only_the_flush_fails() {
        let sink = CrashingSink::in_memory();
        sink.set_fail_on_flush(true);

        let mut writer = LogWriter::new(sink);
        assert!(writer.append(b"durable enough").is_err());

        let mut reader = LogReader::new(writer.into_inner().into_inner()).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap(), b"durable enough");
    }
}
