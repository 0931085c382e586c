//! Append-only sink trait definition.

use crate::error::SinkResult;

/// A low-level append-only sink for log data.
///
/// Sinks are **opaque byte stores**. They provide simple operations for
/// appending, reading back, and flushing bytes. The log layer owns all
/// format interpretation - sinks do not understand blocks, record headers,
/// or checksums.
///
/// # Invariants
///
/// - `append` returns the offset where the data landed
/// - `read_at` returns exactly the bytes previously appended at that offset
/// - `flush` pushes buffered appends down to the underlying store
/// - Sinks must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::MemorySink`] - For testing and ephemeral logs
/// - [`super::FileSink`] - For persistent logs
pub trait LogSink: Send + Sync {
    /// Appends `data` to the end of the sink.
    ///
    /// Returns the offset where the data was written.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn append(&mut self, data: &[u8]) -> SinkResult<u64>;

    /// Flushes all pending appends to the underlying store.
    ///
    /// After this returns successfully, previously appended bytes are
    /// visible to readers of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> SinkResult<()>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// This is a stronger guarantee than `flush` - after it returns,
    /// appended data survives process and OS crashes, and store metadata
    /// (size, timestamps) is durable as well.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> SinkResult<()>;

    /// Returns the current size of the sink in bytes.
    ///
    /// This is the offset where the next `append` will write.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> SinkResult<u64>;

    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The offset is beyond the current size
    /// - The read would extend beyond the current size
    /// - An I/O error occurs
    fn read_at(&self, offset: u64, len: usize) -> SinkResult<Vec<u8>>;

    /// Truncates the sink to `new_size` bytes.
    ///
    /// This removes all data after the given offset. The log layer uses
    /// it to trim a torn tail found during recovery.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The truncation fails
    /// - `new_size` is greater than the current size
    fn truncate(&mut self, new_size: u64) -> SinkResult<()>;
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn append(&mut self, data: &[u8]) -> SinkResult<u64> {
        (**self).append(data)
    }

    fn flush(&mut self) -> SinkResult<()> {
        (**self).flush()
    }

    fn sync(&mut self) -> SinkResult<()> {
        (**self).sync()
    }

    fn size(&self) -> SinkResult<u64> {
        (**self).size()
    }

    fn read_at(&self, offset: u64, len: usize) -> SinkResult<Vec<u8>> {
        (**self).read_at(offset, len)
    }

    fn truncate(&mut self, new_size: u64) -> SinkResult<()> {
        (**self).truncate(new_size)
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn append(&mut self, data: &[u8]) -> SinkResult<u64> {
        (**self).append(data)
    }

    fn flush(&mut self) -> SinkResult<()> {
        (**self).flush()
    }

    fn sync(&mut self) -> SinkResult<()> {
        (**self).sync()
    }

    fn size(&self) -> SinkResult<u64> {
        (**self).size()
    }

    fn read_at(&self, offset: u64, len: usize) -> SinkResult<Vec<u8>> {
        (**self).read_at(offset, len)
    }

    fn truncate(&mut self, new_size: u64) -> SinkResult<()> {
        (**self).truncate(new_size)
    }
}
