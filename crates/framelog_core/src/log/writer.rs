//! Block-framed log writer.

use crate::error::{LogError, LogResult};
use crate::log::checksum;
use crate::log::format::{RecordKind, BLOCK_SIZE, HEADER_SIZE, MAX_RECORD_KIND};
use framelog_storage::LogSink;

/// Zero bytes used to fill block trailers.
const ZERO_TRAILER: [u8; HEADER_SIZE - 1] = [0; HEADER_SIZE - 1];

/// When the writer flushes the sink relative to record emission.
///
/// The framing format is identical under every policy; only the exposure
/// window for partially written data changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Flush after every physical record.
    ///
    /// Bounds the window of partially written data to a single physical
    /// record.
    #[default]
    EveryRecord,
    /// Flush once per [`LogWriter::append`] call, after its final fragment.
    EveryAppend,
    /// Never flush implicitly; durability is driven by explicit
    /// [`LogWriter::flush`] and [`LogWriter::sync`] calls.
    Manual,
}

/// Appends logical records to an append-only sink in the block-framed
/// format.
///
/// The writer owns a cursor tracking how many bytes of the current 32 KiB
/// block have been consumed, and splits each record into physical records so
/// that none crosses a block boundary (see the [module docs](crate::log) for
/// the format). Its only mutable state is that cursor and the sink handle;
/// it performs no reads, no retries, and no locking.
///
/// Sink appends are not assumed atomic across the header/payload pair.
/// Under the default [`FlushPolicy::EveryRecord`] the writer flushes after
/// every physical record to bound the window of partially written data.
///
/// # Failure behavior
///
/// The first sink failure aborts the remaining fragments of the current
/// [`append`](LogWriter::append) call. The cursor still advances past the
/// failed record, so after a failure the writer's position can disagree with
/// the sink's persisted length. A caller that wants to keep writing after a
/// failure should reopen with [`LogWriter::resume`] using the sink's real
/// size.
///
/// # Example
///
/// ```rust
/// use framelog_core::LogWriter;
/// use framelog_storage::MemorySink;
///
/// let mut writer = LogWriter::new(MemorySink::new());
/// writer.append(b"hello").unwrap();
/// assert_eq!(writer.block_offset(), 12); // 7-byte header + 5-byte payload
/// ```
pub struct LogWriter<S: LogSink> {
    /// Destination sink.
    sink: S,
    /// Bytes of the current block consumed so far.
    block_offset: usize,
    /// CRC32C of each kind byte, indexed by the on-disk kind value.
    kind_crc: [u32; MAX_RECORD_KIND + 1],
    /// When to flush the sink.
    flush_policy: FlushPolicy,
}

impl<S: LogSink> LogWriter<S> {
    /// Creates a writer for a brand-new, empty destination.
    pub fn new(sink: S) -> Self {
        Self::resume(sink, 0)
    }

    /// Creates a writer that appends onto an existing log.
    ///
    /// `prior_len` is the destination's current length in bytes. The cursor
    /// starts at `prior_len % BLOCK_SIZE` so that headers keep aligning with
    /// block boundaries; the existing contents are never re-read.
    pub fn resume(sink: S, prior_len: u64) -> Self {
        let writer = Self {
            sink,
            block_offset: (prior_len % BLOCK_SIZE as u64) as usize,
            kind_crc: kind_crc_table(),
            flush_policy: FlushPolicy::default(),
        };
        tracing::debug!(block_offset = writer.block_offset, "log writer ready");
        writer
    }

    /// Sets the flush policy, consuming and returning the writer.
    #[must_use]
    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.flush_policy = policy;
        self
    }

    /// Appends a logical record to the log.
    ///
    /// The record is emitted as one or more physical records, in order. An
    /// empty record is valid and emits exactly one zero-length `Full`
    /// record. When fewer than 7 bytes remain in the current block, the tail
    /// is zero-filled first and emission continues in the next block.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::SinkAppend`] if the sink rejects header or
    /// payload bytes, and [`LogError::SinkFlush`] if a policy-driven flush
    /// fails. The first failure abandons the record's remaining fragments;
    /// the cursor still advances past the failed fragment (see the type
    /// docs).
    pub fn append(&mut self, record: &[u8]) -> LogResult<()> {
        let mut left = record;
        let mut begin = true;

        // Runs at least once so an empty record still emits a Full header.
        loop {
            let leftover = BLOCK_SIZE - self.block_offset;
            if leftover < HEADER_SIZE {
                if leftover > 0 {
                    // Fill the tail with zeros. Best effort: the bytes are
                    // framing, not a record, and a reader skips them either
                    // way.
                    let _ = self.sink.append(&ZERO_TRAILER[..leftover]);
                }
                self.block_offset = 0;
            }

            let avail = BLOCK_SIZE - self.block_offset - HEADER_SIZE;
            let fragment_len = left.len().min(avail);
            let end = fragment_len == left.len();

            let kind = match (begin, end) {
                (true, true) => RecordKind::Full,
                (true, false) => RecordKind::First,
                (false, true) => RecordKind::Last,
                (false, false) => RecordKind::Middle,
            };

            let (fragment, rest) = left.split_at(fragment_len);
            self.emit_physical(kind, fragment)?;
            left = rest;
            begin = false;

            if end {
                break;
            }
        }

        if self.flush_policy == FlushPolicy::EveryAppend {
            self.sink.flush().map_err(LogError::SinkFlush)?;
        }

        Ok(())
    }

    /// Flushes the sink, pushing buffered appends down to the store.
    ///
    /// Under [`FlushPolicy::Manual`] this is the only flush the writer ever
    /// issues.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::SinkFlush`] if the sink fails to flush.
    pub fn flush(&mut self) -> LogResult<()> {
        self.sink.flush().map_err(LogError::SinkFlush)
    }

    /// Syncs the sink, making appended records durable.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::SinkFlush`] if the sink fails to sync.
    pub fn sync(&mut self) -> LogResult<()> {
        self.sink.sync().map_err(LogError::SinkFlush)
    }

    /// Returns the writer's position within the current block.
    #[must_use]
    pub fn block_offset(&self) -> usize {
        self.block_offset
    }

    /// Returns a shared reference to the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns a mutable reference to the underlying sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the writer, returning the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Emits one physical record at the current cursor.
    ///
    /// The cursor advances by the record's full framed length whether or not
    /// the sink accepted the bytes.
    fn emit_physical(&mut self, kind: RecordKind, payload: &[u8]) -> LogResult<()> {
        debug_assert!(payload.len() <= u16::MAX as usize);
        debug_assert!(self.block_offset + HEADER_SIZE + payload.len() <= BLOCK_SIZE);

        let crc = checksum::mask(checksum::extend(
            self.kind_crc[kind.as_byte() as usize],
            payload,
        ));

        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&crc.to_le_bytes());
        header[4..6].copy_from_slice(&(payload.len() as u16).to_le_bytes());
        header[6] = kind.as_byte();

        let result = self.write_fragment(&header, payload);
        self.block_offset += HEADER_SIZE + payload.len();
        result
    }

    fn write_fragment(&mut self, header: &[u8], payload: &[u8]) -> LogResult<()> {
        self.sink.append(header).map_err(LogError::SinkAppend)?;
        self.sink.append(payload).map_err(LogError::SinkAppend)?;
        if self.flush_policy == FlushPolicy::EveryRecord {
            self.sink.flush().map_err(LogError::SinkFlush)?;
        }
        Ok(())
    }
}

impl<S: LogSink> std::fmt::Debug for LogWriter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogWriter")
            .field("block_offset", &self.block_offset)
            .field("flush_policy", &self.flush_policy)
            .finish_non_exhaustive()
    }
}

/// Precomputes the CRC32C of every kind byte, indexed by kind value.
fn kind_crc_table() -> [u32; MAX_RECORD_KIND + 1] {
    let mut table = [0u32; MAX_RECORD_KIND + 1];
    for (byte, entry) in table.iter_mut().enumerate() {
        *entry = checksum::value(&[byte as u8]);
    }
    table
}
