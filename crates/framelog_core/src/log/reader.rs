//! Streaming log reader for recovery.

use crate::error::{LogError, LogResult};
use crate::log::checksum;
use crate::log::format::{RecordKind, BLOCK_SIZE, HEADER_SIZE};
use framelog_storage::LogSink;

/// Streams logical records back out of a block-framed log.
///
/// The reader walks physical records in emission order, reassembling
/// fragmented records and skipping block trailers. It reads records
/// one-by-one from the sink, keeping memory proportional to a single
/// logical record.
///
/// # Error Handling
///
/// - Checksum mismatches abort reading with an error
/// - Reserved kind bytes and block-crossing lengths abort with an error
/// - Torn tails (truncated header, truncated payload, missing `Last`
///   fragment) are treated as a clean end of log
/// - Reassembly anomalies left behind by a restarted writer are dropped
///   with a warning and reading continues
///
/// See the [module docs](crate::log) for the full recovery policy.
///
/// # Example
///
/// ```rust
/// use framelog_core::{LogReader, LogWriter};
/// use framelog_storage::MemorySink;
///
/// let mut writer = LogWriter::new(MemorySink::new());
/// writer.append(b"payload").unwrap();
///
/// let mut reader = LogReader::new(writer.into_inner()).unwrap();
/// assert_eq!(reader.read_record().unwrap().as_deref(), Some(&b"payload"[..]));
/// assert_eq!(reader.read_record().unwrap(), None);
/// ```
pub struct LogReader<S: LogSink> {
    /// Source sink.
    sink: S,
    /// Sink length observed at construction.
    size: u64,
    /// Offset of the next unread byte.
    offset: u64,
    /// Where the most recently returned logical record began.
    last_record_offset: Option<u64>,
    /// Set once the end of the log or an error has been reached.
    finished: bool,
}

impl<S: LogSink> LogReader<S> {
    /// Creates a reader over the full contents of `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink's size cannot be determined.
    pub fn new(sink: S) -> LogResult<Self> {
        let size = sink.size()?;
        tracing::debug!(size, "log reader opened");
        Ok(Self {
            sink,
            size,
            offset: 0,
            last_record_offset: None,
            finished: false,
        })
    }

    /// Reads the next logical record.
    ///
    /// Returns `Ok(None)` at the end of the log. Torn tails also end the
    /// log cleanly; reassembly anomalies are dropped with a warning and
    /// reading continues with the next record.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::ChecksumMismatch`] when a stored checksum does
    /// not verify, and [`LogError::Corruption`] for framing violations.
    /// After an error, further calls return `Ok(None)`.
    pub fn read_record(&mut self) -> LogResult<Option<Vec<u8>>> {
        if self.finished {
            return Ok(None);
        }

        let mut assembled = Vec::new();
        let mut open_record_start: Option<u64> = None;

        loop {
            let (offset, kind, payload) = match self.next_fragment() {
                Ok(Some(fragment)) => fragment,
                Ok(None) => {
                    self.finished = true;
                    if let Some(start) = open_record_start {
                        tracing::warn!(
                            offset = start,
                            "dropping record without its final fragment at log tail"
                        );
                    }
                    return Ok(None);
                }
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            };

            match kind {
                RecordKind::Full => {
                    if let Some(start) = open_record_start {
                        tracing::warn!(
                            offset = start,
                            "dropping unterminated record; a writer restarted mid-record"
                        );
                    }
                    self.last_record_offset = Some(offset);
                    return Ok(Some(payload));
                }
                RecordKind::First => {
                    if let Some(start) = open_record_start {
                        tracing::warn!(
                            offset = start,
                            "dropping unterminated record; a writer restarted mid-record"
                        );
                    }
                    open_record_start = Some(offset);
                    assembled = payload;
                }
                RecordKind::Middle => {
                    if open_record_start.is_none() {
                        tracing::warn!(offset, "dropping middle fragment without a first");
                    } else {
                        assembled.extend_from_slice(&payload);
                    }
                }
                RecordKind::Last => match open_record_start {
                    None => {
                        tracing::warn!(offset, "dropping last fragment without a first");
                    }
                    Some(start) => {
                        assembled.extend_from_slice(&payload);
                        self.last_record_offset = Some(start);
                        return Ok(Some(assembled));
                    }
                },
            }
        }
    }

    /// Reads all remaining records into memory.
    ///
    /// Prefer iterating for large logs; this is for tests and small logs.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`LogReader::read_record`].
    pub fn read_all(&mut self) -> LogResult<Vec<Vec<u8>>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Returns the offset where the most recently returned logical record
    /// began, or `None` before the first record.
    ///
    /// For a fragmented record this is the offset of its `First` fragment.
    #[must_use]
    pub fn last_record_offset(&self) -> Option<u64> {
        self.last_record_offset
    }

    /// Returns a shared reference to the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the reader, returning the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Reads the next physical record, skipping trailers and stopping
    /// cleanly at torn or zeroed tails.
    fn next_fragment(&mut self) -> LogResult<Option<(u64, RecordKind, Vec<u8>)>> {
        loop {
            if self.offset >= self.size {
                return Ok(None);
            }

            let block_rem = BLOCK_SIZE - (self.offset % BLOCK_SIZE as u64) as usize;
            if block_rem < HEADER_SIZE {
                // Trailer: too small for a header, skip to the next block.
                self.offset += block_rem as u64;
                continue;
            }

            if self.size - self.offset < HEADER_SIZE as u64 {
                tracing::debug!(offset = self.offset, "log ends inside a record header");
                return Ok(None);
            }

            let header = self.sink.read_at(self.offset, HEADER_SIZE)?;
            if header.iter().all(|&b| b == 0) {
                // Zeroed, never-written space. A real header always carries
                // a nonzero kind byte.
                tracing::debug!(offset = self.offset, "zeroed header, end of log");
                return Ok(None);
            }

            let stored = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let length = u16::from_le_bytes([header[4], header[5]]) as usize;
            let kind_byte = header[6];

            let kind = RecordKind::from_byte(kind_byte).ok_or_else(|| {
                LogError::corruption(format!(
                    "invalid record kind {kind_byte} at offset {}",
                    self.offset
                ))
            })?;

            if HEADER_SIZE + length > block_rem {
                return Err(LogError::corruption(format!(
                    "record length {length} crosses a block boundary at offset {}",
                    self.offset
                )));
            }

            if self.size - self.offset < (HEADER_SIZE + length) as u64 {
                tracing::debug!(
                    offset = self.offset,
                    length,
                    "log ends inside a record payload"
                );
                return Ok(None);
            }

            let payload = self.sink.read_at(self.offset + HEADER_SIZE as u64, length)?;

            let expected = checksum::unmask(stored);
            let actual = checksum::extend(checksum::value(&[kind_byte]), &payload);
            if expected != actual {
                return Err(LogError::ChecksumMismatch { expected, actual });
            }

            let offset = self.offset;
            self.offset += (HEADER_SIZE + length) as u64;
            return Ok(Some((offset, kind, payload)));
        }
    }
}

impl<S: LogSink> Iterator for LogReader<S> {
    type Item = LogResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<S: LogSink> std::fmt::Debug for LogReader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogReader")
            .field("size", &self.size)
            .field("offset", &self.offset)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
