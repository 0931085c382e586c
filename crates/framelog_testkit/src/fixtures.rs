//! Test fixtures and log helpers.
//!
//! Provides convenience functions for setting up test logs
//! and common test scenarios.

use framelog_core::{LogReader, LogWriter};
use framelog_storage::{FileSink, LogSink, MemorySink};
use std::path::PathBuf;
use tempfile::TempDir;

/// A test log with automatic cleanup.
pub struct TestLog {
    /// The writer over the test sink.
    pub writer: LogWriter<Box<dyn LogSink>>,
    log_path: Option<PathBuf>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestLog {
    /// Creates a new in-memory test log.
    pub fn memory() -> Self {
        Self {
            writer: LogWriter::new(Box::new(MemorySink::new())),
            log_path: None,
            _temp_dir: None,
        }
    }

    /// Creates a new file-backed test log.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join("records.log");
        let sink = FileSink::open(&log_path).expect("Failed to open log file");

        Self {
            writer: LogWriter::new(Box::new(sink)),
            log_path: Some(log_path),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the log path if file-backed, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self.log_path.clone()
    }

    /// Appends a record, panicking on failure.
    pub fn append(&mut self, payload: &[u8]) {
        self.writer
            .append(payload)
            .expect("Failed to append record");
    }

    /// Consumes the log and returns a reader over everything written.
    pub fn into_reader(self) -> LogReader<Box<dyn LogSink>> {
        let mut sink = self.writer.into_inner();
        sink.flush().expect("Failed to flush sink");
        LogReader::new(sink).expect("Failed to open reader")
    }

    /// Simulates a restart for a file-backed log: syncs and drops the
    /// writer, then reopens the file and resumes at its current length.
    pub fn reopen(self) -> Self {
        let Self {
            writer,
            log_path,
            _temp_dir,
        } = self;
        let log_path = log_path.expect("reopen requires a file-backed log");

        let mut sink = writer.into_inner();
        sink.sync().expect("Failed to sync sink");
        drop(sink);

        let sink = FileSink::open(&log_path).expect("Failed to reopen log file");
        let prior_len = sink.size().expect("Failed to query log size");
        Self {
            writer: LogWriter::resume(Box::new(sink), prior_len),
            log_path: Some(log_path),
            _temp_dir,
        }
    }
}

impl std::ops::Deref for TestLog {
    type Target = LogWriter<Box<dyn LogSink>>;

    fn deref(&self) -> &Self::Target {
        &self.writer
    }
}

impl std::ops::DerefMut for TestLog {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.writer
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use framelog_core::BLOCK_SIZE;

    /// Creates an in-memory log holding `record_count` small records.
    pub fn populated_log(record_count: usize) -> TestLog {
        let mut log = TestLog::memory();
        for i in 0..record_count {
            log.append(format!("record_{}", i).as_bytes());
        }
        log
    }

    /// Creates an in-memory log whose single record spans several blocks.
    pub fn spanning_log() -> TestLog {
        let mut log = TestLog::memory();
        let payload: Vec<u8> = (0..BLOCK_SIZE * 2 + 1234).map(|i| (i % 251) as u8).collect();
        log.append(&payload);
        log
    }
}
