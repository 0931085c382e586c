//! Error types for the log engine.

use framelog_storage::SinkError;
use thiserror::Error;

/// Result type for log operations.
pub type LogResult<T> = Result<T, LogError>;

/// Errors that can occur during log operations.
#[derive(Debug, Error)]
pub enum LogError {
    /// The sink rejected or failed an append while a record was being
    /// emitted.
    ///
    /// Bytes emitted before the failure may already be in the sink. The
    /// writer's cursor has still advanced past the failed record.
    #[error("sink append failed: {0}")]
    SinkAppend(#[source] SinkError),

    /// The sink failed to flush after a record's bytes were appended.
    #[error("sink flush failed: {0}")]
    SinkFlush(#[source] SinkError),

    /// A sink operation outside record emission failed.
    #[error("sink error: {0}")]
    Storage(#[from] SinkError),

    /// The log violates the framing format.
    #[error("log corruption: {message}")]
    Corruption {
        /// Description of the corruption.
        message: String,
    },

    /// A stored checksum does not match the recomputed value.
    ///
    /// `expected` is the stored checksum after unmasking; `actual` is the
    /// value recomputed over the kind byte and payload.
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Stored checksum, unmasked.
        expected: u32,
        /// Recomputed checksum.
        actual: u32,
    },
}

impl LogError {
    /// Creates a corruption error.
    pub fn corruption(message: impl Into<String>) -> Self {
        Self::Corruption {
            message: message.into(),
        }
    }
}
