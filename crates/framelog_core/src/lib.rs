//! # framelog core
//!
//! Block-framed write-ahead log engine.
//!
//! This crate provides:
//! - The on-disk log format: 32 KiB blocks of checksummed physical records
//! - [`LogWriter`] - appends logical records, fragmenting them across blocks
//! - [`LogReader`] - streams logical records back, tolerating torn tails
//! - The CRC32C checksum contract, including the storage masking transform
//!
//! See the [`log`] module docs for the format and the recovery policy.
//!
//! ## Example
//!
//! ```rust
//! use framelog_core::{LogReader, LogWriter};
//! use framelog_storage::MemorySink;
//!
//! let mut writer = LogWriter::new(MemorySink::new());
//! writer.append(b"first record").unwrap();
//! writer.append(b"second record").unwrap();
//!
//! let mut reader = LogReader::new(writer.into_inner()).unwrap();
//! assert_eq!(reader.read_record().unwrap().as_deref(), Some(&b"first record"[..]));
//! assert_eq!(reader.read_record().unwrap().as_deref(), Some(&b"second record"[..]));
//! assert_eq!(reader.read_record().unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod log;

pub use error::{LogError, LogResult};
pub use log::{FlushPolicy, LogReader, LogWriter, RecordKind, BLOCK_SIZE, HEADER_SIZE};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
