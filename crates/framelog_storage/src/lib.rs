//! # framelog storage
//!
//! Append-only sink trait and implementations for framelog.
//!
//! This crate provides the lowest-level byte-store abstraction for framelog.
//! Sinks are **opaque byte stores** - they do not interpret the data they
//! carry. All framing (blocks, record headers, checksums) belongs to the
//! log layer built on top.
//!
//! ## Design Principles
//!
//! - Sinks are simple byte stores (append, read back, flush, sync)
//! - No knowledge of the log format, blocks, or records
//! - Must be `Send + Sync` for concurrent access
//! - The log layer owns all format interpretation
//!
//! ## Available Sinks
//!
//! - [`MemorySink`] - For testing and ephemeral logs
//! - [`FileSink`] - For persistent logs using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use framelog_storage::{LogSink, MemorySink};
//!
//! let mut sink = MemorySink::new();
//! let offset = sink.append(b"hello world").unwrap();
//! let data = sink.read_at(offset, 11).unwrap();
//! assert_eq!(&data, b"hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod sink;

pub use error::{SinkError, SinkResult};
pub use file::FileSink;
pub use memory::MemorySink;
pub use sink::LogSink;
