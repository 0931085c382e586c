//! Block-framed record log: format, writer, and recovery reader.
//!
//! The log is an append-only byte stream partitioned into fixed 32 KiB
//! blocks. Logical records are framed as one or more physical records, each
//! carrying a checksummed 7-byte header. A physical record never crosses a
//! block boundary, so a reader never has to reassemble a header.
//!
//! ## Physical record format
//!
//! ```text
//! | checksum (4, LE) | length (2, LE) | kind (1) | payload (length bytes) |
//! ```
//!
//! - `checksum`: masked CRC32C over the kind byte followed by the payload
//! - `length`: payload length, 0..=65535
//! - `kind`: 1=Full, 2=First, 3=Middle, 4=Last (0 is reserved, never written)
//!
//! A logical record that fits in the current block is written as a single
//! `Full` record. Otherwise it is split into a `First` fragment, zero or
//! more `Middle` fragments, and a `Last` fragment. When fewer than 7 bytes
//! remain in a block, that tail is zero-filled (a *trailer*) and the next
//! record begins at the next block boundary.
//!
//! ## Recovery Policy
//!
//! The reader distinguishes between **tolerated** and **fatal** conditions:
//!
//! ### Tolerated (treated as clean end-of-log)
//!
//! - Truncated header or payload at the log tail (crash mid-write)
//! - A fragmented record missing its `Last` fragment at the tail (crash
//!   mid-record)
//! - An all-zero header (zeroed, never-written space; a real header always
//!   carries a nonzero kind byte)
//!
//! ### Tolerated (dropped with a warning, reading continues)
//!
//! - A `Full` or `First` arriving while an earlier fragmented record is
//!   still open (a writer restarted mid-record)
//! - A `Middle` or `Last` with no preceding `First`
//!
//! ### Fatal (reading aborts with an error)
//!
//! - A stored checksum that does not match the recomputed value
//! - A nonzero header carrying a reserved or unknown kind byte
//! - A physical record whose length would cross its block boundary
//!
//! Checksum failures are fatal - no heuristic repair is attempted.

pub mod checksum;
pub mod format;
mod reader;
mod writer;

pub use format::{RecordKind, BLOCK_SIZE, HEADER_SIZE, MAX_RECORD_KIND};
pub use reader::LogReader;
pub use writer::{FlushPolicy, LogWriter};
