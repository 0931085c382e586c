//! # Framelog Testkit
//!
//! Test utilities for framelog.
//!
//! This crate provides:
//! - Test fixtures and log helpers
//! - Fault-injecting sink wrappers for crash simulation
//! - Property-based test generators using proptest
//! - A validating walker over the raw block format
//!
//! ## Usage
//!
//! ```rust,ignore
//! use framelog_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_log() {
//!     let mut log = TestLog::memory();
//!     log.append(b"hello");
//!     let mut reader = log.into_reader();
//!     // ... assertions
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fault;
pub mod fixtures;
pub mod generators;
pub mod physical;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fault::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::physical::*;
}

pub use fault::*;
pub use fixtures::*;
pub use generators::*;
pub use physical::*;
