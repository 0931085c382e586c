//! Benchmark support for framelog.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
