//! Verify command implementation.

use framelog_core::log::checksum;
use framelog_core::{RecordKind, BLOCK_SIZE, HEADER_SIZE};
use framelog_storage::{FileSink, LogSink};
use serde::Serialize;
use std::path::Path;

/// Verification result.
#[derive(Debug, Serialize)]
pub struct VerifyResult {
    /// Total bytes scanned.
    pub bytes: u64,
    /// Number of blocks the log occupies (the last may be partial).
    pub blocks: usize,
    /// Number of fragments checked.
    pub fragments_checked: usize,
    /// Number of fragments whose checksum verified.
    pub valid_fragments: usize,
    /// Number of corrupt fragments.
    pub corrupt_fragments: usize,
    /// Number of complete records.
    pub records: usize,
    /// Zero bytes spent on block trailers.
    pub padding_bytes: u64,
    /// List of errors found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn new() -> Self {
        Self {
            bytes: 0,
            blocks: 0,
            fragments_checked: 0,
            valid_fragments: 0,
            corrupt_fragments: 0,
            records: 0,
            padding_bytes: 0,
            errors: Vec::new(),
        }
    }

    fn is_ok(&self) -> bool {
        self.corrupt_fragments == 0 && self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err("log file not found".into());
    }

    tracing::debug!(path = %path.display(), "verifying log");
    let sink = FileSink::open(path)?;
    let result = verify_log(&sink)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_result(path, &result);
        }
    }

    if result.is_ok() {
        Ok(())
    } else {
        Err("Verification failed".into())
    }
}

fn verify_log(sink: &FileSink) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let mut result = VerifyResult::new();
    let size = sink.size()?;
    result.bytes = size;
    result.blocks = (size as usize).div_ceil(BLOCK_SIZE);

    let mut offset = 0u64;
    while offset < size {
        let block_rem = BLOCK_SIZE - (offset % BLOCK_SIZE as u64) as usize;
        if block_rem < HEADER_SIZE {
            let skip = (block_rem as u64).min(size - offset);
            let trailer = sink.read_at(offset, skip as usize)?;
            if trailer.iter().any(|&b| b != 0) {
                result
                    .errors
                    .push(format!("nonzero trailer at offset {}", offset));
            }
            result.padding_bytes += skip;
            offset += skip;
            continue;
        }

        if size - offset < HEADER_SIZE as u64 {
            // Torn header at the tail; recovery treats this as end of log.
            break;
        }

        // Read header
        let header = sink.read_at(offset, HEADER_SIZE)?;
        if header.iter().all(|&b| b == 0) {
            break;
        }

        result.fragments_checked += 1;

        let stored = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let length = u16::from_le_bytes([header[4], header[5]]) as usize;
        let kind_byte = header[6];

        let Some(kind) = RecordKind::from_byte(kind_byte) else {
            result.errors.push(format!(
                "invalid record kind {} at offset {}",
                kind_byte, offset
            ));
            result.corrupt_fragments += 1;
            break;
        };

        if HEADER_SIZE + length > block_rem {
            result.errors.push(format!(
                "fragment of length {} at offset {} crosses a block boundary",
                length, offset
            ));
            result.corrupt_fragments += 1;
            break;
        }

        if size - offset < (HEADER_SIZE + length) as u64 {
            // Torn payload at the tail; recovery treats this as end of log.
            break;
        }

        let payload = sink.read_at(offset + HEADER_SIZE as u64, length)?;
        let expected = checksum::unmask(stored);
        let actual = checksum::extend(checksum::value(&[kind_byte]), &payload);

        if expected != actual {
            result.errors.push(format!(
                "checksum mismatch at offset {}: stored={:08x}, computed={:08x}",
                offset, expected, actual
            ));
            result.corrupt_fragments += 1;
        } else {
            result.valid_fragments += 1;
            if matches!(kind, RecordKind::Full | RecordKind::Last) {
                result.records += 1;
            }
        }

        offset += (HEADER_SIZE + length) as u64;
    }

    Ok(result)
}

fn print_result(path: &Path, result: &VerifyResult) {
    println!("Verifying log at {:?}", path);
    println!();
    println!(
        "  bytes: {} ({} blocks, {} padding)",
        result.bytes, result.blocks, result.padding_bytes
    );
    println!(
        "  fragments checked: {}, valid: {}, corrupt: {}",
        result.fragments_checked, result.valid_fragments, result.corrupt_fragments
    );
    println!("  complete records: {}", result.records);
    for error in &result.errors {
        println!("    ERROR: {}", error);
    }

    println!();
    if result.is_ok() {
        println!("✓ Log verification passed");
    } else {
        println!("✗ Log verification failed");
    }
}
