//! Dump command implementation.

use framelog_core::log::checksum;
use framelog_core::{LogReader, RecordKind, BLOCK_SIZE, HEADER_SIZE};
use framelog_storage::{FileSink, LogSink};
use serde::Serialize;
use std::path::Path;

/// Logical record representation for output.
#[derive(Debug, Serialize)]
pub struct RecordInfo {
    /// Offset of the record's first fragment header.
    pub offset: u64,
    /// Payload length in bytes.
    pub length: usize,
    /// Leading payload bytes, hex-encoded.
    pub preview: String,
}

/// Physical fragment representation for output.
#[derive(Debug, Serialize)]
pub struct FragmentInfo {
    /// Offset of the fragment header.
    pub offset: u64,
    /// Fragment kind.
    pub kind: String,
    /// Fragment payload length in bytes.
    pub length: usize,
    /// Whether the stored checksum verifies.
    pub checksum_ok: bool,
}

const PREVIEW_BYTES: usize = 16;

/// Runs the dump command.
pub fn run(
    path: &Path,
    limit: Option<usize>,
    physical: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err("log file not found".into());
    }

    tracing::debug!(path = %path.display(), physical, "dumping log");
    let sink = FileSink::open(path)?;

    if physical {
        let fragments = read_fragments(&sink, limit)?;
        match format {
            "json" => {
                println!("{}", serde_json::to_string_pretty(&fragments)?);
            }
            _ => {
                print_fragments(&fragments);
            }
        }
    } else {
        let records = read_records(sink, limit)?;
        match format {
            "json" => {
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
            _ => {
                print_records(&records);
            }
        }
    }

    Ok(())
}

fn read_records(
    sink: FileSink,
    limit: Option<usize>,
) -> Result<Vec<RecordInfo>, Box<dyn std::error::Error>> {
    let mut reader = LogReader::new(sink)?;
    let mut records = Vec::new();
    let max_records = limit.unwrap_or(usize::MAX);

    while records.len() < max_records {
        match reader.read_record()? {
            Some(payload) => {
                records.push(RecordInfo {
                    offset: reader.last_record_offset().unwrap_or(0),
                    length: payload.len(),
                    preview: preview(&payload),
                });
            }
            None => break,
        }
    }

    Ok(records)
}

fn read_fragments(
    sink: &FileSink,
    limit: Option<usize>,
) -> Result<Vec<FragmentInfo>, Box<dyn std::error::Error>> {
    let size = sink.size()?;
    let mut offset = 0u64;
    let mut fragments = Vec::new();
    let max_fragments = limit.unwrap_or(usize::MAX);

    while offset < size && fragments.len() < max_fragments {
        let block_rem = BLOCK_SIZE - (offset % BLOCK_SIZE as u64) as usize;
        if block_rem < HEADER_SIZE {
            // Zero-filled block trailer
            offset += (block_rem as u64).min(size - offset);
            continue;
        }
        if size - offset < HEADER_SIZE as u64 {
            break;
        }

        // Read header
        let header = sink.read_at(offset, HEADER_SIZE)?;
        if header.iter().all(|&b| b == 0) {
            break;
        }

        let stored = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let length = u16::from_le_bytes([header[4], header[5]]) as usize;
        let kind_byte = header[6];

        let kind = match RecordKind::from_byte(kind_byte) {
            Some(RecordKind::Full) => "FULL",
            Some(RecordKind::First) => "FIRST",
            Some(RecordKind::Middle) => "MIDDLE",
            Some(RecordKind::Last) => "LAST",
            None => "UNKNOWN",
        };

        if HEADER_SIZE + length > block_rem || size - offset < (HEADER_SIZE + length) as u64 {
            // The length field cannot be trusted; report the header and stop.
            fragments.push(FragmentInfo {
                offset,
                kind: kind.to_string(),
                length,
                checksum_ok: false,
            });
            break;
        }

        let payload = sink.read_at(offset + HEADER_SIZE as u64, length)?;
        let checksum_ok =
            checksum::unmask(stored) == checksum::extend(checksum::value(&[kind_byte]), &payload);

        fragments.push(FragmentInfo {
            offset,
            kind: kind.to_string(),
            length,
            checksum_ok,
        });

        offset += (HEADER_SIZE + length) as u64;
    }

    Ok(fragments)
}

fn print_records(records: &[RecordInfo]) {
    println!("Log Records ({} total)", records.len());
    println!("================");
    println!();

    for record in records {
        println!(
            "[{:08}] {:6} bytes  {}",
            record.offset, record.length, record.preview
        );
    }
}

fn print_fragments(fragments: &[FragmentInfo]) {
    println!("Physical Fragments ({} total)", fragments.len());
    println!("================");
    println!();

    for fragment in fragments {
        let state = if fragment.checksum_ok { "ok" } else { "BAD" };
        println!(
            "[{:08}] {:7} len={:5} crc={}",
            fragment.offset, fragment.kind, fragment.length, state
        );
    }
}

fn preview(payload: &[u8]) -> String {
    let shown = &payload[..PREVIEW_BYTES.min(payload.len())];
    let hex: String = shown.iter().map(|b| format!("{:02x}", b)).collect();
    if payload.len() > PREVIEW_BYTES {
        format!("{}...", hex)
    } else {
        hex
    }
}
