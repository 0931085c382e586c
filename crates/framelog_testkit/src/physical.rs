//! A validating walker over the raw block format.
//!
//! [`parse_physical`] re-derives every fragment from raw log bytes while
//! checking the framing rules the writer must uphold:
//!
//! - headers begin only where a block has room for one
//! - block tails too short for a header are zero-filled
//! - no fragment payload crosses a block boundary
//! - every stored checksum verifies against its kind byte and payload
//!
//! The reader tolerates a damaged tail; this walker does not. It is the
//! strict oracle property tests compare writer output against.

use framelog_core::log::checksum;
use framelog_core::{LogError, LogResult, RecordKind, BLOCK_SIZE, HEADER_SIZE};

/// One physical fragment recovered from a raw byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalRecord {
    /// Byte offset of the fragment header.
    pub offset: usize,
    /// Fragment kind from the header.
    pub kind: RecordKind,
    /// Fragment payload bytes.
    pub payload: Vec<u8>,
}

/// Walks raw log bytes and returns every fragment, validating framing
/// and checksums along the way.
pub fn parse_physical(data: &[u8]) -> LogResult<Vec<PhysicalRecord>> {
    let mut fragments = Vec::new();
    let mut offset = 0usize;

    while offset < data.len() {
        let block_rem = BLOCK_SIZE - offset % BLOCK_SIZE;
        if block_rem < HEADER_SIZE {
            let end = offset + block_rem.min(data.len() - offset);
            let trailer = &data[offset..end];
            if trailer.iter().any(|&b| b != 0) {
                return Err(LogError::corruption(format!(
                    "nonzero trailer at offset {}: {}",
                    offset,
                    hex_encode(trailer)
                )));
            }
            offset = end;
            continue;
        }

        if data.len() - offset < HEADER_SIZE {
            return Err(LogError::corruption(format!(
                "truncated header at offset {}",
                offset
            )));
        }

        let header = &data[offset..offset + HEADER_SIZE];
        let stored = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let length = u16::from_le_bytes([header[4], header[5]]) as usize;
        let kind_byte = header[6];

        let Some(kind) = RecordKind::from_byte(kind_byte) else {
            return Err(LogError::corruption(format!(
                "invalid record kind {} at offset {}",
                kind_byte, offset
            )));
        };

        if HEADER_SIZE + length > block_rem {
            return Err(LogError::corruption(format!(
                "fragment of length {} at offset {} crosses a block boundary",
                length, offset
            )));
        }
        if data.len() - offset < HEADER_SIZE + length {
            return Err(LogError::corruption(format!(
                "truncated payload at offset {}",
                offset
            )));
        }

        let payload = &data[offset + HEADER_SIZE..offset + HEADER_SIZE + length];
        let expected = checksum::unmask(stored);
        let actual = checksum::extend(checksum::value(&[kind_byte]), payload);
        if expected != actual {
            return Err(LogError::ChecksumMismatch { expected, actual });
        }

        fragments.push(PhysicalRecord {
            offset,
            kind,
            payload: payload.to_vec(),
        });
        offset += HEADER_SIZE + length;
    }

    Ok(fragments)
}

/// Encodes bytes as a hexadecimal string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decodes a hexadecimal string to bytes.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelog_core::LogWriter;
    use framelog_storage::MemorySink;

    fn written(batch: &[&[u8]]) -> Vec<u8> {
        let mut writer = LogWriter::new(MemorySink::new());
        for payload in batch {
            writer.append(payload).expect("append failed");
        }
        writer.into_inner().data()
    }

    #[test]
    fn empty_stream_has_no_fragments() {
        assert!(parse_physical(&[]).unwrap().is_empty());
    }

    #[test]
    fn walks_whole_records() {
        let data = written(&[b"one", b"two"]);
        let fragments = parse_physical(&data).unwrap();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].kind, RecordKind::Full);
        assert_eq!(fragments[0].offset, 0);
        assert_eq!(fragments[0].payload, b"one");
        assert_eq!(fragments[1].offset, HEADER_SIZE + 3);
        assert_eq!(fragments[1].payload, b"two");
    }

    #[test]
    fn walks_spanning_records() {
        let big = vec![9u8; BLOCK_SIZE + 100];
        let data = written(&[&big]);
        let fragments = parse_physical(&data).unwrap();

        let kinds: Vec<RecordKind> = fragments.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![RecordKind::First, RecordKind::Last]);
        let total: usize = fragments.iter().map(|f| f.payload.len()).sum();
        assert_eq!(total, big.len());
    }

    #[test]
    fn accepts_zero_filled_trailers() {
        // First record leaves 3 bytes in block one, too few for a header.
        let first = vec![4u8; BLOCK_SIZE - HEADER_SIZE - 3];
        let data = written(&[&first, b"next"]);
        let fragments = parse_physical(&data).unwrap();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].offset, BLOCK_SIZE);
    }

    #[test]
    fn rejects_nonzero_trailer() {
        let first = vec![4u8; BLOCK_SIZE - HEADER_SIZE - 3];
        let mut data = written(&[&first, b"next"]);
        data[BLOCK_SIZE - 1] = 0xee;

        let err = parse_physical(&data).unwrap_err();
        assert!(matches!(err, LogError::Corruption { .. }));
    }

    #[test]
    fn rejects_corrupt_payload() {
        let mut data = written(&[b"fragile"]);
        data[HEADER_SIZE] ^= 0xff;

        let err = parse_physical(&data).unwrap_err();
        assert!(matches!(err, LogError::ChecksumMismatch { .. }));
    }

    #[test]
    fn rejects_truncated_tail() {
        let data = written(&[b"whole record"]);

        let err = parse_physical(&data[..data.len() - 4]).unwrap_err();
        assert!(matches!(err, LogError::Corruption { .. }));
    }

    #[test]
    fn rejects_length_crossing_a_block() {
        // Hand-build a header claiming more payload than the block holds.
        let payload = vec![1u8; BLOCK_SIZE];
        let kind = RecordKind::Full.as_byte();
        let crc = checksum::mask(checksum::extend(checksum::value(&[kind]), &payload));

        let mut data = Vec::new();
        data.extend_from_slice(&crc.to_le_bytes());
        data.extend_from_slice(&(BLOCK_SIZE as u16).to_le_bytes());
        data.push(kind);
        data.extend_from_slice(&payload);

        let err = parse_physical(&data).unwrap_err();
        assert!(matches!(err, LogError::Corruption { .. }));
    }

    #[test]
    fn hex_round_trips() {
        let original = vec![0x00, 0x01, 0xff, 0xab, 0xcd];
        assert_eq!(hex_decode(&hex_encode(&original)), original);
    }
}
