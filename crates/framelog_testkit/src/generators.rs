//! Property-based test generators using proptest.
//!
//! Provides strategies for generating record payloads and batches,
//! weighted toward the lengths where fragmentation decisions happen.

use framelog_core::{BLOCK_SIZE, HEADER_SIZE};
use proptest::prelude::*;

/// Builds a deterministic payload of the given length.
///
/// Byte values follow a seed-derived cycle so torn prefixes and
/// reassembled fragments are distinguishable in failure output.
#[must_use]
pub fn patterned_payload(len: usize, seed: u64) -> Vec<u8> {
    (0..len)
        .map(|i| (seed.wrapping_add(i as u64).wrapping_mul(31) % 251) as u8)
        .collect()
}

/// Strategy for payload lengths, biased toward block-boundary cases.
pub fn payload_len_strategy() -> impl Strategy<Value = usize> {
    // A block holds at most BLOCK_SIZE - HEADER_SIZE payload bytes, so
    // lengths near that capacity exercise the fragmentation edges.
    let capacity = BLOCK_SIZE - HEADER_SIZE;
    prop_oneof![
        4 => 0usize..512,
        3 => (capacity - 24)..=(capacity + 24),
        2 => (BLOCK_SIZE - 8)..=(BLOCK_SIZE + 8),
        1 => (2 * capacity - 16)..=(2 * capacity + 16),
    ]
}

/// Strategy for a single record payload.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    (payload_len_strategy(), any::<u64>()).prop_map(|(len, seed)| patterned_payload(len, seed))
}

/// Strategy for a batch of record payloads.
pub fn record_batch_strategy(max_records: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(payload_strategy(), 1..max_records)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physical::parse_physical;
    use framelog_core::{LogReader, LogWriter, RecordKind};
    use framelog_storage::MemorySink;

    fn written(batch: &[Vec<u8>]) -> Vec<u8> {
        let mut writer = LogWriter::new(MemorySink::new());
        for payload in batch {
            writer.append(payload).expect("append failed");
        }
        writer.into_inner().data()
    }

    #[test]
    fn patterned_payload_is_deterministic() {
        assert_eq!(patterned_payload(64, 7), patterned_payload(64, 7));
        assert_ne!(patterned_payload(64, 7), patterned_payload(64, 8));
    }

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn batches_round_trip_through_the_log(batch in record_batch_strategy(6)) {
            let data = written(&batch);
            let mut reader = LogReader::new(MemorySink::with_data(data)).expect("reader");
            prop_assert_eq!(reader.read_all().expect("read_all"), batch);
        }

        #[test]
        fn physical_stream_stays_well_formed(batch in record_batch_strategy(6)) {
            let data = written(&batch);
            let fragments = parse_physical(&data).expect("well-formed stream");

            // Fragment payloads reassemble to the original records, in order.
            let mut rebuilt: Vec<Vec<u8>> = Vec::new();
            let mut open: Option<Vec<u8>> = None;
            for fragment in &fragments {
                match fragment.kind {
                    RecordKind::Full => {
                        prop_assert!(open.is_none());
                        rebuilt.push(fragment.payload.clone());
                    }
                    RecordKind::First => {
                        prop_assert!(open.is_none());
                        open = Some(fragment.payload.clone());
                    }
                    RecordKind::Middle => {
                        prop_assert!(open.is_some());
                        open.as_mut().expect("open record").extend_from_slice(&fragment.payload);
                    }
                    RecordKind::Last => {
                        let mut record = open.take().expect("open record");
                        record.extend_from_slice(&fragment.payload);
                        rebuilt.push(record);
                    }
                }
            }
            prop_assert!(open.is_none());
            prop_assert_eq!(rebuilt, batch);
        }
    }
}
