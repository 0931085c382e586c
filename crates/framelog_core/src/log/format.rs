//! On-disk layout constants and record kinds.

/// Size of a log block in bytes.
pub const BLOCK_SIZE: usize = 32 * 1024;

/// Size of a physical record header in bytes.
/// checksum (4) + length (2) + kind (1)
pub const HEADER_SIZE: usize = 4 + 2 + 1;

/// Largest on-disk value of a record kind byte.
///
/// Sizes the per-kind checksum table the writer precomputes.
pub const MAX_RECORD_KIND: usize = RecordKind::Last as usize;

/// Kind tag of a physical record, controlling reassembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    /// The entire logical record in one physical record.
    Full = 1,
    /// First fragment of a logical record spanning several physical records.
    First = 2,
    /// Interior fragment, neither first nor last.
    Middle = 3,
    /// Final fragment of a fragmented logical record.
    Last = 4,
}

impl RecordKind {
    /// Converts a byte to a record kind.
    ///
    /// Returns `None` for the reserved value 0 and for unknown bytes.
    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::Full),
            2 => Some(Self::First),
            3 => Some(Self::Middle),
            4 => Some(Self::Last),
            _ => None,
        }
    }

    /// Converts the record kind to its on-disk byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}
