//! Checksum contract for physical records.
//!
//! Physical records are protected by CRC32C (Castagnoli). The raw CRC is
//! never stored directly: a reversible masking transform is applied first,
//! so that a zeroed region of the log can never validate as a record and so
//! that checksums of data which itself embeds checksums stay well behaved.

/// Offset added to the rotated CRC by the masking transform.
const MASK_DELTA: u32 = 0xa282_ead8;

/// Computes the CRC32C of `data`.
#[must_use]
pub fn value(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}

/// Extends `crc` with `data`.
///
/// `extend(value(a), b)` equals `value(a ++ b)`.
#[must_use]
pub fn extend(crc: u32, data: &[u8]) -> u32 {
    crc32c::crc32c_append(crc, data)
}

/// Masks a CRC for storage: rotate right by 15 bits, then add a constant.
#[must_use]
pub const fn mask(crc: u32) -> u32 {
    ((crc >> 15) | (crc << 17)).wrapping_add(MASK_DELTA)
}

/// Inverts [`mask`], recovering the raw CRC from a stored value.
#[must_use]
pub const fn unmask(masked: u32) -> u32 {
    let rot = masked.wrapping_sub(MASK_DELTA);
    (rot << 15) | (rot >> 17)
}
