//! CRC32 checksums for snapshot payloads
//!
//! The checksum covers the exact bytes of the `tables` member of a snapshot
//! file. Uses CRC32 (IEEE polynomial) via the crc32fast crate.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Formats a CRC32 checksum.
///
/// Format: `crc32:XXXXXXXX` (lowercase hex, 8 characters, zero-padded)
///
/// # Example
///
/// ```
/// use tabledb::snapshot::format_checksum;
/// assert_eq!(format_checksum(0xDEADBEEF), "crc32:deadbeef");
/// ```
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Parses a formatted checksum string back to u32.
///
/// Returns `None` if the prefix or hex digits are malformed.
pub fn parse_checksum(s: &str) -> Option<u32> {
    let hex = s.strip_prefix("crc32:")?;
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
