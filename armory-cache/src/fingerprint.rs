//! File fingerprints for change detection.
//!
//! The quick fingerprint folds the first 1KB of content, the file size, and
//! the mtime into an i64. It answers "did this file probably change" without
//! reading the whole file; content edits past the first 1KB that leave size
//! and mtime untouched are not detected (accepted heuristic, not a bug).
//!
//! Both functions return the sentinel `0` on any error (missing file,
//! permissions, I/O); callers must treat a mismatch against the sentinel as
//! "changed" so failures fall toward re-scanning, never toward stale data.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::UNIX_EPOCH;

use armory_core::constants::QUICK_FINGERPRINT_PREFIX;

/// Fast order-sensitive fingerprint of a file's first 1KB, size, and mtime.
///
/// Returns `0` if the file cannot be read.
pub fn quick_fingerprint(path: &Path) -> i64 {
    try_quick_fingerprint(path).unwrap_or(0)
}

fn try_quick_fingerprint(path: &Path) -> io::Result<i64> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; QUICK_FINGERPRINT_PREFIX];
    let mut filled = 0;
    while filled < buffer.len() {
        let n = file.read(&mut buffer[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    let mut hash: i64 = 17;
    for &byte in &buffer[..filled] {
        hash = hash.wrapping_mul(31).wrapping_add(i64::from(byte));
    }

    let metadata = file.metadata()?;
    hash = hash.wrapping_mul(31).wrapping_add(metadata.len() as i64);
    hash = hash.wrapping_mul(31).wrapping_add(mtime_ticks(&metadata)?);
    Ok(hash)
}

/// Modification time in nanoseconds since the epoch, the finest resolution
/// the platform reports. Pre-epoch mtimes collapse to 0.
fn mtime_ticks(metadata: &std::fs::Metadata) -> io::Result<i64> {
    let modified = metadata.modified()?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0))
}

/// Whole-file blake3 digest truncated to 64 bits, for integrity-grade
/// checks. Not used on the hot invalidation path. Returns `0` on error.
pub fn full_fingerprint(path: &Path) -> i64 {
    let Ok(content) = std::fs::read(path) else {
        return 0;
    };
    let digest = blake3::hash(&content);
    let bytes: [u8; 8] = digest.as_bytes()[..8].try_into().unwrap_or_default();
    i64::from_le_bytes(bytes)
}

/// True if the file no longer exists or its live quick fingerprint differs
/// from `previous`.
pub fn file_changed(path: &Path, previous: i64) -> bool {
    if !path.exists() {
        return true;
    }
    quick_fingerprint(path) != previous
}
