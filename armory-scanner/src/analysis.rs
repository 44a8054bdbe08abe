//! Per-file source analysis: version extraction and porting complexity.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use armory_core::Complexity;

/// Extensions whose contents we can meaningfully inspect. Compiled assets
/// (`.ex4`, `.ex5`, `.dll`) carry no readable version information.
const SOURCE_EXTENSIONS: &[&str] = &["mq4", "mq5", "cs"];

/// Only the head of a file is searched for a version marker.
const VERSION_SCAN_LINES: usize = 50;

static VERSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)version\s*[:=]\s*([0-9]+\.[0-9]+(?:\.[0-9]+)?)",
        r"(?i)\bv\.?\s*([0-9]+\.[0-9]+(?:\.[0-9]+)?)",
        r"(?i)\bVer\s*\.?\s*([0-9]+\.[0-9]+(?:\.[0-9]+)?)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.as_str()))
}

/// Best-effort version string for an asset file.
///
/// Source files are searched for a version marker in their first 50 lines;
/// everything else falls back to the modification date (`YYYY.MM.DD`), and
/// unreadable files report `"Unknown"`.
pub fn extract_version(path: &Path) -> String {
    if is_source_file(path) {
        if let Some(version) = version_from_source(path) {
            return version;
        }
    }
    mtime_version(path).unwrap_or_else(|| "Unknown".to_string())
}

fn version_from_source(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let reader = BufReader::new(file);
    for line in reader.lines().map_while(Result::ok).take(VERSION_SCAN_LINES) {
        for pattern in VERSION_PATTERNS.iter() {
            if let Some(captures) = pattern.captures(&line) {
                return Some(captures[1].to_string());
            }
        }
    }
    None
}

fn mtime_version(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let stamp: DateTime<Utc> = modified.into();
    Some(stamp.format("%Y.%m.%d").to_string())
}

/// Porting-effort estimate. Only source files are analyzable; the heuristic
/// is file size (small files port easily, large ones rarely do).
pub fn conversion_complexity(path: &Path) -> Complexity {
    if !is_source_file(path) {
        return Complexity::Unknown;
    }
    match fs::metadata(path) {
        Ok(metadata) => Complexity::from_source_size(metadata.len()),
        Err(_) => Complexity::Unknown,
    }
}
