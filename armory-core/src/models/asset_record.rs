use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{COMPLEXITY_MEDIUM_MAX_BYTES, COMPLEXITY_SIMPLE_MAX_BYTES};
use crate::models::asset_kind::AssetKind;
use crate::platform::Platform;

/// Deployment state of an asset relative to a target instance.
///
/// Maintained by the (out-of-tree) deployment UI; the cache only carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeploymentStatus {
    #[default]
    Unknown,
    Missing,
    Match,
    Outdated,
    Error,
}

/// Rough effort estimate for porting an asset to another platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
    Manual,
    #[default]
    Unknown,
}

impl Complexity {
    /// Size heuristic for source files. Compiled files are not analyzable.
    pub fn from_source_size(bytes: u64) -> Self {
        if bytes < COMPLEXITY_SIMPLE_MAX_BYTES {
            Complexity::Simple
        } else if bytes < COMPLEXITY_MEDIUM_MAX_BYTES {
            Complexity::Medium
        } else {
            Complexity::Complex
        }
    }
}

/// A scanned platform asset as stored in the cache.
///
/// Serialized camelCase to disk. Every field has a default so cache files
/// written by older versions (missing fields) still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetRecord {
    pub name: String,
    pub platform: Platform,
    pub kind: AssetKind,
    pub instance_name: String,

    /// Absolute path to the backing file at scan time.
    pub file_path: PathBuf,
    pub file_size: u64,
    pub last_modified: DateTime<Utc>,
    pub version: String,

    /// Polynomial fold of the file's first 1KB, size, and mtime.
    /// `0` means indeterminate (the file could not be read).
    pub quick_fingerprint: i64,
    /// Whole-file blake3 digest truncated to 64 bits; integrity checks only.
    pub full_fingerprint: i64,
    /// Stamped by the cache manager on `put`, not by the scanner.
    pub cached_at: DateTime<Utc>,

    pub is_deployed: bool,
    pub deployment_status: DeploymentStatus,
    pub conversion_complexity: Complexity,
    pub dependencies: Vec<String>,
    pub notes: String,
}

impl Default for AssetRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            platform: Platform::Mt4,
            kind: AssetKind::Unknown,
            instance_name: String::new(),
            file_path: PathBuf::new(),
            file_size: 0,
            last_modified: DateTime::UNIX_EPOCH,
            version: "Unknown".to_string(),
            quick_fingerprint: 0,
            full_fingerprint: 0,
            cached_at: DateTime::UNIX_EPOCH,
            is_deployed: false,
            deployment_status: DeploymentStatus::Unknown,
            conversion_complexity: Complexity::Unknown,
            dependencies: Vec::new(),
            notes: String::new(),
        }
    }
}

impl AssetRecord {
    /// Composite cache key: `platform:instanceName:assetName`.
    /// Case-sensitive; both the writer and the startup replay derive keys
    /// through this method so they always agree.
    pub fn cache_key(&self) -> String {
        format!("{}:{}:{}", self.platform, self.instance_name, self.name)
    }

    /// Rough per-record memory footprint for stats. Not a contract, only
    /// monotonic with entry count and string sizes.
    pub fn estimated_size(&self) -> usize {
        self.name.len()
            + self.instance_name.len()
            + self.file_path.as_os_str().len()
            + self.version.len()
            + self.notes.len()
            + self.dependencies.iter().map(String::len).sum::<usize>()
            + 100
    }
}
