//! Disk cache tier: one JSON file per key under a flat cache directory.
//!
//! Every operation is best-effort. Unreadable, corrupt, expired, or
//! fingerprint-stale files are treated as absent (and cleaned up); write
//! failures are logged and swallowed. Nothing here propagates errors to
//! the caller.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use armory_core::constants::CACHE_SCHEMA_VERSION;
use armory_core::AssetRecord;

use crate::error::CacheError;
use crate::fingerprint;

/// Characters invalid in Windows filenames, replaced by `_` when a cache
/// key becomes a filename.
const INVALID_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Versioned envelope around an [`AssetRecord`] as stored on disk.
///
/// Files written before the envelope existed have no `schemaVersion` field
/// and are read as version 1. Files with a newer version than this build
/// understands are left untouched and treated as absent.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiskEntry {
    #[serde(default = "legacy_schema_version")]
    schema_version: u32,
    #[serde(flatten)]
    record: AssetRecord,
}

fn legacy_schema_version() -> u32 {
    1
}

/// Persistent cache tier rooted at a single directory.
pub struct DiskTier {
    root: PathBuf,
}

impl DiskTier {
    /// Creates the tier, ensuring the cache directory exists (idempotent).
    pub fn new(root: PathBuf) -> Self {
        if let Err(err) = fs::create_dir_all(&root) {
            warn!(path = %root.display(), error = %err, "could not create cache directory");
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filename for a key: invalid filename characters replaced by `_`,
    /// suffixed `.json`.
    pub fn file_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if INVALID_FILENAME_CHARS.contains(&c) || c.is_control() {
                    '_'
                } else {
                    c
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }

    /// Loads and validates the entry for `key`.
    ///
    /// Returns `None` for absent, unreadable, corrupt, expired, or
    /// fingerprint-stale files; stale and corrupt files are deleted on the
    /// way out. A missing backing file does not invalidate the entry.
    pub fn load(&self, key: &str, max_age: Duration) -> Option<AssetRecord> {
        let path = self.file_path(key);
        if !path.is_file() {
            return None;
        }
        self.read_entry(&path, max_age)
    }

    /// Serializes and atomically writes the entry for `key`. Best-effort:
    /// failures are logged at debug and swallowed.
    pub fn save(&self, key: &str, record: &AssetRecord) {
        if let Err(err) = self.try_save(key, record) {
            debug!(key, error = %err, "disk cache write dropped");
        }
    }

    fn try_save(&self, key: &str, record: &AssetRecord) -> Result<(), CacheError> {
        let entry = DiskEntry {
            schema_version: CACHE_SCHEMA_VERSION,
            record: record.clone(),
        };
        let json = serde_json::to_string_pretty(&entry).map_err(|e| CacheError::Corrupt {
            path: self.file_path(key),
            reason: e.to_string(),
        })?;

        // Write-then-rename so a concurrent reader never sees a half file.
        let path = self.file_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| CacheError::Io {
            path: tmp.clone(),
            message: e.to_string(),
        })?;
        fs::rename(&tmp, &path).map_err(|e| CacheError::Io {
            path,
            message: e.to_string(),
        })
    }

    /// Deletes the entry for `key` if present; absence and errors ignored.
    pub fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.file_path(key));
    }

    /// Deletes the entire cache directory and recreates it empty.
    pub fn clear(&self) {
        let _ = fs::remove_dir_all(&self.root);
        if let Err(err) = fs::create_dir_all(&self.root) {
            warn!(path = %self.root.display(), error = %err, "could not recreate cache directory");
        }
    }

    /// Replays all currently valid entries, deleting stale files found
    /// along the way. Keys are re-derived from each record so writer and
    /// reader always agree.
    pub fn load_all(&self, max_age: Duration) -> Vec<(String, AssetRecord)> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut valid = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(record) = self.read_entry(&path, max_age) {
                valid.push((record.cache_key(), record));
            }
        }
        valid
    }

    /// Live count of cache files on disk. Re-listed on every call so
    /// concurrent external changes are reflected.
    pub fn entry_count(&self) -> usize {
        fs::read_dir(&self.root)
            .map(|entries| {
                entries
                    .flatten()
                    .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Reads, parses, and validates one cache file. Deletes it and returns
    /// `None` when corrupt, expired, or stale against the backing file.
    fn read_entry(&self, path: &Path, max_age: Duration) -> Option<AssetRecord> {
        let record = match self.try_read(path) {
            Ok(record) => record,
            Err(CacheError::SchemaTooNew { found, .. }) => {
                // Written by a newer build; leave it for that build.
                debug!(path = %path.display(), found, "skipping newer-schema cache file");
                return None;
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "removing unreadable cache file");
                let _ = fs::remove_file(path);
                return None;
            }
        };

        if Utc::now() - record.cached_at > max_age {
            debug!(path = %path.display(), "removing expired cache file");
            let _ = fs::remove_file(path);
            return None;
        }

        // Only revalidate against a backing file that still exists; a
        // vanished file cannot prove the entry stale.
        if record.file_path.exists()
            && fingerprint::quick_fingerprint(&record.file_path) != record.quick_fingerprint
        {
            debug!(path = %path.display(), "removing fingerprint-stale cache file");
            let _ = fs::remove_file(path);
            return None;
        }

        Some(record)
    }

    fn try_read(&self, path: &Path) -> Result<AssetRecord, CacheError> {
        let json = fs::read_to_string(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let entry: DiskEntry = serde_json::from_str(&json).map_err(|e| CacheError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if entry.schema_version > CACHE_SCHEMA_VERSION {
            return Err(CacheError::SchemaTooNew {
                path: path.to_path_buf(),
                found: entry.schema_version,
                supported: CACHE_SCHEMA_VERSION,
            });
        }
        Ok(entry.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory_core::Platform;

    fn record(name: &str, file_path: PathBuf) -> AssetRecord {
        AssetRecord {
            name: name.to_string(),
            platform: Platform::Mt4,
            instance_name: "Demo".to_string(),
            file_path,
            cached_at: Utc::now(),
            ..AssetRecord::default()
        }
    }

    fn day() -> Duration {
        Duration::hours(24)
    }

    #[test]
    fn filename_sanitizes_key() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().to_path_buf());
        let path = tier.file_path("MT4:Demo:Trend/Follower");
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "MT4_Demo_Trend_Follower.json"
        );
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().join("cache"));
        let backing = dir.path().join("ea.ex4");
        std::fs::write(&backing, "compiled bytes").unwrap();

        let mut rec = record("Alpha", backing.clone());
        rec.quick_fingerprint = fingerprint::quick_fingerprint(&backing);
        tier.save("MT4:Demo:Alpha", &rec);

        let loaded = tier.load("MT4:Demo:Alpha", day()).unwrap();
        assert_eq!(loaded, rec);
        assert_eq!(tier.entry_count(), 1);
    }

    #[test]
    fn absent_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().to_path_buf());
        assert!(tier.load("MT4:Demo:Nothing", day()).is_none());
    }

    #[test]
    fn corrupt_file_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().to_path_buf());
        std::fs::write(tier.file_path("MT4:Demo:Bad"), "not json {").unwrap();

        assert!(tier.load("MT4:Demo:Bad", day()).is_none());
        assert_eq!(tier.entry_count(), 0, "corrupt file removed");
    }

    #[test]
    fn expired_entry_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().to_path_buf());
        let mut rec = record("Old", PathBuf::from("/nonexistent.ex4"));
        rec.cached_at = Utc::now() - Duration::hours(48);
        tier.save("MT4:Demo:Old", &rec);

        assert!(tier.load("MT4:Demo:Old", day()).is_none());
        assert_eq!(tier.entry_count(), 0);
    }

    #[test]
    fn changed_backing_file_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().join("cache"));
        let backing = dir.path().join("ea.mq4");
        std::fs::write(&backing, "v1").unwrap();

        let mut rec = record("Alpha", backing.clone());
        rec.quick_fingerprint = fingerprint::quick_fingerprint(&backing);
        tier.save("MT4:Demo:Alpha", &rec);

        std::fs::write(&backing, "v2 with different size").unwrap();
        assert!(tier.load("MT4:Demo:Alpha", day()).is_none());
        assert_eq!(tier.entry_count(), 0);
    }

    #[test]
    fn missing_backing_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().to_path_buf());
        let rec = record("Ghost", dir.path().join("vanished.ex4"));
        tier.save("MT4:Demo:Ghost", &rec);

        let loaded = tier.load("MT4:Demo:Ghost", day()).unwrap();
        assert_eq!(loaded.name, "Ghost");
    }

    #[test]
    fn newer_schema_is_skipped_not_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().to_path_buf());
        std::fs::write(
            tier.file_path("MT4:Demo:Future"),
            r#"{"schemaVersion": 99, "name": "Future"}"#,
        )
        .unwrap();

        assert!(tier.load("MT4:Demo:Future", day()).is_none());
        assert_eq!(tier.entry_count(), 1, "newer-schema file left in place");
    }

    #[test]
    fn missing_schema_version_reads_as_legacy() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().to_path_buf());
        std::fs::write(
            tier.file_path("MT4:Demo:Legacy"),
            format!(
                r#"{{"name":"Legacy","platform":"MT4","instanceName":"Demo","cachedAt":"{}"}}"#,
                Utc::now().to_rfc3339()
            ),
        )
        .unwrap();

        let loaded = tier.load("MT4:Demo:Legacy", day()).unwrap();
        assert_eq!(loaded.name, "Legacy");
    }

    #[test]
    fn clear_recreates_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().join("cache"));
        tier.save("MT4:Demo:A", &record("A", PathBuf::from("/a")));
        tier.save("MT4:Demo:B", &record("B", PathBuf::from("/b")));
        assert_eq!(tier.entry_count(), 2);

        tier.clear();
        assert_eq!(tier.entry_count(), 0);
        assert!(tier.root().is_dir());
    }

    #[test]
    fn load_all_returns_valid_and_prunes_stale() {
        let dir = tempfile::tempdir().unwrap();
        let tier = DiskTier::new(dir.path().join("cache"));

        let rec = record("Keep", PathBuf::from("/nonexistent.ex4"));
        tier.save(&rec.cache_key(), &rec);

        let mut expired = record("Drop", PathBuf::from("/nonexistent.ex4"));
        expired.cached_at = Utc::now() - Duration::hours(48);
        tier.save(&expired.cache_key(), &expired);

        let all = tier.load_all(day());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, "MT4:Demo:Keep");
        assert_eq!(tier.entry_count(), 1, "expired file pruned during replay");
    }
}
