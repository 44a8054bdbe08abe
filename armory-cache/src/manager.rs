//! Cache orchestration.
//!
//! `CacheManager` ties the memory tier, disk tier, and persist queue into a
//! single get/put/invalidate/clear/stats surface. Reads revalidate against
//! the live backing file; writes land in memory synchronously and on disk
//! asynchronously. One manager is constructed per process and handed to
//! collaborators, owning all cache state.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use chrono::{Duration, Utc};
use tracing::{debug, info};

use armory_core::constants::{DEFAULT_MAX_AGE_HOURS, DEFAULT_MAX_MEMORY_ENTRIES};
use armory_core::{AssetRecord, CacheStats};

use crate::disk::DiskTier;
use crate::fingerprint;
use crate::memory::MemoryTier;
use crate::persist::PersistQueue;

pub struct CacheManager {
    memory: MemoryTier,
    disk: Arc<DiskTier>,
    persist: PersistQueue,
    max_memory_entries: usize,
    max_age: Duration,
}

impl CacheManager {
    /// Creates a manager over `cache_dir` (created if absent) and kicks off
    /// a background warm load of still-valid disk entries into the memory
    /// tier. The manager is usable immediately; lookups simply miss to the
    /// disk tier until the warm load completes.
    pub fn new(cache_dir: impl Into<PathBuf>, max_memory_entries: usize, max_age: Duration) -> Self {
        let disk = Arc::new(DiskTier::new(cache_dir.into()));
        let memory = MemoryTier::new();

        {
            let disk = Arc::clone(&disk);
            let memory = memory.clone();
            thread::spawn(move || {
                let entries = disk.load_all(max_age);
                let count = entries.len();
                for (key, record) in entries {
                    // Replayed entries keep their own cache time as the
                    // touch timestamp so they age normally.
                    let touch = record.cached_at;
                    memory.insert_with_touch(key, record, touch);
                }
                info!(entries = count, "cache warm load complete");
            });
        }

        Self {
            memory,
            persist: PersistQueue::new(Arc::clone(&disk)),
            disk,
            max_memory_entries,
            max_age,
        }
    }

    /// Manager with the stock limits: 1000 memory entries, 24 hour max age.
    pub fn with_defaults(cache_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            cache_dir,
            DEFAULT_MAX_MEMORY_ENTRIES,
            Duration::hours(DEFAULT_MAX_AGE_HOURS),
        )
    }

    /// Looks up a record, revalidating memory hits against the live file.
    ///
    /// A memory hit whose backing file has vanished is returned as-is: a
    /// missing file cannot prove the entry stale, and scan targets are
    /// sometimes intentionally offline. A fingerprint mismatch invalidates
    /// the key in both tiers before falling through to the disk tier, which
    /// applies its own expiry and fingerprint checks and repopulates the
    /// memory tier on success.
    pub fn get(&self, key: &str) -> Option<AssetRecord> {
        if let Some(record) = self.memory.get(key) {
            if !record.file_path.exists() {
                return Some(record);
            }
            if fingerprint::quick_fingerprint(&record.file_path) == record.quick_fingerprint {
                return Some(record);
            }
            debug!(key, "backing file changed, invalidating");
            self.invalidate(key);
        }

        let record = self.disk.load(key, self.max_age)?;
        self.memory.insert(key.to_string(), record.clone());
        Some(record)
    }

    /// Stores a record: stamps `cached_at`, inserts into the memory tier
    /// synchronously, queues the disk write, and enforces the memory bound.
    /// Returns the record as stored (with the fresh stamp).
    ///
    /// The disk write is fire-and-forget; callers must not assume it is
    /// visible when `put` returns. A same-thread `get` after `put` observes
    /// the new value through the memory tier.
    pub fn put(&self, key: &str, mut record: AssetRecord) -> AssetRecord {
        record.cached_at = Utc::now();
        self.memory.insert(key.to_string(), record.clone());
        self.persist.queue_save(key.to_string(), record.clone());

        if self.memory.len() > self.max_memory_entries {
            let evicted = self.memory.enforce_capacity(self.max_memory_entries);
            if evicted > 0 {
                debug!(evicted, "memory tier eviction");
            }
        }
        record
    }

    /// Removes a key from both tiers. No-op if absent.
    pub fn invalidate(&self, key: &str) {
        self.memory.remove(key);
        self.disk.remove(key);
    }

    /// Wipes both tiers. Drains the persist queue first so a queued save
    /// cannot resurrect a file after the wipe. Idempotent.
    pub fn clear_all(&self) {
        self.persist.flush();
        self.memory.clear();
        self.disk.clear();
        info!("cache cleared");
    }

    /// Usage snapshot for the host UI. The disk count is re-listed on every
    /// call so external changes to the cache directory show up.
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        CacheStats {
            memory_entries: self.memory.len(),
            disk_entries: self.disk.entry_count(),
            estimated_memory_bytes: self.memory.estimated_bytes(),
            oldest_entry: self.memory.oldest_touch().unwrap_or(now),
            newest_entry: self.memory.newest_touch().unwrap_or(now),
        }
    }

    /// True if the file no longer exists or its quick fingerprint differs
    /// from `previous`.
    pub fn has_file_changed(&self, path: &std::path::Path, previous: i64) -> bool {
        fingerprint::file_changed(path, previous)
    }

    /// Blocks until all queued disk writes have landed. Nothing requires
    /// calling this; it exists for orderly shutdown and for tests that
    /// simulate a restart.
    pub fn flush(&self) {
        self.persist.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory_core::Platform;
    use std::path::Path;

    fn manager(dir: &Path) -> CacheManager {
        CacheManager::new(dir.join("cache"), 1000, Duration::hours(24))
    }

    fn record_for(path: &Path, name: &str) -> AssetRecord {
        AssetRecord {
            name: name.to_string(),
            platform: Platform::Mt4,
            instance_name: "Demo".to_string(),
            file_path: path.to_path_buf(),
            quick_fingerprint: fingerprint::quick_fingerprint(path),
            ..AssetRecord::default()
        }
    }

    #[test]
    fn put_stamps_cached_at() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());
        let before = Utc::now();

        let stored = cache.put("MT4:Demo:A", AssetRecord::default());
        assert!(stored.cached_at >= before);
    }

    #[test]
    fn memory_hit_skips_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());
        let backing = dir.path().join("ea.ex4");
        std::fs::write(&backing, "bytes").unwrap();

        let stored = cache.put("MT4:Demo:A", record_for(&backing, "A"));
        // Wipe the disk tier out from under the manager; the memory tier
        // must still serve the hit.
        cache.disk.clear();
        assert_eq!(cache.get("MT4:Demo:A"), Some(stored));
    }

    #[test]
    fn invalidate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());
        cache.invalidate("MT4:Demo:NeverExisted");
        cache.put("MT4:Demo:A", AssetRecord::default());
        cache.flush();
        cache.invalidate("MT4:Demo:A");
        cache.invalidate("MT4:Demo:A");
        assert!(cache.get("MT4:Demo:A").is_none());
    }

    #[test]
    fn stats_reflect_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());
        let stats = cache.stats();
        assert_eq!(stats.memory_entries, 0);
        assert_eq!(stats.disk_entries, 0);
        assert_eq!(stats.estimated_memory_bytes, 0);
    }

    #[test]
    fn has_file_changed_wraps_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let cache = manager(dir.path());
        let path = dir.path().join("ea.mq4");
        std::fs::write(&path, "body").unwrap();
        let fp = fingerprint::quick_fingerprint(&path);

        assert!(!cache.has_file_changed(&path, fp));
        assert!(cache.has_file_changed(&path, fp ^ 1));
        assert!(cache.has_file_changed(Path::new("/gone"), fp));
    }
}
