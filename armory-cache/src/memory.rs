//! In-memory cache tier.
//!
//! A concurrent key→record table with per-key last-touch timestamps, bounded
//! by entry count. Eviction only removes entries untouched for longer than
//! the recency cutoff; when everything is fresh the tier is allowed to run
//! over its limit rather than throw away hot data.
//!
//! This tier does no fingerprint validation; that is the manager's job.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use armory_core::constants::{EVICTION_RECENCY_CUTOFF_MINS, EVICTION_SLACK};
use armory_core::AssetRecord;

/// Thread-safe memory tier. Cloning yields another handle to the same maps.
#[derive(Clone, Default)]
pub struct MemoryTier {
    records: Arc<DashMap<String, AssetRecord>>,
    touched: Arc<DashMap<String, DateTime<Utc>>>,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a record, refreshing its touch timestamp on a hit.
    pub fn get(&self, key: &str) -> Option<AssetRecord> {
        let record = self.records.get(key).map(|r| r.clone())?;
        self.touched.insert(key.to_string(), Utc::now());
        Some(record)
    }

    /// Inserts or overwrites a record, touching it now.
    pub fn insert(&self, key: String, record: AssetRecord) {
        self.insert_with_touch(key, record, Utc::now());
    }

    /// Inserts with an explicit touch timestamp. The startup warm load uses
    /// the record's own `cached_at` so replayed entries age correctly.
    pub fn insert_with_touch(&self, key: String, record: AssetRecord, touch: DateTime<Utc>) {
        self.touched.insert(key.clone(), touch);
        self.records.insert(key, record);
    }

    pub fn remove(&self, key: &str) {
        self.records.remove(key);
        self.touched.remove(key);
    }

    pub fn clear(&self) {
        self.records.clear();
        self.touched.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Evicts least-recently-touched entries while over `max_entries`.
    ///
    /// Only entries untouched for the recency cutoff qualify; at most
    /// `len - max_entries + EVICTION_SLACK` are removed, oldest first.
    /// Returns the number evicted.
    pub fn enforce_capacity(&self, max_entries: usize) -> usize {
        let len = self.records.len();
        if len <= max_entries {
            return 0;
        }

        let cutoff = Utc::now() - Duration::minutes(EVICTION_RECENCY_CUTOFF_MINS);
        let mut evictable: Vec<(String, DateTime<Utc>)> = self
            .touched
            .iter()
            .filter(|entry| *entry.value() < cutoff)
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        evictable.sort_by_key(|(_, touch)| *touch);

        let target = len - max_entries + EVICTION_SLACK;
        let mut evicted = 0;
        for (key, _) in evictable.into_iter().take(target) {
            self.records.remove(&key);
            self.touched.remove(&key);
            evicted += 1;
        }
        evicted
    }

    /// Sum of rough per-record size estimates, for stats.
    pub fn estimated_bytes(&self) -> usize {
        self.records
            .iter()
            .map(|entry| entry.value().estimated_size())
            .sum()
    }

    pub fn oldest_touch(&self) -> Option<DateTime<Utc>> {
        self.touched.iter().map(|entry| *entry.value()).min()
    }

    pub fn newest_touch(&self) -> Option<DateTime<Utc>> {
        self.touched.iter().map(|entry| *entry.value()).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> AssetRecord {
        AssetRecord {
            name: name.to_string(),
            instance_name: "Demo".to_string(),
            ..AssetRecord::default()
        }
    }

    #[test]
    fn insert_and_get() {
        let tier = MemoryTier::new();
        tier.insert("MT4:Demo:Alpha".to_string(), record("Alpha"));
        let got = tier.get("MT4:Demo:Alpha").unwrap();
        assert_eq!(got.name, "Alpha");
        assert_eq!(tier.len(), 1);
    }

    #[test]
    fn miss_returns_none() {
        let tier = MemoryTier::new();
        assert!(tier.get("MT4:Demo:Nothing").is_none());
    }

    #[test]
    fn remove_deletes_both_maps() {
        let tier = MemoryTier::new();
        tier.insert("k".to_string(), record("A"));
        tier.remove("k");
        assert!(tier.is_empty());
        assert!(tier.oldest_touch().is_none());
    }

    #[test]
    fn get_refreshes_touch() {
        let tier = MemoryTier::new();
        let old = Utc::now() - Duration::hours(2);
        tier.insert_with_touch("k".to_string(), record("A"), old);
        assert_eq!(tier.oldest_touch(), Some(old));

        tier.get("k");
        assert!(tier.oldest_touch().unwrap() > old);
    }

    #[test]
    fn eviction_removes_only_stale_entries() {
        let tier = MemoryTier::new();
        let stale = Utc::now() - Duration::hours(1);
        for i in 0..300 {
            tier.insert_with_touch(format!("old:{i}"), record("Old"), stale);
        }
        for i in 0..10 {
            tier.insert(format!("fresh:{i}"), record("Fresh"));
        }

        let evicted = tier.enforce_capacity(200);
        // len(310) - max(200) + slack(100) = 210 candidates requested,
        // all from the stale set.
        assert_eq!(evicted, 210);
        assert_eq!(tier.len(), 100);
        for i in 0..10 {
            assert!(tier.get(&format!("fresh:{i}")).is_some());
        }
    }

    #[test]
    fn eviction_spares_fresh_overflow() {
        let tier = MemoryTier::new();
        for i in 0..50 {
            tier.insert(format!("fresh:{i}"), record("Fresh"));
        }
        // Over the limit but nothing is older than the cutoff: the tier
        // may exceed the bound rather than evict hot entries.
        assert_eq!(tier.enforce_capacity(10), 0);
        assert_eq!(tier.len(), 50);
    }

    #[test]
    fn eviction_noop_under_limit() {
        let tier = MemoryTier::new();
        tier.insert("k".to_string(), record("A"));
        assert_eq!(tier.enforce_capacity(10), 0);
        assert_eq!(tier.len(), 1);
    }

    #[test]
    fn concurrent_inserts_from_two_threads() {
        let tier = MemoryTier::new();
        let a = tier.clone();
        let b = tier.clone();

        let t1 = std::thread::spawn(move || {
            for i in 0..100 {
                a.insert(format!("t1:{i}"), record("A"));
            }
        });
        let t2 = std::thread::spawn(move || {
            for i in 0..100 {
                b.insert(format!("t2:{i}"), record("B"));
            }
        });
        t1.join().unwrap();
        t2.join().unwrap();

        assert_eq!(tier.len(), 200);
    }

    #[test]
    fn estimated_bytes_counts_records() {
        let tier = MemoryTier::new();
        assert_eq!(tier.estimated_bytes(), 0);
        tier.insert("k".to_string(), record("Alpha"));
        assert!(tier.estimated_bytes() >= 100);
    }
}
