use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of cache usage, rendered by the host UI's status panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries currently in the memory tier.
    pub memory_entries: usize,
    /// Cache files currently on disk (re-listed at call time).
    pub disk_entries: usize,
    /// Rough memory-tier footprint in bytes.
    pub estimated_memory_bytes: usize,
    /// Oldest last-touch timestamp in the memory tier (now when empty).
    pub oldest_entry: DateTime<Utc>,
    /// Newest last-touch timestamp in the memory tier (now when empty).
    pub newest_entry: DateTime<Utc>,
}

impl CacheStats {
    /// Human-readable memory usage (B / KB / MB).
    pub fn formatted_memory_usage(&self) -> String {
        let bytes = self.estimated_memory_bytes;
        if bytes < 1024 {
            format!("{bytes} B")
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}
