/// Armory library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default cache directory name, resolved relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "Cache";

/// Default maximum number of entries held in the memory tier.
pub const DEFAULT_MAX_MEMORY_ENTRIES: usize = 1000;

/// Default maximum age of a disk cache entry, in hours.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

/// Memory-tier entries untouched for this many minutes are eligible
/// for eviction under capacity pressure.
pub const EVICTION_RECENCY_CUTOFF_MINS: i64 = 30;

/// Extra entries removed beyond the capacity limit during eviction,
/// so eviction does not run on every insert while near the limit.
pub const EVICTION_SLACK: usize = 100;

/// Number of leading bytes folded into the quick fingerprint.
pub const QUICK_FINGERPRINT_PREFIX: usize = 1024;

/// On-disk cache file schema version. Files with a newer version are
/// ignored rather than misread.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Name of the instance configuration file under the trading root.
pub const CONFIG_FILE_NAME: &str = "instances-config.json";

/// Source-file size thresholds (bytes) for the conversion-complexity heuristic.
pub const COMPLEXITY_SIMPLE_MAX_BYTES: u64 = 5_000;
pub const COMPLEXITY_MEDIUM_MAX_BYTES: u64 = 50_000;
