//! # armory-cache
//!
//! Two-tier cache for scanned platform assets: a concurrent in-memory tier
//! for instant lookups and a JSON-file-per-key disk tier that survives
//! restarts. Entries are invalidated by a quick content fingerprint
//! (first 1KB + size + mtime), by age on the disk tier, and by recency
//! under memory pressure.
//!
//! All reads are fail-safe: I/O errors, corrupt files, and staleness
//! degrade to cache misses, never to errors.

pub mod disk;
pub mod error;
pub mod fingerprint;
pub mod manager;
pub mod memory;
mod persist;

pub use disk::DiskTier;
pub use error::CacheError;
pub use manager::CacheManager;
pub use memory::MemoryTier;
