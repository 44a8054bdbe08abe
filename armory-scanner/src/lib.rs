//! # armory-scanner
//!
//! Scans configured trading-platform instances for assets (Expert Advisors,
//! indicators, scripts, templates, presets) and returns [`AssetRecord`]s,
//! consulting the cache before touching file contents. Instances are
//! scanned in parallel; per-file and per-folder failures are logged and
//! skipped, never fatal.
//!
//! [`AssetRecord`]: armory_core::AssetRecord

pub mod analysis;
pub mod config;
pub mod scanner;

pub use scanner::AssetScanner;
