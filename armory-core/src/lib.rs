//! # armory-core
//!
//! Foundation crate for the Armory trading-asset manager.
//! Defines the asset and instance models, platform tables, errors,
//! and constants. Every other crate in the workspace depends on this.

pub mod constants;
pub mod errors;
pub mod models;
pub mod platform;

// Re-export the most commonly used types at the crate root.
pub use errors::{ConfigError, ScanError};
pub use models::{
    AssetKind, AssetRecord, CacheStats, Complexity, DeploymentStatus, InstanceConfig,
    TradingInstance,
};
pub use platform::Platform;
