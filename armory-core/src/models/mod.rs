//! Data models shared across the workspace.

mod asset_kind;
mod asset_record;
mod cache_stats;
mod instance;

pub use asset_kind::AssetKind;
pub use asset_record::{AssetRecord, Complexity, DeploymentStatus};
pub use cache_stats::CacheStats;
pub use instance::{InstanceConfig, TradingInstance};
