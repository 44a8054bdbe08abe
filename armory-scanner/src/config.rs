//! Instance configuration loading.

use std::fs;
use std::path::Path;

use tracing::info;

use armory_core::constants::CONFIG_FILE_NAME;
use armory_core::{ConfigError, InstanceConfig, TradingInstance};

/// Reads `instances-config.json` under `trading_root` and returns the
/// configured instances with their trading root filled in.
pub fn load_instances(trading_root: &Path) -> Result<Vec<TradingInstance>, ConfigError> {
    let path = trading_root.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Err(ConfigError::NotFound { path });
    }

    let json = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let config: InstanceConfig = serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
        reason: e.to_string(),
    })?;

    let mut instances = config.instances;
    for instance in &mut instances {
        instance.trading_root = trading_root.to_path_buf();
    }
    info!(count = instances.len(), "loaded trading instances");
    Ok(instances)
}
