use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// A configured trading-platform instance (one installed terminal).
///
/// Loaded from `instances-config.json`. The original reader matched keys
/// case-insensitively, so PascalCase spellings are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradingInstance {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Broker")]
    pub broker: String,
    #[serde(alias = "Platform")]
    pub platform: Platform,
    #[serde(alias = "Source")]
    pub source: String,
    #[serde(alias = "Destination")]
    pub destination: String,
    #[serde(alias = "AccountType")]
    pub account_type: String,
    #[serde(alias = "Enabled")]
    pub enabled: bool,
    #[serde(alias = "AutoStart")]
    pub auto_start: bool,

    /// Optional per-instance override of the platform's default asset
    /// folders, relative to the instance path.
    #[serde(alias = "AssetFolders")]
    pub asset_folders: Option<Vec<String>>,

    /// Filled in by the config loader, not present in the file.
    #[serde(skip)]
    pub trading_root: PathBuf,
}

impl Default for TradingInstance {
    fn default() -> Self {
        Self {
            name: String::new(),
            broker: String::new(),
            platform: Platform::Mt4,
            source: String::new(),
            destination: String::new(),
            account_type: String::new(),
            enabled: true,
            auto_start: false,
            asset_folders: None,
            trading_root: PathBuf::new(),
        }
    }
}

impl TradingInstance {
    /// Full path to this instance's terminal folder.
    pub fn instance_path(&self) -> PathBuf {
        self.trading_root
            .join("PlatformInstances")
            .join(&self.destination)
    }

    /// Full path to this instance's data folder.
    pub fn data_path(&self) -> PathBuf {
        self.trading_root
            .join("InstanceData")
            .join(&self.destination)
    }

    /// Asset folders to scan: the per-instance override when present,
    /// otherwise the platform defaults.
    pub fn scan_folders(&self) -> Vec<PathBuf> {
        let base = self.instance_path();
        match &self.asset_folders {
            Some(folders) => folders.iter().map(|f| base.join(f)).collect(),
            None => self.platform.asset_folders(&base),
        }
    }

    /// Whether this instance should be scanned: enabled, fully configured,
    /// and actually present on disk.
    pub fn is_valid_for_scanning(&self) -> bool {
        self.enabled
            && !self.destination.is_empty()
            && !self.trading_root.as_os_str().is_empty()
            && self.instance_path().is_dir()
    }
}

/// Shape of `instances-config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceConfig {
    #[serde(alias = "TradingRoot")]
    pub trading_root: String,
    #[serde(alias = "DefaultDataRoot")]
    pub default_data_root: String,
    #[serde(alias = "Instances")]
    pub instances: Vec<TradingInstance>,
}
