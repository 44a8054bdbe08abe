//! Parallel per-instance asset scanning.
//!
//! Instances are fanned out over rayon; each instance walks its asset
//! folders recursively, filtering by platform extensions. Every file goes
//! through the cache first, so repeat scans only touch files that changed.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::DateTime;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use armory_cache::{fingerprint, CacheManager};
use armory_core::{AssetKind, AssetRecord, ConfigError, Platform, ScanError, TradingInstance};

use crate::analysis;
use crate::config;

pub struct AssetScanner {
    trading_root: PathBuf,
    cache: Arc<CacheManager>,
    instances: Vec<TradingInstance>,
}

impl AssetScanner {
    pub fn new(trading_root: impl Into<PathBuf>, cache: Arc<CacheManager>) -> Self {
        Self {
            trading_root: trading_root.into(),
            cache,
            instances: Vec::new(),
        }
    }

    /// Loads instances from the config file under the trading root.
    /// Returns how many were loaded.
    pub fn load_instances(&mut self) -> Result<usize, ConfigError> {
        self.instances = config::load_instances(&self.trading_root)?;
        Ok(self.instances.len())
    }

    pub fn instances(&self) -> &[TradingInstance] {
        &self.instances
    }

    pub fn instances_for_platform(&self, platform: Platform) -> Vec<&TradingInstance> {
        self.instances
            .iter()
            .filter(|i| i.platform == platform)
            .collect()
    }

    /// Scans every instance valid for scanning, in parallel. Returns assets
    /// grouped by instance name.
    ///
    /// Fails only when the trading root itself is not a directory;
    /// per-instance and per-file problems are logged and skipped.
    pub fn scan_all_instances(&self) -> Result<HashMap<String, Vec<AssetRecord>>, ScanError> {
        if !self.trading_root.is_dir() {
            return Err(ScanError::InvalidRoot {
                path: self.trading_root.clone(),
            });
        }

        let targets: Vec<&TradingInstance> = self
            .instances
            .iter()
            .filter(|i| i.is_valid_for_scanning())
            .collect();
        if targets.is_empty() {
            warn!("no instances valid for scanning");
            return Ok(HashMap::new());
        }

        info!(instances = targets.len(), "starting parallel instance scan");
        let results: HashMap<String, Vec<AssetRecord>> = targets
            .par_iter()
            .map(|instance| (instance.name.clone(), self.scan_instance(instance)))
            .collect();

        let total: usize = results.values().map(Vec::len).sum();
        info!(assets = total, "scan complete");
        Ok(results)
    }

    /// Scans a single instance's asset folders.
    pub fn scan_instance(&self, instance: &TradingInstance) -> Vec<AssetRecord> {
        let mut assets = Vec::new();
        for folder in instance.scan_folders() {
            if !folder.is_dir() {
                continue;
            }
            self.walk_folder(&folder, instance, &mut assets);
        }
        debug!(
            instance = %instance.name,
            platform = %instance.platform,
            count = assets.len(),
            "instance scanned"
        );
        assets
    }

    fn walk_folder(&self, dir: &Path, instance: &TradingInstance, out: &mut Vec<AssetRecord>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "skipping unreadable folder");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.walk_folder(&path, instance, out);
            } else if matches_platform_extension(&path, instance.platform) {
                if let Some(record) = self.scan_file(&path, instance) {
                    out.push(record);
                }
            }
        }
    }

    /// Scans one asset file, consulting the cache first. A cache hit skips
    /// all file reads beyond the fingerprint check the cache itself does.
    fn scan_file(&self, path: &Path, instance: &TradingInstance) -> Option<AssetRecord> {
        let name = path.file_stem()?.to_string_lossy().to_string();
        let key = format!("{}:{}:{}", instance.platform, instance.name, name);

        if let Some(cached) = self.cache.get(&key) {
            return Some(cached);
        }

        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable file");
                return None;
            }
        };

        let record = AssetRecord {
            name,
            platform: instance.platform,
            kind: AssetKind::from_path(path, instance.platform),
            instance_name: instance.name.clone(),
            file_path: path.to_path_buf(),
            file_size: metadata.len(),
            last_modified: metadata
                .modified()
                .map(Into::into)
                .unwrap_or(DateTime::UNIX_EPOCH),
            version: analysis::extract_version(path),
            quick_fingerprint: fingerprint::quick_fingerprint(path),
            full_fingerprint: fingerprint::full_fingerprint(path),
            conversion_complexity: analysis::conversion_complexity(path),
            ..AssetRecord::default()
        };

        Some(self.cache.put(&key, record))
    }
}

fn matches_platform_extension(path: &Path, platform: Platform) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| platform.asset_extensions().contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_is_per_platform() {
        assert!(matches_platform_extension(
            Path::new("a/Experts/ea.EX4"),
            Platform::Mt4
        ));
        assert!(!matches_platform_extension(
            Path::new("a/Experts/ea.ex5"),
            Platform::Mt4
        ));
        assert!(matches_platform_extension(
            Path::new("Robots/bot.dll"),
            Platform::TraderEvolution
        ));
        assert!(!matches_platform_extension(
            Path::new("README"),
            Platform::Mt4
        ));
    }
}
