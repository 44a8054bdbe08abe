use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Logical type of a platform asset, derived from where it lives on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    /// Expert Advisor (MetaTrader automated strategy).
    Expert,
    Indicator,
    Script,
    Library,
    /// TraderEvolution automated strategy.
    Robot,
    Plugin,
    Template,
    Preset,
    Workspace,
    Unknown,
}

impl AssetKind {
    /// Maps a folder name (the immediate parent of a scanned file) to a kind.
    pub fn from_folder_name(folder: &str) -> Self {
        match folder.to_ascii_lowercase().as_str() {
            "experts" => AssetKind::Expert,
            "indicators" => AssetKind::Indicator,
            "scripts" => AssetKind::Script,
            "libraries" => AssetKind::Library,
            "robots" => AssetKind::Robot,
            "plugins" => AssetKind::Plugin,
            "templates" => AssetKind::Template,
            "presets" => AssetKind::Preset,
            "workspaces" => AssetKind::Workspace,
            _ => AssetKind::Unknown,
        }
    }

    /// Classifies a file from its full path, using directory components
    /// first and falling back to extension heuristics per platform.
    pub fn from_path(path: &Path, platform: Platform) -> Self {
        for component in path.iter().rev().skip(1) {
            let kind = Self::from_folder_name(&component.to_string_lossy());
            if kind != AssetKind::Unknown {
                return kind;
            }
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match (platform, ext.as_str()) {
            (Platform::Mt4 | Platform::Mt5, "tpl") => AssetKind::Template,
            (Platform::Mt4 | Platform::Mt5, "set") => AssetKind::Preset,
            (Platform::TraderEvolution, "xml") => AssetKind::Workspace,
            _ => AssetKind::Unknown,
        }
    }
}

impl Default for AssetKind {
    fn default() -> Self {
        AssetKind::Unknown
    }
}
