//! Trading platform tables: folder layouts, extension filters, executables.
//!
//! The folder lists and extension filters are defaults; an instance may
//! override its asset folders via configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A supported trading platform.
///
/// The serialized spellings (`MT4`, `MT5`, `TraderEvolution`) also appear
/// verbatim in cache keys, so they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "MT4")]
    Mt4,
    #[serde(rename = "MT5")]
    Mt5,
    TraderEvolution,
}

impl Platform {
    /// Stable string form, as used in cache keys and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Mt4 => "MT4",
            Platform::Mt5 => "MT5",
            Platform::TraderEvolution => "TraderEvolution",
        }
    }

    /// Default asset folders for this platform, relative to an instance root.
    pub fn asset_folders(&self, base: &Path) -> Vec<PathBuf> {
        match self {
            Platform::Mt4 => vec![
                base.join("MQL4").join("Indicators"),
                base.join("MQL4").join("Experts"),
                base.join("MQL4").join("Scripts"),
                base.join("MQL4").join("Libraries"),
                base.join("templates"),
                base.join("MQL4").join("Presets"),
            ],
            Platform::Mt5 => vec![
                base.join("MQL5").join("Indicators"),
                base.join("MQL5").join("Experts"),
                base.join("MQL5").join("Scripts"),
                base.join("MQL5").join("Libraries"),
                base.join("templates"),
                base.join("MQL5").join("Presets"),
            ],
            Platform::TraderEvolution => vec![
                base.join("Indicators"),
                base.join("Robots"),
                base.join("Scripts"),
                base.join("Plugins"),
                base.join("Workspaces"),
            ],
        }
    }

    /// File extensions (lowercase, no dot) scanned for this platform.
    pub fn asset_extensions(&self) -> &'static [&'static str] {
        match self {
            Platform::Mt4 => &["ex4", "mq4", "tpl", "set"],
            Platform::Mt5 => &["ex5", "mq5", "tpl", "set"],
            Platform::TraderEvolution => &["dll", "cs", "xml"],
        }
    }

    /// Main terminal executable for this platform.
    pub fn executable_name(&self) -> &'static str {
        match self {
            Platform::Mt4 => "terminal.exe",
            Platform::Mt5 => "terminal64.exe",
            Platform::TraderEvolution => "TradeTerminal.exe",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    /// Case-insensitive parse, matching the original config reader.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MT4" => Ok(Platform::Mt4),
            "MT5" => Ok(Platform::Mt5),
            "TRADEREVOLUTION" => Ok(Platform::TraderEvolution),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}
