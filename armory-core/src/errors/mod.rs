//! Error types shared across the workspace.
//!
//! The cache itself is fail-safe and exposes no error type; these cover the
//! collaborators (config loading, scanning) where failures are reportable.

mod config_error;
mod scan_error;

pub use config_error::ConfigError;
pub use scan_error::ScanError;
