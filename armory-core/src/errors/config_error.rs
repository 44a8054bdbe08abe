use std::path::PathBuf;

/// Instance-configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("instance config not found at {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("failed to parse instance config: {reason}")]
    Parse { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("/trading/instances-config.json"),
        };
        assert!(err.to_string().contains("instances-config.json"));
    }

    #[test]
    fn parse_display() {
        let err = ConfigError::Parse {
            reason: "unexpected EOF".to_string(),
        };
        assert!(err.to_string().contains("unexpected EOF"));
    }
}
