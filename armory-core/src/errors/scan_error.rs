use std::path::PathBuf;

/// Asset-scanning errors.
///
/// Per-file and per-folder problems during a scan are logged and skipped;
/// these variants cover failures that abort a whole scan request.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("trading root is not a directory: {path}")]
    InvalidRoot { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_root_display() {
        let err = ScanError::InvalidRoot {
            path: PathBuf::from("/nope"),
        };
        assert!(err.to_string().contains("/nope"));
    }
}
