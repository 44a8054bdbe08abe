use std::path::PathBuf;

/// Disk-tier errors.
///
/// These never cross the public cache API: every caller-facing operation is
/// fail-safe and turns them into misses or dropped writes. They exist for
/// internal propagation and log messages.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("corrupt cache file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("cache file {path} has schema version {found}, newer than supported {supported}")]
    SchemaTooNew {
        path: PathBuf,
        found: u32,
        supported: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_display() {
        let err = CacheError::Io {
            path: PathBuf::from("Cache/MT4_Demo_Foo.json"),
            message: "permission denied".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("MT4_Demo_Foo.json"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn schema_too_new_display() {
        let err = CacheError::SchemaTooNew {
            path: PathBuf::from("entry.json"),
            found: 9,
            supported: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("schema version 9"));
        assert!(msg.contains("supported 1"));
    }
}
