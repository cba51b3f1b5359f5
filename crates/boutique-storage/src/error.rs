//! Error types for the storage bridge

use std::path::PathBuf;

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore)
///
/// The [`StorageBridge`](crate::StorageBridge) never lets these reach its
/// callers; they exist so stores can report what went wrong to the log.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Key cannot be used as a slot name
    #[error("invalid key: '{0}'")]
    InvalidKey(String),

    /// Store refused the operation (quota, permissions, disabled storage)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// IO error on a file-backed slot
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_display() {
        let err = StorageError::InvalidKey("a/b".to_string());
        assert!(err.to_string().contains("invalid key"));

        let err = StorageError::unavailable("quota exceeded");
        assert_eq!(err.to_string(), "storage unavailable: quota exceeded");
    }

    #[test]
    fn io_error_carries_path() {
        let err = StorageError::io_error(
            "/tmp/slot.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/slot.json"));
    }
}
