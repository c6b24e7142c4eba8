//! Custom error types for server-backup
//!
//! This module defines the error hierarchy for the backup engine using thiserror
//! for ergonomic error definitions.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Configuration-related errors (bad settings file, bad date pattern)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A filesystem read, write or delete that could not complete
    #[error("I/O error at {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// A copy or archive target that is already present on disk
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// Archive creation errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// The background run could not be joined
    #[error("Worker error: {0}")]
    Worker(String),
}

impl BackupError {
    /// Create an I/O error tagged with the path that failed
    pub fn io(path: impl AsRef<Path>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Check if this is an I/O error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this error was caused by an existing destination
    pub fn is_destination_exists(&self) -> bool {
        matches!(self, Self::DestinationExists(_))
    }

    /// The offending path, when the error carries one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::DestinationExists(path) => Some(path),
            _ => None,
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<zip::result::ZipError> for BackupError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

/// Result type alias for backup operations
pub type BackupResult<T> = Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackupError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_io_error_carries_path() {
        let err = BackupError::io("world/region/r.0.0.mca", "permission denied");
        assert_eq!(
            err.to_string(),
            "I/O error at world/region/r.0.0.mca: permission denied"
        );
        assert!(err.is_io());
        assert_eq!(err.path(), Some(Path::new("world/region/r.0.0.mca")));
    }

    #[test]
    fn test_destination_exists() {
        let err = BackupError::DestinationExists(PathBuf::from("backups/01012025-000000"));
        assert!(err.is_destination_exists());
        assert!(!err.is_io());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let backup_err: BackupError = io_err.into();
        assert!(matches!(backup_err, BackupError::Io { .. }));
    }
}
