//! Error types for a transfer run.
//!
//! Every failure a run can hit maps to one [`TransferError`] variant. Library
//! code returns these typed errors; the binary wraps them in `anyhow` with
//! context before printing.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures that end (or, under a continue policy, mark) part of a run.
#[derive(Error, Debug)]
pub enum TransferError {
    /// Missing or malformed configuration, including the storage credential.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A directory listing, stat or file open failed.
    #[error("Filesystem access failed for {}: {source}", path.display())]
    FilesystemAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The storage backend rejected or failed an upload.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Internal logic error, e.g. a file outside the configured root.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// A directory sits where only files are expected and the leaf policy rejects it.
    #[error("Unexpected directory at file level: {}", path.display())]
    UnexpectedDirectory { path: PathBuf },
}

impl TransferError {
    pub(crate) fn filesystem(path: &Path, source: io::Error) -> Self {
        TransferError::FilesystemAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Convert a walkdir failure, keeping the path it failed on when known.
    pub(crate) fn from_walk(root: &Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other(message));
        TransferError::FilesystemAccess { path, source }
    }

    /// True for failures tied to a single file rather than to the run as a whole.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            TransferError::Upload(_) | TransferError::FilesystemAccess { .. }
        )
    }
}

/// Failures raised by an upload sink.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to upload {key} to container {container}: {source}")]
    Transfer {
        container: String,
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Storage request for {key} in container {container} failed: {source}")]
    Backend {
        container: String,
        key: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Object {key} already exists in container {container}")]
    AlreadyExists { container: String, key: String },
}

impl UploadError {
    /// Key of the object the failed request targeted.
    pub fn key(&self) -> &str {
        match self {
            UploadError::Transfer { key, .. }
            | UploadError::Backend { key, .. }
            | UploadError::AlreadyExists { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filesystem_error_names_path() {
        let err = TransferError::filesystem(
            Path::new("/data/2021"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("/data/2021"));
        assert!(message.contains("denied"));
        assert!(err.is_per_file());
    }

    #[test]
    fn test_upload_error_is_transparent() {
        let err: TransferError = UploadError::AlreadyExists {
            container: "data".to_string(),
            key: "2021/01/01/a.parquet".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Object 2021/01/01/a.parquet already exists in container data"
        );
        assert!(err.is_per_file());
    }

    #[test]
    fn test_run_level_errors_are_not_per_file() {
        assert!(!TransferError::Configuration("x".into()).is_per_file());
        assert!(!TransferError::InvariantViolation("x".into()).is_per_file());
        assert!(!TransferError::UnexpectedDirectory {
            path: PathBuf::from("/data/2021/01/01/nested"),
        }
        .is_per_file());
    }
}
