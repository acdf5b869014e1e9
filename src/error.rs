//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for blocking operations.
pub type Result<T> = std::result::Result<T, BlockError>;

/// Errors returned by blocking operations.
#[derive(Debug, Error)]
pub enum BlockError {
    /// The hosts file (or snapshot) could not be read or written for a
    /// reason other than absence. Fatal: the operation is aborted and the
    /// in-memory state is left unchanged.
    #[error("storage unavailable at {path}: {source}")]
    StorageUnavailable {
        /// The file that could not be accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Attempted to block a domain that is already blocked.
    #[error("{domain} is already blocked")]
    AlreadyBlocked {
        /// The domain in question.
        domain: String,
    },

    /// Attempted to unblock a domain that is not blocked.
    #[error("{domain} is not blocked")]
    NotBlocked {
        /// The domain in question.
        domain: String,
    },

    /// A temporary block was given a negative duration, or one so large
    /// the expiry instant is unrepresentable.
    #[error("invalid block duration ({seconds}s)")]
    InvalidDuration {
        /// The rejected duration, in seconds.
        seconds: i64,
    },

    /// No backup exists to restore the hosts file from.
    #[error("no hosts file backup found at {path}")]
    BackupMissing {
        /// The expected backup path.
        path: PathBuf,
    },

    /// The current OS has no known hosts file location.
    #[error("unsupported operating system: {os}")]
    UnsupportedPlatform {
        /// `std::env::consts::OS` for the running platform.
        os: &'static str,
    },
}

impl BlockError {
    /// Returns `true` for errors that should abort the process with a
    /// non-zero exit code, as opposed to expected user-facing conditions
    /// like [`BlockError::AlreadyBlocked`].
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { .. }
                | Self::BackupMissing { .. }
                | Self::UnsupportedPlatform { .. }
        )
    }

    /// Returns `true` if the underlying I/O error is `PermissionDenied`
    /// (typically: editing the hosts file without elevation).
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied
        )
    }
}
