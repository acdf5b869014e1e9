//! Hosts file location per OS.

use std::path::PathBuf;

use crate::error::{BlockError, Result};

/// Returns the hosts file path for the running OS.
///
/// # Errors
///
/// Returns [`BlockError::UnsupportedPlatform`] when the OS has no known
/// hosts file location.
pub fn hosts_path() -> Result<PathBuf> {
    if cfg!(windows) {
        Ok(PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts"))
    } else if cfg!(unix) {
        Ok(PathBuf::from("/etc/hosts"))
    } else {
        Err(BlockError::UnsupportedPlatform {
            os: std::env::consts::OS,
        })
    }
}
