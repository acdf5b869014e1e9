//! Hosts file backup and restore.
//!
//! A copy of the hosts file is taken before the first edit; the explicit
//! `restore` command copies it back, erasing every managed line. The
//! engine tolerates being re-opened against a freshly restored file: it
//! simply reloads whatever the file says.

use std::path::Path;

use crate::error::{BlockError, Result};
use crate::util::write_atomic;

/// Copies `hosts_path` to `backup_path` unless a backup already exists.
///
/// Returns `true` if a backup was written. An existing backup is never
/// overwritten (it records the pre-hostblock original, not the latest
/// contents), and a missing hosts file means there is nothing to back up;
/// both cases are logged and return `false`.
///
/// # Errors
///
/// Returns [`BlockError::StorageUnavailable`] if the copy fails.
pub fn create(hosts_path: &Path, backup_path: &Path) -> Result<bool> {
    if backup_path.exists() {
        tracing::debug!(path = %backup_path.display(), "Backup already exists, skipping");
        return Ok(false);
    }
    if !hosts_path.exists() {
        tracing::warn!(path = %hosts_path.display(), "Hosts file is missing, nothing to back up");
        return Ok(false);
    }

    std::fs::copy(hosts_path, backup_path).map_err(|source| BlockError::StorageUnavailable {
        path: backup_path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        from = %hosts_path.display(),
        to = %backup_path.display(),
        "Backed up hosts file"
    );
    Ok(true)
}

/// Atomically copies the backup back over the hosts file.
///
/// # Errors
///
/// Returns [`BlockError::BackupMissing`] if no backup exists, or
/// [`BlockError::StorageUnavailable`] if either file cannot be accessed.
pub fn restore(hosts_path: &Path, backup_path: &Path) -> Result<()> {
    let original = match std::fs::read_to_string(backup_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BlockError::BackupMissing {
                path: backup_path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(BlockError::StorageUnavailable {
                path: backup_path.to_path_buf(),
                source,
            });
        }
    };

    write_atomic(hosts_path, &original).map_err(|source| BlockError::StorageUnavailable {
        path: hosts_path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %hosts_path.display(), "Restored hosts file from backup");
    Ok(())
}
