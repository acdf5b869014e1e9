//! Blocker configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default redirect address for managed lines.
pub const DEFAULT_REDIRECT: &str = "127.0.0.1";

/// Paths and redirect address for one hosts-file/state pair.
///
/// # Example
///
/// ```
/// use hostblock::BlockerConfig;
///
/// let config = BlockerConfig::new("/etc/hosts").with_redirect("0.0.0.0");
///
/// assert_eq!(config.redirect, "0.0.0.0");
/// assert!(config.snapshot_path.to_str().unwrap().ends_with(".hostblock.json"));
/// ```
#[derive(Debug, Clone)]
pub struct BlockerConfig {
    /// The hosts file being edited.
    pub hosts_path: PathBuf,

    /// The snapshot file carrying expiry metadata the hosts format cannot
    /// reliably encode. Defaults to `<hosts_path>.hostblock.json`.
    pub snapshot_path: PathBuf,

    /// Backup of the original hosts file, taken before the first edit.
    /// Defaults to `<hosts_path>.orig`.
    pub backup_path: PathBuf,

    /// Loopback (or blackhole) address blocked domains resolve to.
    pub redirect: String,
}

impl BlockerConfig {
    /// Creates a config for `hosts_path` with default sibling paths and
    /// the `127.0.0.1` redirect.
    #[must_use]
    pub fn new(hosts_path: impl Into<PathBuf>) -> Self {
        let hosts_path = hosts_path.into();
        Self {
            snapshot_path: sibling(&hosts_path, ".hostblock.json"),
            backup_path: sibling(&hosts_path, ".orig"),
            redirect: DEFAULT_REDIRECT.to_string(),
            hosts_path,
        }
    }

    /// Overrides the snapshot path.
    #[must_use]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    /// Overrides the backup path.
    #[must_use]
    pub fn with_backup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_path = path.into();
        self
    }

    /// Overrides the redirect address.
    #[must_use]
    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = redirect.into();
        self
    }
}

/// Appends `suffix` to the full file name (`hosts` → `hosts.orig`).
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
