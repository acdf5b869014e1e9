//! In-memory block state and its persistence.
//!
//! [`BlockStore`] is the authoritative set of blocked domains, split into
//! indefinite and temporary entries. It owns loading state from the hosts
//! file (cross-checked against the snapshot) and flushing state back out.
//!
//! Flushing never edits the hosts file in place: the new contents are
//! written to a temporary file in the same directory and renamed over the
//! original, so an interrupted write cannot truncate or corrupt it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::config::BlockerConfig;
use crate::entry::BlockEntry;
use crate::error::{BlockError, Result};
use crate::line;
use crate::util::write_atomic;

/// The blocked-domain state for one hosts-file/snapshot pair.
///
/// Entries are keyed by domain in a `BTreeMap`, so listing and the managed
/// block written to the hosts file are always in lexical domain order.
#[derive(Debug)]
pub struct BlockStore {
    hosts_path: PathBuf,
    snapshot_path: PathBuf,
    redirect: String,
    entries: BTreeMap<String, BlockEntry>,
}

/// On-disk snapshot carrying the expiry metadata the hosts-file format
/// cannot reliably encode.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    indefinitely_blocked: Vec<String>,
    temporarily_blocked: BTreeMap<String, i64>,
}

impl BlockStore {
    /// Loads block state from the hosts file and snapshot.
    ///
    /// A missing hosts file is an empty state (it may be created on the
    /// first flush) and is logged as a warning. The hosts file is
    /// authoritative for which domains are blocked; the snapshot is
    /// authoritative for their expiry instants. Snapshot entries for
    /// domains no longer present in the file are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::StorageUnavailable`] if the hosts file exists
    /// but cannot be read.
    pub fn load(config: &BlockerConfig) -> Result<Self> {
        let content = read_or_empty(&config.hosts_path)?;
        let snapshot = load_snapshot(&config.snapshot_path);

        let mut entries = BTreeMap::new();
        for text in content.lines() {
            let Some(parsed) = line::parse(text, &config.redirect) else {
                continue;
            };
            if !parsed.managed {
                continue;
            }
            let entry = classify(&parsed, &snapshot);
            entries.insert(parsed.domain, entry);
        }

        tracing::debug!(
            path = %config.hosts_path.display(),
            blocked = entries.len(),
            "Loaded block state"
        );

        Ok(Self {
            hosts_path: config.hosts_path.clone(),
            snapshot_path: config.snapshot_path.clone(),
            redirect: config.redirect.clone(),
            entries,
        })
    }

    /// Rewrites the hosts file and snapshot to match the in-memory state.
    ///
    /// The current file is re-read so that lines not owned by this crate
    /// pass through byte-identical and in their original order, including
    /// any edits made by other tools since [`load`](Self::load). Exactly
    /// one managed line is emitted per entry, appended after the unmanaged
    /// lines in lexical domain order. Both files are replaced atomically.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::StorageUnavailable`] if either file cannot be
    /// read or written. The in-memory state is not touched.
    pub fn flush(&self) -> Result<()> {
        let current = read_or_empty(&self.hosts_path)?;

        let mut out = String::with_capacity(current.len() + 64 * self.entries.len());
        for raw in current.split_inclusive('\n') {
            if line::parse(raw, &self.redirect).is_none_or(|p| !p.managed) {
                out.push_str(raw);
            }
        }
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        for (domain, entry) in &self.entries {
            out.push_str(&line::render(domain, *entry, &self.redirect));
        }

        write_atomic(&self.hosts_path, &out)
            .map_err(|source| storage_error(&self.hosts_path, source))?;
        self.save_snapshot()
    }

    /// Returns the entry for `domain`, if any.
    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&BlockEntry> {
        self.entries.get(domain)
    }

    /// Inserts or replaces the entry for `domain`, returning the previous
    /// entry if there was one.
    pub fn insert(&mut self, domain: String, entry: BlockEntry) -> Option<BlockEntry> {
        self.entries.insert(domain, entry)
    }

    /// Removes the entry for `domain`, whichever class holds it.
    pub fn remove(&mut self, domain: &str) -> Option<BlockEntry> {
        self.entries.remove(domain)
    }

    /// Takes every entry out of the store, leaving it empty.
    ///
    /// The returned map can be handed back to
    /// [`restore_all`](Self::restore_all) to roll back a batch removal
    /// whose flush failed.
    pub fn take_all(&mut self) -> BTreeMap<String, BlockEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Puts back entries previously removed with [`take_all`](Self::take_all).
    pub fn restore_all(&mut self, entries: BTreeMap<String, BlockEntry>) {
        self.entries.extend(entries);
    }

    /// Iterates over all entries in lexical domain order, including
    /// expired-but-unswept ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BlockEntry)> {
        self.entries.iter().map(|(d, e)| (d.as_str(), e))
    }

    /// Number of entries, including expired-but-unswept ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no domains are blocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The hosts file this store reconciles against.
    #[must_use]
    pub fn hosts_path(&self) -> &Path {
        &self.hosts_path
    }

    /// The redirect address written on managed lines.
    #[must_use]
    pub fn redirect(&self) -> &str {
        &self.redirect
    }

    /// Serializes the expiry map to the snapshot file.
    fn save_snapshot(&self) -> Result<()> {
        let mut snapshot = Snapshot::default();
        for (domain, entry) in &self.entries {
            match entry {
                BlockEntry::Indefinite => snapshot.indefinitely_blocked.push(domain.clone()),
                BlockEntry::Temporary { unblock_at } => {
                    snapshot
                        .temporarily_blocked
                        .insert(domain.clone(), unblock_at.timestamp());
                }
            }
        }

        let json =
            serde_json::to_string_pretty(&snapshot).map_err(std::io::Error::from).map_err(
                |source| storage_error(&self.snapshot_path, source),
            )?;
        write_atomic(&self.snapshot_path, &json)
            .map_err(|source| storage_error(&self.snapshot_path, source))
    }
}

/// Resolves an entry's classification, preferring the snapshot.
///
/// Precedence: snapshot temporary expiry, then snapshot indefinite
/// membership, then whatever the file line itself says.
fn classify(parsed: &line::ParsedEntry, snapshot: &Snapshot) -> BlockEntry {
    if let Some(&secs) = snapshot.temporarily_blocked.get(&parsed.domain) {
        if let Some(unblock_at) = DateTime::from_timestamp(secs, 0) {
            return BlockEntry::Temporary { unblock_at };
        }
    }
    if snapshot.indefinitely_blocked.iter().any(|d| d == &parsed.domain) {
        return BlockEntry::Indefinite;
    }
    parsed.to_entry()
}

/// Reads a file, treating absence as empty contents.
fn read_or_empty(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Hosts file is missing, treating as empty");
            Ok(String::new())
        }
        Err(source) => Err(storage_error(path, source)),
    }
}

/// Deserializes the snapshot, treating absence or corruption as empty.
///
/// The snapshot is a secondary record: losing it only degrades temporary
/// blocks to what the hosts file itself encodes.
fn load_snapshot(path: &Path) -> Snapshot {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Snapshot::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Snapshot unreadable, ignoring");
            return Snapshot::default();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Snapshot corrupt, ignoring");
        Snapshot::default()
    })
}

fn storage_error(path: &Path, source: std::io::Error) -> BlockError {
    BlockError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    }
}
