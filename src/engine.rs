//! The blocking-state reconciliation engine.
//!
//! [`Blocker`] exposes block, unblock, list, and expiry operations over a
//! [`BlockStore`] and keeps the hosts file's managed lines matching the
//! in-memory state after every mutation.
//!
//! # Consistency
//!
//! Validation happens before any mutation, so a rejected call changes
//! nothing. Every successful mutation is followed by a flush; if the flush
//! fails, the in-memory change is rolled back before the error is
//! returned, so memory and disk never diverge.
//!
//! # Concurrency
//!
//! The engine performs no internal locking. Callers embedding it in a
//! multi-threaded host must serialize access to the whole state/file pair,
//! e.g. behind a `Mutex` (see [`crate::sweeper`]).

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::BlockerConfig;
use crate::entry::BlockEntry;
use crate::error::{BlockError, Result};
use crate::store::BlockStore;

/// Reconciles in-memory block state with the hosts file.
///
/// # Example
///
/// ```rust,ignore
/// use hostblock::{Blocker, BlockerConfig};
///
/// let mut blocker = Blocker::open(&BlockerConfig::new("/etc/hosts"))?;
/// blocker.block("news.example.com", Some(chrono::TimeDelta::minutes(25)))?;
/// blocker.block("ads.example.com", None)?;
///
/// let blocked: Vec<_> = blocker.list_blocked().collect();
/// blocker.unblock("ads.example.com")?;
/// ```
#[derive(Debug)]
pub struct Blocker {
    store: BlockStore,
}

impl Blocker {
    /// Loads block state for the configured hosts-file/snapshot pair.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::StorageUnavailable`] if the hosts file exists
    /// but cannot be read. A missing hosts file is an empty state.
    pub fn open(config: &BlockerConfig) -> Result<Self> {
        Ok(Self {
            store: BlockStore::load(config)?,
        })
    }

    /// Blocks `domain`, indefinitely or for `duration`.
    ///
    /// A zero duration is accepted and degenerates to immediate expiry:
    /// the entry is temporary, excluded from listing right away, and
    /// removed by the next [`expire_due`](Self::expire_due) sweep. An
    /// entry that has expired but not yet been swept does not count as
    /// blocked and is replaced.
    ///
    /// # Errors
    ///
    /// - [`BlockError::InvalidDuration`] for a negative duration, or one
    ///   so large the expiry instant is unrepresentable; checked before
    ///   any mutation.
    /// - [`BlockError::AlreadyBlocked`] if `domain` has a live entry in
    ///   either class; the state is left unchanged.
    /// - [`BlockError::StorageUnavailable`] if the flush fails; the
    ///   insertion is rolled back.
    pub fn block(&mut self, domain: &str, duration: Option<TimeDelta>) -> Result<()> {
        let now = Utc::now();
        let entry = match duration {
            None => BlockEntry::Indefinite,
            Some(d) if d < TimeDelta::zero() => {
                return Err(BlockError::InvalidDuration {
                    seconds: d.num_seconds(),
                });
            }
            Some(d) => {
                // `now + d` panics on overflow; an out-of-range expiry is
                // invalid input, not a crash.
                let Some(unblock_at) = now.checked_add_signed(d) else {
                    return Err(BlockError::InvalidDuration {
                        seconds: d.num_seconds(),
                    });
                };
                BlockEntry::Temporary { unblock_at }
            }
        };

        if self.store.get(domain).is_some_and(|e| !e.is_expired(now)) {
            return Err(BlockError::AlreadyBlocked {
                domain: domain.to_string(),
            });
        }

        let previous = self.store.insert(domain.to_string(), entry);

        if let Err(e) = self.store.flush() {
            match previous {
                Some(old) => self.store.insert(domain.to_string(), old),
                None => self.store.remove(domain),
            };
            return Err(e);
        }

        tracing::info!(
            domain = %domain,
            until = ?entry.unblock_at(),
            "Blocked site"
        );
        Ok(())
    }

    /// Unblocks `domain`, whichever class holds it.
    ///
    /// Expired-but-unswept entries are still physically present and are
    /// removed like any other.
    ///
    /// # Errors
    ///
    /// - [`BlockError::NotBlocked`] if `domain` is present in neither
    ///   class; the state is left unchanged.
    /// - [`BlockError::StorageUnavailable`] if the flush fails; the
    ///   removal is rolled back.
    pub fn unblock(&mut self, domain: &str) -> Result<()> {
        let Some(removed) = self.store.remove(domain) else {
            return Err(BlockError::NotBlocked {
                domain: domain.to_string(),
            });
        };

        if let Err(e) = self.store.flush() {
            self.store.insert(domain.to_string(), removed);
            return Err(e);
        }

        tracing::info!(domain = %domain, "Unblocked site");
        Ok(())
    }

    /// Removes every domain from both classes and returns how many were
    /// removed.
    ///
    /// An already-empty state is a success reporting zero, with no file
    /// I/O. The file is flushed once at the end, not once per domain.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::StorageUnavailable`] if the flush fails; all
    /// removals are rolled back.
    pub fn unblock_all(&mut self) -> Result<usize> {
        if self.store.is_empty() {
            return Ok(0);
        }

        let removed = self.store.take_all();
        let count = removed.len();
        if let Err(e) = self.store.flush() {
            self.store.restore_all(removed);
            return Err(e);
        }

        tracing::info!(count, "Unblocked all sites");
        Ok(count)
    }

    /// Iterates over currently-blocked domains in lexical order.
    ///
    /// The expiry predicate is applied live: a temporary entry whose
    /// deadline has passed is excluded even before the sweep removes it.
    /// The iterator is lazy, finite, and can be re-created at any time.
    pub fn list_blocked(&self) -> impl Iterator<Item = &str> {
        let now = Utc::now();
        self.store
            .iter()
            .filter(move |(_, entry)| !entry.is_expired(now))
            .map(|(domain, _)| domain)
    }

    /// Returns `true` if `domain` has a live block.
    #[must_use]
    pub fn is_blocked(&self, domain: &str) -> bool {
        self.store
            .get(domain)
            .is_some_and(|e| !e.is_expired(Utc::now()))
    }

    /// Removes every temporary entry whose deadline has passed and returns
    /// the removed domains.
    ///
    /// Flushes only when at least one entry was removed. Call this eagerly
    /// before reads to keep the file current, or periodically via
    /// [`crate::sweeper::ExpirySweeper`].
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::StorageUnavailable`] if the flush fails; the
    /// removals are rolled back.
    pub fn expire_due(&mut self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let due: Vec<String> = self
            .store
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(domain, _)| domain.to_string())
            .collect();
        if due.is_empty() {
            return Ok(due);
        }

        let mut removed = std::collections::BTreeMap::new();
        for domain in &due {
            if let Some(entry) = self.store.remove(domain) {
                removed.insert(domain.clone(), entry);
            }
        }

        if let Err(e) = self.store.flush() {
            self.store.restore_all(removed);
            return Err(e);
        }

        tracing::info!(expired = ?due, "Expired temporary blocks");
        Ok(due)
    }

    /// The underlying state store.
    #[must_use]
    pub const fn store(&self) -> &BlockStore {
        &self.store
    }
}
