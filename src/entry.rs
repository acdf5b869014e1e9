//! Block entry classification.

use chrono::{DateTime, Utc};

/// How a single domain is blocked.
///
/// The domain itself is the key of the state map, not part of the entry.
/// A domain is blocked in at most one of the two classes at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEntry {
    /// Blocked until explicitly unblocked.
    Indefinite,
    /// Blocked until `unblock_at`, then removed by the expiry sweep.
    Temporary {
        /// The instant at which the block lapses.
        unblock_at: DateTime<Utc>,
    },
}

impl BlockEntry {
    /// Returns `true` if this entry has lapsed at `now`.
    ///
    /// An entry with `unblock_at <= now` is logically expired and must not
    /// be reported as blocked, even while it still sits in memory waiting
    /// for the next sweep. Indefinite entries never expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self, Self::Temporary { unblock_at } if *unblock_at <= now)
    }

    /// Returns the expiry instant for temporary entries.
    #[must_use]
    pub const fn unblock_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Indefinite => None,
            Self::Temporary { unblock_at } => Some(*unblock_at),
        }
    }
}
