//! # hostblock
//!
//! Block distracting websites by rewriting the OS hosts file.
//!
//! Blocked domains are redirected to a loopback address via managed lines
//! in the hosts file, identifiable by a marker comment. Blocks are either
//! indefinite or temporary (time-bound); temporary blocks expire on their
//! own. Everything else in the hosts file — localhost entries, comments,
//! lines added by other tools — is preserved byte-for-byte.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use hostblock::{Blocker, BlockerConfig};
//!
//! let config = BlockerConfig::new(hostblock::platform::hosts_path()?);
//! let mut blocker = Blocker::open(&config)?;
//!
//! // Block indefinitely, or for a while.
//! blocker.block("ads.example.com", None)?;
//! blocker.block("news.example.com", Some(chrono::TimeDelta::minutes(25)))?;
//!
//! // Query state.
//! let blocked: Vec<_> = blocker.list_blocked().collect();
//!
//! // Unblock.
//! blocker.unblock("ads.example.com")?;
//! ```
//!
//! ## Crash safety
//!
//! The hosts file is never edited in place: every reconciliation writes
//! the full new contents to a temporary file in the same directory and
//! atomically renames it over the original. An interrupted write leaves
//! the previous file intact, and a concurrent reader never observes a
//! half-written file.
//!
//! Expiry instants live in a small JSON snapshot next to the hosts file,
//! since the hosts format cannot reliably encode them; the hosts file
//! stays authoritative for *which* domains are blocked, the snapshot for
//! *until when*.
//!
//! ## Permissions
//!
//! Editing the system hosts file requires elevation (root or an
//! Administrator shell). The caller is responsible for privilege
//! elevation; use [`BlockError::is_permission_denied`] to detect the
//! failure mode.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod backup;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod line;
pub mod platform;
pub mod quote;
pub mod store;
pub mod sweeper;
pub mod util;
pub mod validate;

pub use config::BlockerConfig;
pub use engine::Blocker;
pub use entry::BlockEntry;
pub use error::{BlockError, Result};
pub use store::BlockStore;
pub use sweeper::ExpirySweeper;
