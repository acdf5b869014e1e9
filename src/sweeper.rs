//! Periodic expiry sweep.
//!
//! Long-running hosts (a tray app, a daemon) need expired temporary blocks
//! removed without a user action. [`ExpirySweeper`] runs
//! [`Blocker::expire_due`] on a fixed interval from a background thread.
//!
//! The engine performs no internal locking, so the sweeper shares the
//! [`Blocker`] behind a `Mutex` and takes the same exclusive-access
//! discipline as user-triggered operations. The thread is stoppable:
//! [`stop`](ExpirySweeper::stop) wakes it and joins before returning, so
//! no write can happen after shutdown.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Utc;

use crate::engine::Blocker;

/// Handle to a background thread sweeping expired blocks.
#[derive(Debug)]
pub struct ExpirySweeper {
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl ExpirySweeper {
    /// Spawns a sweep of `blocker` every `interval`.
    ///
    /// Sweep failures are logged and do not stop the thread; the next
    /// tick retries.
    #[must_use]
    pub fn spawn(blocker: Arc<Mutex<Blocker>>, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => sweep(&blocker),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
            }
        });
        Self { stop_tx, handle }
    }

    /// Stops the sweep thread and waits for it to exit.
    pub fn stop(self) {
        // Send fails only if the thread already exited.
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            tracing::warn!("Expiry sweep thread panicked");
        }
    }
}

fn sweep(blocker: &Arc<Mutex<Blocker>>) {
    let Ok(mut blocker) = blocker.lock() else {
        tracing::warn!("Block state mutex poisoned, skipping sweep");
        return;
    };
    match blocker.expire_due(Utc::now()) {
        Ok(removed) if removed.is_empty() => {}
        Ok(removed) => tracing::debug!(count = removed.len(), "Sweep removed expired blocks"),
        Err(e) => tracing::warn!(error = %e, "Expiry sweep failed"),
    }
}
