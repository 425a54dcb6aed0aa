//! TTL Sweep Task
//!
//! Background task that periodically removes expired local cache entries.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::local::{purge_expired, SharedTable};

/// Shortest interval the sweep will run at.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

// == Sweep Handle ==
/// Owner of a running sweep task.
///
/// Dropping the handle signals the task to stop at its next wakeup.
#[derive(Debug)]
pub struct SweepHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SweepHandle {
    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Stops the task immediately.
    pub fn abort(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Spawns a task that purges expired entries from `table` every `interval`.
///
/// Entries are re-checked under the table's write lock, so an entry refreshed
/// between ticks is never removed.
pub(crate) fn spawn_sweep_task(table: SharedTable, interval: Duration) -> SweepHandle {
    let interval = interval.max(MIN_INTERVAL);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!(?interval, "Starting TTL sweep task");

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("TTL sweep task shutting down");
                        return;
                    }
                }
                _ = tokio::time::sleep(interval) => {}
            }

            if *shutdown_rx.borrow() {
                return;
            }

            let removed = purge_expired(&table).await;

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    });

    SweepHandle {
        shutdown_tx,
        task: Some(task),
    }
}
