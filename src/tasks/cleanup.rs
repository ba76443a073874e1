//! TTL Sweep Task
//!
//! Background task that periodically removes expired documents from the
//! store: stale cache entries and counters of past days.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::store::{current_timestamp_ms, DocumentStore};

/// Spawns a background task that purges expired documents every
/// `cleanup_interval_secs` seconds.
///
/// The returned handle is aborted during graceful shutdown. A failing sweep
/// is logged and retried on the next tick.
///
/// # Example
/// ```ignore
/// let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    store: Arc<dyn DocumentStore>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            match store.purge_expired(current_timestamp_ms()).await {
                Ok(0) => debug!("TTL sweep: no expired documents found"),
                Ok(removed) => info!("TTL sweep: removed {} expired documents", removed),
                Err(err) => warn!(error = %err, "TTL sweep failed"),
            }
        }
    })
}
