//! Expiry Sweep Task
//!
//! Background task that periodically removes expired values from the
//! in-memory store.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::backend::MemoryStore;

/// Spawns a background task that periodically purges expired values.
///
/// Reads already treat expired values as absent; the sweep only reclaims
/// memory for keys nobody reads again.
///
/// # Arguments
/// * `store` - Shared in-memory store
/// * `interval_secs` - Seconds between sweeps, at least 1
///
/// # Returns
/// A JoinHandle the host can abort on shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let handle = spawn_purge_task(store.clone(), 1);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_purge_task(store: Arc<MemoryStore>, interval_secs: u64) -> JoinHandle<()> {
    let interval_secs = interval_secs.max(1);
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired();
            if removed > 0 {
                info!("Expiry sweep: removed {} expired values", removed);
            } else {
                debug!("Expiry sweep: no expired values found");
            }
        }
    })
}
