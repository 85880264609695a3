//! Expired-Entry Sweep Task
//!
//! Background task that periodically removes expired cache entries, so
//! entries nobody requests again do not occupy capacity until an overflow
//! evicts them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::gateway::SharedStore;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task runs for the life of the process, sleeping for the configured
/// interval between sweeps. It acquires a write lock on the store to remove
/// expired entries.
///
/// # Arguments
/// * `store` - Shared handle to the cache store
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it during graceful
/// shutdown.
pub fn spawn_sweep_task(store: SharedStore, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            // Acquire write lock and sweep expired entries
            let removed = {
                let mut store_guard = store.write().await;
                store_guard.sweep_expired()
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, CacheStore, ManualClock};
    use crate::client::RowSet;
    use crate::gateway::CachedPayload;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn payload(resource: &str) -> CachedPayload {
        CachedPayload::Range(RowSet {
            resource: resource.to_string(),
            range: "A:Z".to_string(),
            rows: vec![vec!["value".to_string()]],
        })
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let store: SharedStore = Arc::new(RwLock::new(CacheStore::with_clock(100, clock.clone())));

        {
            let mut guard = store.write().await;
            guard.set(CacheKey::for_range("users", "A:Z"), payload("users"), 1);
        }

        // entry's TTL lapses before the first sweep tick
        clock.advance_secs(2);
        let handle = spawn_sweep_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let guard = store.read().await;
            assert_eq!(guard.len(), 0, "expired entry should have been swept");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let store: SharedStore = Arc::new(RwLock::new(CacheStore::with_clock(100, clock.clone())));

        {
            let mut guard = store.write().await;
            guard.set(CacheKey::for_range("users", "A:Z"), payload("users"), 3600);
        }

        let handle = spawn_sweep_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let guard = store.read().await;
            assert_eq!(guard.len(), 1, "valid entry should not be swept");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let store: SharedStore = Arc::new(RwLock::new(CacheStore::new(100)));

        let handle = spawn_sweep_task(store, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "task should be finished after abort");
    }
}
