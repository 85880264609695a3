//! Table Gateway
//!
//! The single path through which all reads of the external tabular backend
//! happen: cache first, then one shared in-flight fetch per key, then the
//! backend. Writers go straight to the backend and invalidate the canonical
//! cache key they know about.
//!
//! # Invalidation coverage
//!
//! Mutations delete only the resource's full-range key. Readers using a
//! different range string, and batch composites that include the mutated
//! resource, keep serving their cached data until its TTL lapses. This is a
//! deliberate simplicity trade-off, kept as documented behavior.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{debug, info};

use crate::cache::{CacheKey, CacheStats, CacheStore, ResourceCatalog, TtlSettings};
use crate::client::{RangeRequest, RowSet, SharedTableClient};
use crate::error::{Result, ServiceError};

// == Canonical Range ==
/// The full-range string used as a resource's canonical cache key and as
/// the invalidation target after writes.
pub const FULL_RANGE: &str = "A:Z";

// == Cached Payload ==
/// What the store holds: a single range result or a coalesced batch result.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    /// Result of a single-range read
    Range(RowSet),
    /// Combined result of a batch read, in normalized request order
    Batch(Vec<RowSet>),
}

/// Store shared between the gateway and the background sweep task.
pub type SharedStore = Arc<RwLock<CacheStore<CachedPayload>>>;

type PendingCell = Arc<OnceCell<CachedPayload>>;

// == Table Gateway ==
/// Read-through facade over the external tabular backend.
pub struct TableGateway {
    /// Thread-safe cache store
    cache: SharedStore,
    /// Lazily constructed backend client
    client: SharedTableClient,
    /// In-flight fetches, keyed identically to the cache
    pending: Mutex<HashMap<CacheKey, PendingCell>>,
    /// Per-category TTL durations
    ttl: TtlSettings,
    /// Resource name to TTL category mapping
    catalog: ResourceCatalog,
}

impl TableGateway {
    // == Constructor ==
    /// Creates a gateway over the given store and backend client.
    pub fn new(
        store: CacheStore<CachedPayload>,
        client: SharedTableClient,
        ttl: TtlSettings,
        catalog: ResourceCatalog,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(store)),
            client,
            pending: Mutex::new(HashMap::new()),
            ttl,
            catalog,
        }
    }

    /// Handle to the underlying store, for the background sweep task.
    pub fn cache(&self) -> SharedStore {
        self.cache.clone()
    }

    /// Snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Read Range ==
    /// Reads rows for one resource and column range, cache first.
    ///
    /// On a miss, concurrent callers for the same key share a single
    /// backend fetch; the result is cached with the TTL of the resource's
    /// category. Fetch failures propagate and never touch the cache.
    pub async fn read_range(&self, resource: &str, range: &str) -> Result<RowSet> {
        let key = CacheKey::for_range(resource, range);

        if let Some(CachedPayload::Range(rows)) = self.cached(&key).await {
            debug!(%key, "range cache hit");
            return Ok(rows);
        }

        let cell = self.join_flight(&key).await;
        let outcome = cell
            .get_or_try_init(|| async {
                debug!(%key, "range cache miss, fetching from backend");
                let client = self.client.get().await?;
                let rows = client.fetch_range(resource, range).await?;
                let ttl_secs = self.ttl.duration_secs(self.catalog.category_for(resource));
                self.install(key.clone(), CachedPayload::Range(rows.clone()), ttl_secs)
                    .await;
                Ok::<_, ServiceError>(CachedPayload::Range(rows))
            })
            .await
            .map(|payload| payload.clone());
        self.leave_flight(&key, &cell).await;

        match outcome? {
            CachedPayload::Range(rows) => Ok(rows),
            CachedPayload::Batch(_) => Err(ServiceError::Internal(
                "batch payload stored under a range key".to_string(),
            )),
        }
    }

    // == Read Batch ==
    /// Reads several ranges in one backend call, cached under a composite
    /// key.
    ///
    /// Requests are normalized by sorting, so the same set in any order
    /// hits one cache entry; results come back in normalized order, each
    /// labeled with its resource and range. The composite entry uses the
    /// shortest TTL among its members' categories.
    pub async fn read_batch(&self, requests: &[RangeRequest]) -> Result<Vec<RowSet>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let mut ordered = requests.to_vec();
        ordered.sort();
        let key = CacheKey::for_batch(
            ordered
                .iter()
                .map(|r| (r.resource.as_str(), r.range.as_str())),
        );

        if let Some(CachedPayload::Batch(results)) = self.cached(&key).await {
            debug!(%key, "batch cache hit");
            return Ok(results);
        }

        let ttl_secs = ordered
            .iter()
            .map(|r| self.ttl.duration_secs(self.catalog.category_for(&r.resource)))
            .min()
            .unwrap_or(self.ttl.raw_secs);

        let cell = self.join_flight(&key).await;
        let outcome = cell
            .get_or_try_init(|| async {
                debug!(%key, count = ordered.len(), "batch cache miss, fetching from backend");
                let client = self.client.get().await?;
                let results = client.fetch_batch(&ordered).await?;
                self.install(key.clone(), CachedPayload::Batch(results.clone()), ttl_secs)
                    .await;
                Ok::<_, ServiceError>(CachedPayload::Batch(results))
            })
            .await
            .map(|payload| payload.clone());
        self.leave_flight(&key, &cell).await;

        match outcome? {
            CachedPayload::Batch(results) => Ok(results),
            CachedPayload::Range(_) => Err(ServiceError::Internal(
                "range payload stored under a batch key".to_string(),
            )),
        }
    }

    // == Mutations ==
    /// Appends a row, then invalidates the resource's canonical key.
    pub async fn append_row(&self, resource: &str, values: &[String]) -> Result<()> {
        let client = self.client.get().await?;
        client.append_row(resource, values).await?;
        self.invalidate(resource, FULL_RANGE).await;
        info!(%resource, "row appended, canonical key invalidated");
        Ok(())
    }

    /// Replaces the row at `index`, then invalidates the canonical key.
    pub async fn update_row(&self, resource: &str, index: usize, values: &[String]) -> Result<()> {
        let client = self.client.get().await?;
        client.update_row(resource, index, values).await?;
        self.invalidate(resource, FULL_RANGE).await;
        info!(%resource, index, "row updated, canonical key invalidated");
        Ok(())
    }

    /// Deletes the row at `index`, then invalidates the canonical key.
    pub async fn delete_row(&self, resource: &str, index: usize) -> Result<()> {
        let client = self.client.get().await?;
        client.delete_row(resource, index).await?;
        self.invalidate(resource, FULL_RANGE).await;
        info!(%resource, index, "row deleted, canonical key invalidated");
        Ok(())
    }

    // == Invalidate ==
    /// Drops the cache entry for one resource and range; no-op when absent.
    pub async fn invalidate(&self, resource: &str, range: &str) {
        let key = CacheKey::for_range(resource, range);
        let removed = self.cache.write().await.delete(&key);
        debug!(%key, removed, "invalidated cache key");
    }

    // == Refresh ==
    /// Unconditionally refetches one range and replaces its cache entry.
    ///
    /// This is the webhook path: it bypasses the get-before-fetch check
    /// because the point is to force freshness. On fetch failure the prior
    /// entry, if any, is left untouched: stale-but-present is preferred to
    /// absent-and-erroring on the next read.
    pub async fn refresh(&self, resource: &str, range: &str) -> Result<RowSet> {
        let client = self.client.get().await?;
        let rows = client.fetch_range(resource, range).await?;
        let ttl_secs = self.ttl.duration_secs(self.catalog.category_for(resource));
        let key = CacheKey::for_range(resource, range);
        self.install(key.clone(), CachedPayload::Range(rows.clone()), ttl_secs)
            .await;
        info!(%key, "cache entry refreshed");
        Ok(rows)
    }

    // == Internals ==
    async fn cached(&self, key: &CacheKey) -> Option<CachedPayload> {
        // write lock: a get can lazily remove an expired entry
        self.cache.write().await.get(key)
    }

    async fn install(&self, key: CacheKey, payload: CachedPayload, ttl_secs: u64) {
        self.cache.write().await.set(key, payload, ttl_secs);
    }

    /// Joins the in-flight fetch for `key`, creating it if absent.
    async fn join_flight(&self, key: &CacheKey) -> PendingCell {
        let mut pending = self.pending.lock().await;
        pending
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Retires an in-flight fetch once its outcome is known.
    ///
    /// Only removes the registry slot if it still holds this flight's cell;
    /// a newer flight for the same key keeps its own slot.
    async fn leave_flight(&self, key: &CacheKey, cell: &PendingCell) {
        let mut pending = self.pending.lock().await;
        if let Some(current) = pending.get(key) {
            if Arc::ptr_eq(current, cell) {
                pending.remove(key);
            }
        }
    }
}
