//! API Handlers
//!
//! HTTP request handlers for each caching service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::gateway::{TableGateway, FULL_RANGE};
use crate::models::{
    BatchReadRequest, BatchReadResponse, HealthResponse, MutationResponse, RefreshRequest,
    RefreshResponse, RowRequest, RowsResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through facade over the tabular backend
    pub gateway: Arc<TableGateway>,
    /// Bearer secret for the refresh webhook; empty rejects everything
    pub refresh_secret: Arc<String>,
}

impl AppState {
    /// Creates a new AppState with the given gateway and webhook secret.
    pub fn new(gateway: TableGateway, refresh_secret: impl Into<String>) -> Self {
        Self {
            gateway: Arc::new(gateway),
            refresh_secret: Arc::new(refresh_secret.into()),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        use crate::cache::CacheStore;
        use crate::client::{HttpConnector, SharedTableClient};

        let store = CacheStore::new(config.max_entries);
        let client = SharedTableClient::new(Box::new(HttpConnector::new(
            config.backend_url.clone(),
            config.backend_api_key.clone(),
        )));
        let gateway = TableGateway::new(
            store,
            client,
            config.ttl_settings(),
            config.resource_catalog(),
        );
        Self::new(gateway, config.refresh_secret.clone())
    }
}

// == Webhook Auth ==
/// Checks the bearer token against the configured secret.
///
/// Runs before any cache or backend interaction. The comparison is constant
/// time, and an empty configured secret rejects every token.
fn authorize_refresh(headers: &HeaderMap, secret: &str) -> Result<()> {
    let header = headers.get(AUTHORIZATION).ok_or(ServiceError::MissingAuth)?;
    let value = header.to_str().map_err(|_| ServiceError::MissingAuth)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(ServiceError::MissingAuth)?;

    if secret.is_empty() {
        warn!("refresh webhook called but no REFRESH_SECRET is configured");
        return Err(ServiceError::BadToken);
    }
    if !bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        return Err(ServiceError::BadToken);
    }
    Ok(())
}

/// Query parameters for range reads.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Column range to read; defaults to the resource's full range
    pub range: Option<String>,
}

/// Handler for GET /tables/:resource/rows
///
/// Reads rows through the cache; the canonical full range is used when no
/// range parameter is given.
pub async fn read_rows_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RowsResponse>> {
    let range = query.range.unwrap_or_else(|| FULL_RANGE.to_string());
    let rows = state.gateway.read_range(&resource, &range).await?;
    Ok(Json(RowsResponse::from(rows)))
}

/// Handler for POST /tables/batch
///
/// Coalesces several range reads into one backend call.
pub async fn read_batch_handler(
    State(state): State<AppState>,
    Json(req): Json<BatchReadRequest>,
) -> Result<Json<BatchReadResponse>> {
    let results = state.gateway.read_batch(&req.requests).await?;
    Ok(Json(BatchReadResponse::new(results)))
}

/// Handler for POST /tables/:resource/rows
///
/// Appends a row and invalidates the resource's canonical cache key.
pub async fn append_row_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(req): Json<RowRequest>,
) -> Result<Json<MutationResponse>> {
    req.validate()?;
    state.gateway.append_row(&resource, &req.values).await?;
    Ok(Json(MutationResponse::new("appended", resource)))
}

/// Handler for PUT /tables/:resource/rows/:index
///
/// Replaces a row and invalidates the resource's canonical cache key.
pub async fn update_row_handler(
    State(state): State<AppState>,
    Path((resource, index)): Path<(String, usize)>,
    Json(req): Json<RowRequest>,
) -> Result<Json<MutationResponse>> {
    req.validate()?;
    state
        .gateway
        .update_row(&resource, index, &req.values)
        .await?;
    Ok(Json(MutationResponse::new("updated", resource)))
}

/// Handler for DELETE /tables/:resource/rows/:index
///
/// Deletes a row and invalidates the resource's canonical cache key.
pub async fn delete_row_handler(
    State(state): State<AppState>,
    Path((resource, index)): Path<(String, usize)>,
) -> Result<Json<MutationResponse>> {
    state.gateway.delete_row(&resource, index).await?;
    Ok(Json(MutationResponse::new("deleted", resource)))
}

/// Handler for POST /refresh
///
/// Authenticated webhook forcing a refetch-and-replace of one cache entry.
/// Auth and validation run before anything touches the cache or the
/// backend; a failed refetch leaves the prior entry in place.
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    authorize_refresh(&headers, &state.refresh_secret)?;
    let (resource, range) = req.validate()?;
    let rows = state.gateway.refresh(&resource, &range).await?;
    Ok(Json(RefreshResponse::new(resource, range, rows.rows.len())))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.gateway.stats().await;
    Json(StatsResponse::new(
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.expirations,
        stats.total_entries,
    ))
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
