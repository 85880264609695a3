//! Response DTOs for the caching service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::client::RowSet;

/// Response body for range reads (GET /tables/:resource/rows)
#[derive(Debug, Clone, Serialize)]
pub struct RowsResponse {
    /// The named resource that was read
    pub resource: String,
    /// The column range that was read
    pub range: String,
    /// The tabular payload
    pub rows: Vec<Vec<String>>,
}

impl From<RowSet> for RowsResponse {
    fn from(set: RowSet) -> Self {
        Self {
            resource: set.resource,
            range: set.range,
            rows: set.rows,
        }
    }
}

/// Response body for batch reads (POST /tables/batch)
#[derive(Debug, Clone, Serialize)]
pub struct BatchReadResponse {
    /// One result per requested range, in normalized order
    pub results: Vec<RowsResponse>,
}

impl BatchReadResponse {
    /// Creates a response from the gateway's combined result.
    pub fn new(results: Vec<RowSet>) -> Self {
        Self {
            results: results.into_iter().map(RowsResponse::from).collect(),
        }
    }
}

/// Response body for row mutations
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    /// Success message
    pub message: String,
    /// The resource that was written to
    pub resource: String,
}

impl MutationResponse {
    /// Creates a new MutationResponse.
    pub fn new(action: &str, resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self {
            message: format!("Row {} on '{}'", action, resource),
            resource,
        }
    }
}

/// Response body for the refresh webhook (POST /refresh)
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    /// Success message
    pub message: String,
    /// The resource that was refetched
    pub resource: String,
    /// The range that was refetched
    pub range: String,
    /// Number of rows in the replaced entry
    pub row_count: usize,
}

impl RefreshResponse {
    /// Creates a new RefreshResponse.
    pub fn new(resource: impl Into<String>, range: impl Into<String>, row_count: usize) -> Self {
        let resource = resource.into();
        let range = range.into();
        Self {
            message: format!("Cache entry for '{}' {} replaced", resource, range),
            resource,
            range,
            row_count,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of capacity evictions
    pub evictions: u64,
    /// Number of entries removed because their TTL lapsed
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics.
    pub fn new(
        hits: u64,
        misses: u64,
        evictions: u64,
        expirations: u64,
        total_entries: usize,
    ) -> Self {
        let total_requests = hits + misses;
        let hit_rate = if total_requests > 0 {
            hits as f64 / total_requests as f64
        } else {
            0.0
        };
        Self {
            hits,
            misses,
            evictions,
            expirations,
            total_entries,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
