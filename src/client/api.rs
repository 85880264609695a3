//! Backend service interface.
//!
//! The external tabular service is opaque to this crate: a latency- and
//! rate-limited read/write API returning rows for a named resource and a
//! column range. Everything above the client talks to it through the
//! [`TableService`] trait so tests can substitute a stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// == Row Set ==
/// Rows fetched for one resource and column range.
///
/// Carries its own labels so batch results can be matched by label rather
/// than by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSet {
    /// The named resource the rows came from
    pub resource: String,
    /// The column range that was read
    pub range: String,
    /// The tabular payload
    pub rows: Vec<Vec<String>>,
}

// == Range Request ==
/// One (resource, range) read within a batch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RangeRequest {
    /// The named resource to read
    pub resource: String,
    /// The column range to read
    pub range: String,
}

// == Table Service Trait ==
/// Read/write interface to the external tabular backend.
#[async_trait]
pub trait TableService: Send + Sync {
    /// Fetches rows for one resource and column range.
    async fn fetch_range(&self, resource: &str, range: &str) -> Result<RowSet>;

    /// Fetches several ranges in one backend call.
    ///
    /// Results are returned in request order, one `RowSet` per request.
    async fn fetch_batch(&self, requests: &[RangeRequest]) -> Result<Vec<RowSet>>;

    /// Appends a row to the resource.
    async fn append_row(&self, resource: &str, values: &[String]) -> Result<()>;

    /// Replaces the row at `index` in the resource.
    async fn update_row(&self, resource: &str, index: usize, values: &[String]) -> Result<()>;

    /// Deletes the row at `index` from the resource.
    async fn delete_row(&self, resource: &str, index: usize) -> Result<()>;
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rowset_serde_roundtrip() {
        let set = RowSet {
            resource: "users".to_string(),
            range: "A:H".to_string(),
            rows: vec![vec!["alice".to_string(), "open".to_string()]],
        };

        let json = serde_json::to_string(&set).unwrap();
        let back: RowSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_range_request_ordering_is_by_resource_then_range() {
        let a = RangeRequest {
            resource: "tickets".to_string(),
            range: "B:C".to_string(),
        };
        let b = RangeRequest {
            resource: "users".to_string(),
            range: "A:H".to_string(),
        };
        assert!(a < b);
    }
}
