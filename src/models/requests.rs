//! Request DTOs for the caching service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::client::RangeRequest;
use crate::error::{Result, ServiceError};

/// Request body for the refresh webhook (POST /refresh)
///
/// Both fields are required; they are modeled as options so a missing field
/// surfaces as a 400 validation error rather than a deserialization
/// rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The named resource whose cache entry should be replaced
    #[serde(default)]
    pub resource: Option<String>,
    /// The column range to refetch
    #[serde(default)]
    pub range: Option<String>,
}

impl RefreshRequest {
    /// Validates the request, returning the resource and range.
    pub fn validate(self) -> Result<(String, String)> {
        let resource = self
            .resource
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ServiceError::InvalidRequest("resource is required".to_string()))?;
        let range = self
            .range
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ServiceError::InvalidRequest("range is required".to_string()))?;
        Ok((resource, range))
    }
}

/// Request body for a batch read (POST /tables/batch)
#[derive(Debug, Clone, Deserialize)]
pub struct BatchReadRequest {
    /// The ranges to read in one backend call
    pub requests: Vec<RangeRequest>,
}

/// Request body for row mutations (append and update)
#[derive(Debug, Clone, Deserialize)]
pub struct RowRequest {
    /// Cell values for the row
    pub values: Vec<String>,
}

impl RowRequest {
    /// Validates the request data.
    pub fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(ServiceError::InvalidRequest(
                "values cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
