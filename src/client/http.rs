//! HTTP backend client.
//!
//! reqwest implementation of [`TableService`]. Construction performs the
//! authentication handshake (API key exchanged for a session token), so a
//! successfully built client is already authenticated and repeated calls do
//! not repeat the handshake.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{RangeRequest, RowSet, TableService};
use crate::error::{Result, ServiceError};

/// Per-request timeout against the backend.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// == Wire DTOs ==
#[derive(Debug, Deserialize)]
struct SessionBody {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ValuesBody {
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct BatchBody {
    results: Vec<RowSet>,
}

// == HTTP Table Client ==
/// Authenticated handle to the external tabular service.
#[derive(Debug)]
pub struct HttpTableClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTableClient {
    // == Constructor ==
    /// Performs the session handshake and returns an authenticated client.
    ///
    /// Any failure here is an authentication failure: it propagates to the
    /// caller and no handle is produced, so the next attempt starts a fresh
    /// handshake.
    pub async fn connect(base_url: &str, api_key: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let response = http
            .post(format!("{}/v1/sessions", base_url))
            .json(&json!({ "api_key": api_key }))
            .send()
            .await
            .map_err(|e| ServiceError::BackendAuth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::BackendAuth(format!(
                "session handshake returned {}",
                response.status()
            )));
        }

        let body: SessionBody = response
            .json()
            .await
            .map_err(|e| ServiceError::BackendAuth(e.to_string()))?;

        debug!(%base_url, "backend session established");
        Ok(Self {
            http,
            base_url,
            token: body.token,
        })
    }

    /// Maps a non-success backend status to a fetch error.
    fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ServiceError::BackendFetch(
                "backend rate limit exceeded".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ServiceError::BackendFetch(format!(
                "backend returned {}",
                status
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl TableService for HttpTableClient {
    async fn fetch_range(&self, resource: &str, range: &str) -> Result<RowSet> {
        let url = format!("{}/v1/tables/{}/values/{}", self.base_url, resource, range);
        let response = self.http.get(url).bearer_auth(&self.token).send().await?;
        let body: ValuesBody = Self::check_status(response)?.json().await?;

        Ok(RowSet {
            resource: resource.to_string(),
            range: range.to_string(),
            rows: body.rows,
        })
    }

    async fn fetch_batch(&self, requests: &[RangeRequest]) -> Result<Vec<RowSet>> {
        let url = format!("{}/v1/values/batch", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "requests": requests }))
            .send()
            .await?;
        let body: BatchBody = Self::check_status(response)?.json().await?;

        Ok(body.results)
    }

    async fn append_row(&self, resource: &str, values: &[String]) -> Result<()> {
        let url = format!("{}/v1/tables/{}/rows", self.base_url, resource);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": values }))
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }

    async fn update_row(&self, resource: &str, index: usize, values: &[String]) -> Result<()> {
        let url = format!("{}/v1/tables/{}/rows/{}", self.base_url, resource, index);
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": values }))
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }

    async fn delete_row(&self, resource: &str, index: usize) -> Result<()> {
        let url = format!("{}/v1/tables/{}/rows/{}", self.base_url, resource, index);
        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }
}
