//! Shared client handle.
//!
//! One authenticated backend client per process: the handle is built lazily
//! on first use and reused for the process lifetime, so repeated calls do
//! not repeat the authentication handshake.
//!
//! Construct-once-publish-once semantics come from `tokio::sync::OnceCell`:
//! concurrent first callers wait on a single construction (first caller
//! wins), and a failed construction is not memoized, so the next call
//! retries from scratch.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use crate::client::{HttpTableClient, TableService};
use crate::error::Result;

// == Connector Trait ==
/// Builds a backend service handle on first use.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Constructs an authenticated service handle.
    async fn connect(&self) -> Result<Arc<dyn TableService>>;
}

// == HTTP Connector ==
/// Production connector: performs the HTTP session handshake.
pub struct HttpConnector {
    base_url: String,
    api_key: String,
}

impl HttpConnector {
    /// Creates a connector for the given backend URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self) -> Result<Arc<dyn TableService>> {
        let client = HttpTableClient::connect(&self.base_url, &self.api_key).await?;
        info!("backend client constructed");
        Ok(Arc::new(client))
    }
}

// == Static Connector ==
/// Wraps an already-built service handle; used when the service is embedded
/// or substituted in tests.
pub struct StaticConnector(Arc<dyn TableService>);

impl StaticConnector {
    /// Creates a connector that hands out the given service.
    pub fn new(service: Arc<dyn TableService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl Connector for StaticConnector {
    async fn connect(&self) -> Result<Arc<dyn TableService>> {
        Ok(self.0.clone())
    }
}

// == Shared Table Client ==
/// Lazily constructed, process-lifetime backend client handle.
pub struct SharedTableClient {
    cell: OnceCell<Arc<dyn TableService>>,
    connector: Box<dyn Connector>,
}

impl SharedTableClient {
    // == Constructor ==
    /// Creates an unconnected handle; construction happens on first `get`.
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self {
            cell: OnceCell::new(),
            connector,
        }
    }

    // == Get ==
    /// Returns the shared service handle, constructing it on first call.
    ///
    /// Concurrent first callers share one construction. A construction
    /// error propagates to the caller and leaves the cell empty, so the
    /// next call retries.
    pub async fn get(&self) -> Result<Arc<dyn TableService>> {
        let service = self
            .cell
            .get_or_try_init(|| self.connector.connect())
            .await?;
        Ok(service.clone())
    }
}
