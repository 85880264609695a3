//! Configuration Module
//!
//! Handles loading and managing service configuration from environment
//! variables.

use std::env;

use crate::cache::{ResourceCatalog, TtlSettings};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. `REFRESH_SECRET` has no usable default: while it is empty the
/// refresh webhook rejects every request.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in seconds for metadata-class resources
    pub metadata_ttl: u64,
    /// TTL in seconds for aggregate-class resources
    pub aggregate_ttl: u64,
    /// TTL in seconds for raw row data
    pub raw_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Bearer secret for the refresh webhook
    pub refresh_secret: String,
    /// Base URL of the external tabular backend
    pub backend_url: String,
    /// API key exchanged for a backend session token
    pub backend_api_key: String,
    /// Resource names classified as metadata
    pub metadata_resources: Vec<String>,
    /// Resource names classified as aggregate data
    pub aggregate_resources: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `METADATA_TTL` - Metadata TTL in seconds (default: 3600)
    /// - `AGGREGATE_TTL` - Aggregate TTL in seconds (default: 600)
    /// - `RAW_TTL` - Raw row TTL in seconds (default: 120)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REFRESH_SECRET` - Webhook bearer secret (default: empty, webhook disabled)
    /// - `BACKEND_URL` - Tabular backend base URL (default: http://127.0.0.1:8090)
    /// - `BACKEND_API_KEY` - Backend API key (default: empty)
    /// - `METADATA_RESOURCES` - Comma-separated metadata resource names
    /// - `AGGREGATE_RESOURCES` - Comma-separated aggregate resource names
    pub fn from_env() -> Self {
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            metadata_ttl: env::var("METADATA_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            aggregate_ttl: env::var("AGGREGATE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            raw_ttl: env::var("RAW_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            refresh_secret: env::var("REFRESH_SECRET").unwrap_or_default(),
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8090".to_string()),
            backend_api_key: env::var("BACKEND_API_KEY").unwrap_or_default(),
            metadata_resources: env::var("METADATA_RESOURCES")
                .map(|v| split_names(&v))
                .unwrap_or_else(|_| {
                    vec!["categories".to_string(), "settings".to_string()]
                }),
            aggregate_resources: env::var("AGGREGATE_RESOURCES")
                .map(|v| split_names(&v))
                .unwrap_or_else(|_| vec!["users".to_string(), "summary".to_string()]),
        }
    }

    /// Per-category TTL durations for the gateway.
    pub fn ttl_settings(&self) -> TtlSettings {
        TtlSettings {
            metadata_secs: self.metadata_ttl,
            aggregate_secs: self.aggregate_ttl,
            raw_secs: self.raw_ttl,
        }
    }

    /// Resource classification for the gateway.
    pub fn resource_catalog(&self) -> ResourceCatalog {
        ResourceCatalog::new(
            self.metadata_resources.iter().cloned(),
            self.aggregate_resources.iter().cloned(),
        )
    }
}

fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 100,
            metadata_ttl: 3600,
            aggregate_ttl: 600,
            raw_ttl: 120,
            sweep_interval: 60,
            server_port: 3000,
            refresh_secret: String::new(),
            backend_url: "http://127.0.0.1:8090".to_string(),
            backend_api_key: String::new(),
            metadata_resources: vec!["categories".to_string(), "settings".to_string()],
            aggregate_resources: vec!["users".to_string(), "summary".to_string()],
        }
    }
}
