//! Client Module
//!
//! The seam between the cache and the external tabular data service: the
//! [`TableService`] trait, its HTTP implementation, and the lazily
//! constructed process-lifetime client handle.

mod api;
mod http;
mod shared;

// Re-export public types
pub use api::{RangeRequest, RowSet, TableService};
pub use http::HttpTableClient;
pub use shared::{Connector, HttpConnector, SharedTableClient, StaticConnector};
