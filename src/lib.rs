//! tabcache - Read-through caching for an external tabular data backend
//!
//! Bounded in-memory caching of results fetched from a slow, rate-limited
//! tabular data service, with write-triggered invalidation and an
//! authenticated refresh webhook.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use gateway::TableGateway;
pub use tasks::spawn_sweep_task;
