//! Request and Response models for the caching service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{BatchReadRequest, RefreshRequest, RowRequest};
pub use responses::{
    BatchReadResponse, ErrorResponse, HealthResponse, MutationResponse, RefreshResponse,
    RowsResponse, StatsResponse,
};
