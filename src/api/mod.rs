//! API Module
//!
//! HTTP handlers and routing for the caching service REST API.
//!
//! # Endpoints
//! - `GET /tables/:resource/rows` - Cached range read
//! - `POST /tables/:resource/rows` - Append a row
//! - `PUT /tables/:resource/rows/:index` - Update a row
//! - `DELETE /tables/:resource/rows/:index` - Delete a row
//! - `POST /tables/batch` - Coalesced multi-range read
//! - `POST /refresh` - Authenticated cache refresh webhook
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
