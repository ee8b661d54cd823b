//! API Module
//!
//! HTTP handlers and routing for the thumbnail proxy.
//!
//! # Endpoints
//! - `GET /fetch?url=...` - Fetch content through the coalescing cache
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
