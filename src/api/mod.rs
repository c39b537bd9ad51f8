//! API Module
//!
//! HTTP handlers and routing for the dashboard data API.
//!
//! # Endpoints
//! - `/api/:resource[...]` - Cached reads and invalidating writes
//! - `/summary/financial` - Derived income/expense summary
//! - `/cache[...]` - Manual invalidation and sign-out reset
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
