//! Dashboard Cache - read-through TTL cache for a personal dashboard
//!
//! Deduplicates repeated reads of remote record sources across dashboard
//! widgets, with lazy TTL expiry and key/pattern invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{Cache, CacheStore, Invalidation};
pub use config::Config;
pub use dashboard::{DashboardService, MemoryBackend, RecordBackend, Resource};
pub use error::{Error, Result};
