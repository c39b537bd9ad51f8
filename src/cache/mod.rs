//! Cache Module
//!
//! Provides an in-memory read-through cache with lazy TTL expiration and
//! key/pattern invalidation.

mod clock;
mod entry;
mod key;
mod pattern;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{create_cache_key, KEY_DELIMITER};
pub use pattern::Invalidation;
pub use shared::{Cache, SharedValue};
pub use stats::CacheStats;
pub use store::CacheStore;
