//! Dashboard Module
//!
//! Data access for dashboard widgets: remote record sources read through the
//! shared cache, and mutations that invalidate what they make stale.

mod backend;
mod resource;
mod service;
mod summary;

pub use backend::{MemoryBackend, Record, RecordBackend};
pub use resource::{Resource, FINANCIAL_SUMMARY_KEY, HABIT_CHECKINS_KEY};
pub use service::DashboardService;
pub use summary::FinancialSummary;
