//! Record Backend
//!
//! The remote record provider seam. Production deployments point this at a
//! hosted database; `MemoryBackend` keeps everything in process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::dashboard::Resource;
use crate::error::{Error, Result};

// == Record ==
/// One row of a remote table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Resource-specific fields
    pub data: Value,
}

// == Record Backend ==
/// Async access to the remote tables. Every call may fail with
/// [`Error::Backend`] when the remote side is unreachable.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// All records of `resource`, newest first.
    async fn list(&self, resource: Resource) -> Result<Vec<Record>>;

    /// Records created at or after `since`, oldest first.
    async fn list_since(&self, resource: Resource, since: DateTime<Utc>) -> Result<Vec<Record>>;

    async fn create(&self, resource: Resource, data: Value) -> Result<Record>;

    /// Applies `updates` over the record's fields.
    async fn update(&self, resource: Resource, id: u64, updates: Value) -> Result<Record>;

    async fn delete(&self, resource: Resource, id: u64) -> Result<()>;
}

// == Memory Backend ==
/// In-process backend with an offline switch for simulating remote failures.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<Resource, Vec<Record>>>,
    next_id: AtomicU64,
    offline: AtomicBool,
    reads: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-filled with a small demo data set.
    pub async fn with_demo_data() -> Result<Self> {
        let backend = Self::new();
        let seed = [
            (Resource::Habits, json!({"name": "Read 20 pages", "color": "#4f46e5"})),
            (Resource::Habits, json!({"name": "Meditate", "color": "#059669"})),
            (Resource::Workouts, json!({"name": "Push day", "exercises": ["bench", "dips"]})),
            (Resource::Runs, json!({"distance_km": 5.2, "duration_min": 27})),
            (Resource::Transactions, json!({"type": "income", "amount": 2500.0, "category": "salary"})),
            (Resource::Transactions, json!({"type": "expense", "amount": 640.0, "category": "rent"})),
            (Resource::Transactions, json!({"type": "expense", "amount": 82.5, "category": "groceries"})),
            (Resource::Appointments, json!({"title": "Dentist", "location": "Main St"})),
        ];

        for (resource, data) in seed {
            backend.create(resource, data).await?;
        }
        backend.reads.store(0, Ordering::SeqCst);
        Ok(backend)
    }

    /// While offline, every call fails as if the network were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of read calls served so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::Backend("record backend unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    fn not_found(resource: Resource, id: u64) -> Error {
        Error::NotFound(format!("{} record {}", resource, id))
    }
}

#[async_trait]
impl RecordBackend for MemoryBackend {
    async fn list(&self, resource: Resource) -> Result<Vec<Record>> {
        self.check_online()?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        let tables = self.tables.read().await;
        let mut records = tables.get(&resource).cloned().unwrap_or_default();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn list_since(&self, resource: Resource, since: DateTime<Utc>) -> Result<Vec<Record>> {
        self.check_online()?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        let tables = self.tables.read().await;
        let mut records: Vec<Record> = tables
            .get(&resource)
            .map(|rows| rows.iter().filter(|r| r.created_at >= since).cloned().collect())
            .unwrap_or_default();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn create(&self, resource: Resource, data: Value) -> Result<Record> {
        self.check_online()?;

        let now = Utc::now();
        let record = Record {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            created_at: now,
            updated_at: now,
            data,
        };

        self.tables
            .write()
            .await
            .entry(resource)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, resource: Resource, id: u64, updates: Value) -> Result<Record> {
        self.check_online()?;

        let mut tables = self.tables.write().await;
        let record = tables
            .get_mut(&resource)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| Self::not_found(resource, id))?;

        match (&mut record.data, updates) {
            (Value::Object(fields), Value::Object(changes)) => fields.extend(changes),
            (data, replacement) => *data = replacement,
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, resource: Resource, id: u64) -> Result<()> {
        self.check_online()?;

        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(&resource)
            .ok_or_else(|| Self::not_found(resource, id))?;
        let before = rows.len();
        rows.retain(|r| r.id != id);

        if rows.len() == before {
            return Err(Self::not_found(resource, id));
        }
        Ok(())
    }
}
