//! Dashboard Service
//!
//! Every widget read goes through the shared cache under a key derived from
//! its resource; every successful mutation invalidates that resource and
//! the derived keys that depend on it.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use serde_json::Value;
use tracing::info;

use crate::cache::{Cache, Invalidation};
use crate::cache_key;
use crate::dashboard::{FinancialSummary, Record, RecordBackend, Resource, FINANCIAL_SUMMARY_KEY};
use crate::error::{Error, Result};

// == Dashboard Service ==
#[derive(Clone)]
pub struct DashboardService {
    cache: Cache,
    backend: Arc<dyn RecordBackend>,
}

impl DashboardService {
    /// Wires the shared cache to a backend. Reads live for the cache's
    /// default TTL.
    pub fn new(cache: Cache, backend: Arc<dyn RecordBackend>) -> Self {
        Self { cache, backend }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    // == Reads ==
    /// All records of `resource`, cached under the resource name.
    pub async fn list(&self, resource: Resource) -> Result<Vec<Record>> {
        let backend = self.backend.clone();
        self.cache
            .with_default_ttl(&cache_key![resource], move || async move {
                backend.list(resource).await
            })
            .await
    }

    /// Records created in the last `days` days, cached under
    /// `<resource>:recent:<days>d`.
    ///
    /// A window reaching past the representable date range is rejected.
    pub async fn recent(&self, resource: Resource, days: u32) -> Result<Vec<Record>> {
        let since = TimeDelta::try_days(i64::from(days))
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| Error::InvalidRequest(format!("Window of {} days is out of range", days)))?;

        let backend = self.backend.clone();
        self.cache
            .with_default_ttl(
                &cache_key![resource, "recent", format!("{}d", days)],
                move || async move { backend.list_since(resource, since).await },
            )
            .await
    }

    /// Income, expenses and balance over all transactions.
    pub async fn financial_summary(&self) -> Result<FinancialSummary> {
        let backend = self.backend.clone();
        self.cache
            .with_default_ttl(FINANCIAL_SUMMARY_KEY, move || async move {
                let transactions = backend.list(Resource::Transactions).await?;
                Ok::<_, Error>(FinancialSummary::from_transactions(&transactions))
            })
            .await
    }

    // == Mutations ==
    pub async fn create(&self, resource: Resource, data: Value) -> Result<Record> {
        let record = self.backend.create(resource, data).await?;
        self.invalidate_resource(resource).await;
        Ok(record)
    }

    pub async fn update(&self, resource: Resource, id: u64, updates: Value) -> Result<Record> {
        let record = self.backend.update(resource, id, updates).await?;
        self.invalidate_resource(resource).await;
        Ok(record)
    }

    pub async fn delete(&self, resource: Resource, id: u64) -> Result<()> {
        self.backend.delete(resource, id).await?;
        self.invalidate_resource(resource).await;
        Ok(())
    }

    /// Drops every cached read so the next user starts cold.
    pub async fn sign_out(&self) -> usize {
        self.cache.clear().await
    }

    /// Invalidates `resource` with all its qualified keys, plus dependents.
    async fn invalidate_resource(&self, resource: Resource) -> usize {
        let mut removed = self.cache.invalidate(Invalidation::resource(resource.name())).await;
        for key in resource.dependent_keys() {
            removed += self.cache.invalidate(Invalidation::resource(*key)).await;
        }
        info!(%resource, removed, "Mutation invalidated cached reads");
        removed
    }
}
