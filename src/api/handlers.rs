//! API Handlers
//!
//! HTTP request handlers. Reads go through the cached dashboard service;
//! writes invalidate what they touch.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::Cache;
use crate::config::Config;
use crate::dashboard::{DashboardService, FinancialSummary, Record, RecordBackend, Resource};
use crate::error::{Error, Result};
use crate::models::{
    DeleteResponse, HealthResponse, InvalidateRequest, InvalidateResponse, ListResponse,
    RecordRequest, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
}

impl AppState {
    pub fn new(dashboard: DashboardService) -> Self {
        Self { dashboard }
    }

    /// Builds the single process cache and wires it to `backend`.
    pub fn from_config(config: &Config, backend: Arc<dyn RecordBackend>) -> Self {
        let cache = Cache::new(config.default_ttl());
        Self::new(DashboardService::new(cache, backend))
    }
}

/// Handler for GET /api/:resource
pub async fn list_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<Json<ListResponse>> {
    let resource: Resource = resource.parse()?;
    let records = state.dashboard.list(resource).await?;

    Ok(Json(ListResponse::new(resource, records)))
}

/// Handler for GET /api/:resource/recent/:days
pub async fn recent_handler(
    State(state): State<AppState>,
    Path((resource, days)): Path<(String, u32)>,
) -> Result<Json<ListResponse>> {
    let resource: Resource = resource.parse()?;
    let records = state.dashboard.recent(resource, days).await?;

    Ok(Json(ListResponse::new(resource, records)))
}

/// Handler for POST /api/:resource
pub async fn create_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<Record>> {
    let resource: Resource = resource.parse()?;
    if let Some(error_msg) = req.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }

    let record = state.dashboard.create(resource, req.data).await?;
    Ok(Json(record))
}

/// Handler for PUT /api/:resource/:id
pub async fn update_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, u64)>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<Record>> {
    let resource: Resource = resource.parse()?;
    if let Some(error_msg) = req.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }

    let record = state.dashboard.update(resource, id, req.data).await?;
    Ok(Json(record))
}

/// Handler for DELETE /api/:resource/:id
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, u64)>,
) -> Result<Json<DeleteResponse>> {
    let resource: Resource = resource.parse()?;
    state.dashboard.delete(resource, id).await?;

    Ok(Json(DeleteResponse::new(resource, id)))
}

/// Handler for GET /summary/financial
pub async fn summary_handler(State(state): State<AppState>) -> Result<Json<FinancialSummary>> {
    Ok(Json(state.dashboard.financial_summary().await?))
}

/// Handler for POST /cache/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    let target = req.into_target()?;
    let removed = state.dashboard.cache().invalidate(target).await;

    Ok(Json(InvalidateResponse { removed }))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.dashboard.sign_out().await;
    Json(InvalidateResponse { removed })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.dashboard.cache().stats().await;
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
