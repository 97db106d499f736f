//! # HTTP Routes
//!
//! Trigger and inspection endpoints over the sync engine.
//!
//! ## Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           HTTP Surface                                  │
//! │                                                                         │
//! │  POST /sync                 run all four stages                         │
//! │  POST /sync/companies       run one stage                               │
//! │  POST /sync/units                                                       │
//! │  POST /sync/sectors                                                     │
//! │  POST /sync/jobs                                                        │
//! │  GET  /sync/statistics      last run's statistics snapshot              │
//! │  GET  /health               liveness + database check                   │
//! │                                                                         │
//! │  Envelope: { "success": bool, "message": str, "statistics": ... }       │
//! │  Full runs carry the whole SyncStats; single-stage runs carry that      │
//! │  entity's counters. An aborted run answers 502 with partial stats.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use socsync_core::SyncEntity;

use crate::error::ApiError;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sync", post(sync_all))
        .route("/sync/companies", post(sync_companies))
        .route("/sync/units", post(sync_units))
        .route("/sync/sectors", post(sync_sectors))
        .route("/sync/jobs", post(sync_jobs))
        .route("/sync/statistics", get(statistics))
        .route("/health", get(health))
        .with_state(state)
}

// =============================================================================
// Sync Triggers
// =============================================================================

async fn sync_all(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    info!("Full sync requested");
    let result = state.engine.sync_all().await;
    let stats = state.record_run(result).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Sync completed",
        "statistics": stats,
    })))
}

async fn sync_companies(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    info!("Company sync requested");
    let result = state.engine.sync_companies().await;
    let stats = state.record_run(result).await?;
    Ok(entity_response(SyncEntity::Company, "Companies synchronized", &stats))
}

async fn sync_units(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    info!("Unit sync requested");
    let result = state.engine.sync_units().await;
    let stats = state.record_run(result).await?;
    Ok(entity_response(SyncEntity::Unit, "Units synchronized", &stats))
}

async fn sync_sectors(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    info!("Sector sync requested");
    let result = state.engine.sync_sectors().await;
    let stats = state.record_run(result).await?;
    Ok(entity_response(SyncEntity::Sector, "Sectors synchronized", &stats))
}

async fn sync_jobs(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    info!("Job sync requested");
    let result = state.engine.sync_jobs().await;
    let stats = state.record_run(result).await?;
    Ok(entity_response(SyncEntity::Job, "Jobs synchronized", &stats))
}

/// Single-stage envelope: the triggered entity's counters plus its
/// slice of the error log.
fn entity_response(
    entity: SyncEntity,
    message: &str,
    stats: &socsync_core::SyncStats,
) -> Json<Value> {
    let errors: Vec<_> = stats.errors.iter().filter(|e| e.entity == entity).collect();
    Json(json!({
        "success": true,
        "message": message,
        "statistics": stats.counters(entity),
        "errors": errors,
    }))
}

// =============================================================================
// Inspection
// =============================================================================

async fn statistics(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    match state.last_stats().await {
        Some(stats) => Ok(Json(json!({
            "success": true,
            "message": "Last sync statistics",
            "statistics": stats,
        }))),
        None => Err(ApiError::not_found("No sync run recorded yet")),
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    if !state.engine.database().health_check().await {
        return Err(ApiError::internal("Database unreachable"));
    }

    Ok(Json(json!({
        "success": true,
        "message": "ok",
    })))
}
