//! Health check and monitoring routes

use crate::AppState;
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: std::time::SystemTime,
}

/// Health check endpoint - GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: std::time::SystemTime::now(),
    })
}

/// Readiness response
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub timestamp: std::time::SystemTime,
}

/// Readiness check endpoint - GET /ready
///
/// Runs a quick validation to ensure the pipeline is wired up.
pub async fn ready_handler(State(state): State<Arc<AppState>>) -> Json<ReadinessResponse> {
    let is_ready = match state.validator.validate("probe@example.com").await {
        Ok(_) => true,
        Err(e) => {
            warn!("readiness check failed: {}", e);
            false
        }
    };

    Json(ReadinessResponse {
        ready: is_ready,
        timestamp: std::time::SystemTime::now(),
    })
}

/// Statistics response
#[derive(Serialize)]
pub struct StatsResponse {
    pub version: String,
    pub lists: usize,
    pub results: usize,
    pub cached_domains: usize,
    pub timestamp: std::time::SystemTime,
}

/// Statistics endpoint - GET /admin/stats
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        lists: state.store.list_count(),
        results: state.store.result_count(),
        cached_domains: state.resolver.cache_len(),
        timestamp: std::time::SystemTime::now(),
    })
}

/// Cache response
#[derive(Serialize)]
pub struct CacheResponse {
    pub message: String,
    pub timestamp: std::time::SystemTime,
}

/// Cache clearing endpoint - POST /admin/cache/clear
pub async fn clear_cache_handler(State(state): State<Arc<AppState>>) -> Json<CacheResponse> {
    state.resolver.clear_cache();

    info!("domain record cache cleared by admin request");

    Json(CacheResponse {
        message: "domain record cache cleared".to_string(),
        timestamp: std::time::SystemTime::now(),
    })
}
