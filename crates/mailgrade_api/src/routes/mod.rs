//! API Routes Module
//!
//! - `validate`: single-address validation
//! - `lists`: bulk batch submission, progress, and export
//! - `health`: health checks and monitoring endpoints

pub mod health;
pub mod lists;
pub mod validate;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build all API routes and return a configured Router
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Validation endpoints
        .route("/v1/validate", post(validate::validate_handler))
        // Bulk batch endpoints
        .route("/v1/lists", post(lists::submit_batch_handler))
        .route("/v1/lists/:id/progress", get(lists::progress_handler))
        .route("/v1/lists/:id/results/export", get(lists::export_handler))
        // Health and monitoring endpoints
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::ready_handler))
        .route("/admin/stats", get(health::stats_handler))
        .route("/admin/cache/clear", post(health::clear_cache_handler))
        .with_state(state)
}
