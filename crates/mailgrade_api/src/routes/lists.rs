//! Bulk batch routes: submission, progress, export

use crate::{
    api_handler::{ApiError, ApiResult, SubmitBatchRequest, SubmitBatchResponse},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use mailgrade_core::{export, BatchProgress};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// POST /v1/lists
///
/// Accepts a raw candidate list, returns the `SavedList` snapshot
/// immediately; the batch executes out-of-band. Rejected with 400 when
/// nothing survives dedup and the syntax prefilter.
#[instrument(skip(state, request), fields(request_id, batch = %request.name))]
pub async fn submit_batch_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitBatchRequest>,
) -> ApiResult<SubmitBatchResponse> {
    let request_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", request_id.as_str());

    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput("list name must not be empty".to_string()));
    }

    let list = state
        .bulk
        .submit(request.emails, request.name.trim(), request.tags.trim())
        .map_err(ApiError::from)?;

    info!(
        "batch '{}' submitted as {} with {} candidates",
        list.name, list.id, list.total_emails
    );

    Ok(Json(SubmitBatchResponse { request_id, list }))
}

/// GET /v1/lists/{id}/progress
///
/// Read-only progress snapshot, computable at any point in the batch
/// lifecycle.
pub async fn progress_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<BatchProgress> {
    let progress = state.bulk.progress(id).map_err(ApiError::from)?;
    Ok(Json(progress))
}

/// GET /v1/lists/{id}/results/export
///
/// All of the batch's results as delimited text, oldest first.
pub async fn export_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    // 404 before exporting an empty body for a list that never existed
    state.store.get_list(id).map_err(ApiError::from)?;

    let results = state.store.results_for_list(id);
    let body = export::to_delimited(&results);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"validation-results.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}
