//! Single-address validation route

use crate::{
    api_handler::{ApiError, ApiResult, ValidateRequest, ValidateResponse},
    AppState,
};
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// POST /v1/validate
///
/// Runs the full single-address pipeline and persists the result. Blocks the
/// caller for the duration of the (bounded) DNS and probe timeouts.
#[instrument(skip(state, request), fields(request_id))]
pub async fn validate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateRequest>,
) -> ApiResult<ValidateResponse> {
    let request_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", request_id.as_str());

    let result = state
        .validator
        .validate(&request.email)
        .await
        .map_err(ApiError::from)?;

    info!(
        "validated '{}' -> status={}, score={}",
        result.email,
        result.status.as_str(),
        result.score
    );

    state.store.insert_result(result.clone());

    Ok(Json(ValidateResponse { request_id, result }))
}
