//! Assessments proxy handler
//!
//! GET /assessments forwards to the collection endpoint through the
//! single-flight gate: rapid repeat activations (tab switches, refresh
//! clicks) share one upstream request. Upstream failure is non-fatal; the
//! page keeps whatever it was showing and renders the error banner.

use axum::{extract::State, routing::get, Json, Router};
use ecodash_common::api::AssessmentRecord;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /assessments response (normalized; always the lowercase-items shape)
#[derive(Debug, Serialize)]
pub struct AssessmentsResponse {
    pub items: Vec<AssessmentRecord>,
}

/// GET /assessments
pub async fn list_assessments(
    State(state): State<AppState>,
) -> ApiResult<Json<AssessmentsResponse>> {
    let client = state.assessments.clone();
    let result = state
        .fetch_gate
        .run(move || async move {
            client
                .fetch_assessments()
                .await
                .map_err(|e| e.to_string())
        })
        .await;

    match result {
        Ok(items) => {
            // Upstream recovered; stop reporting the old failure in /health
            *state.last_error.write().await = None;
            Ok(Json(AssessmentsResponse { items }))
        }
        Err(message) => {
            *state.last_error.write().await = Some(message.clone());
            Err(ApiError::Upstream(message))
        }
    }
}

/// Build assessment routes
pub fn assessment_routes() -> Router<AppState> {
    Router::new().route("/assessments", get(list_assessments))
}
