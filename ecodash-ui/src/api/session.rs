//! Session identity boundary
//!
//! Authentication itself is owned by an external identity provider; the
//! service only exposes the already-authenticated display name and a
//! sign-out action that delegates back to the provider.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

/// GET /session response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Display name / login id of the authenticated user
    pub user: String,
}

/// GET /session
pub async fn session_info(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: state.display_name.clone(),
    })
}

/// POST /session/sign-out
///
/// Sign-out is handled by the external identity provider; this endpoint
/// only acknowledges so the page can redirect.
pub async fn sign_out(State(state): State<AppState>) -> Json<Value> {
    tracing::info!(user = %state.display_name, "Sign-out requested, delegating to identity provider");
    Json(json!({ "status": "ok" }))
}

/// Build session routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(session_info))
        .route("/session/sign-out", post(sign_out))
}
