//! Upload API handlers
//!
//! POST /upload accepts one multipart file, validates and streams it to the
//! object store, records it in the session tracker, and spawns the result
//! poller fire-and-forget. GET /uploads returns the tracker snapshot.

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};
use ecodash_common::format::format_file_size;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::services::{poller, UploadRecord};
use crate::AppState;

/// POST /upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub record: UploadRecord,
    /// Expected processing time ("60 seconds" / "2-3 minutes")
    pub processing_hint: &'static str,
}

/// GET /uploads response
#[derive(Debug, Serialize)]
pub struct UploadsResponse {
    pub uploads: Vec<UploadRecord>,
}

/// POST /upload
///
/// Accepts a single `file` multipart field. Returns 400 before any network
/// I/O for disallowed extensions, 502 for object store failures.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut file_part: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload body: {}", e)))?
            .to_vec();
        file_part = Some((file_name, content_type, data));
        break;
    }

    let (file_name, content_type, data) =
        file_part.ok_or_else(|| ApiError::BadRequest("No file in request".to_string()))?;
    let size = data.len() as u64;

    // Extension validation happens inside the uploader, before any network
    // call; failures surface as 400 here.
    let artifact_id = state.uploader.upload(&file_name, &content_type, data).await?;

    let record = UploadRecord::new(&file_name, size, &content_type, &artifact_id);
    state.uploads.record_upload(record.clone()).await;

    let processing_hint = state.poller_config.processing_hint(size);
    tracing::info!(
        artifact_id = %artifact_id,
        size = %format_file_size(size),
        processing_hint,
        "Upload recorded, starting result poller"
    );

    // Fire-and-forget: the poller must not block this handler, further
    // uploads, or tab switches. Its resolution lands through the tracker's
    // keyed update.
    let client = state.assessments.clone();
    let tracker = state.uploads.clone();
    let config = state.poller_config.clone();
    let poll_artifact = artifact_id.clone();
    tokio::spawn(async move {
        poller::run_poller(client, tracker, poll_artifact, size, config).await;
    });

    Ok(Json(UploadResponse {
        record,
        processing_hint,
    }))
}

/// GET /uploads
///
/// Session tracker snapshot, most-recent-first.
pub async fn list_uploads(State(state): State<AppState>) -> Json<UploadsResponse> {
    Json(UploadsResponse {
        uploads: state.uploads.snapshot().await,
    })
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/uploads", get(list_uploads))
}
