//! Object store uploader
//!
//! Validates a report file against the extension allow-list before any
//! network I/O, then streams it to the object store under the deterministic
//! key `raw-data/<filename>`. The stored key doubles as the artifact id the
//! result poller correlates against.

use futures::StreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("ecodash/", env!("CARGO_PKG_VERSION"));
const UPLOAD_TIMEOUT_SECS: u64 = 120;
const PROGRESS_CHUNK_BYTES: usize = 64 * 1024;

/// Extensions the analysis pipeline accepts
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "json", "pdf"];

/// Object store key prefix the pipeline watches
const ARTIFACT_PREFIX: &str = "raw-data";

/// Uploader errors
#[derive(Debug, Error)]
pub enum UploadError {
    /// Rejected before any I/O; shown to the user as a validation message
    #[error("Unsupported file type '{0}'. Please upload csv, json, or pdf files only.")]
    UnsupportedType(String),

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Object store rejected upload ({0}): {1}")]
    Rejected(u16, String),
}

/// Object store client
#[derive(Debug, Clone)]
pub struct Uploader {
    http_client: reqwest::Client,
    storage_base_url: String,
}

impl Uploader {
    pub fn new(storage_base_url: impl Into<String>) -> Result<Self, UploadError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        Ok(Self {
            http_client,
            storage_base_url: storage_base_url.into(),
        })
    }

    /// Check a filename against the extension allow-list (case-insensitive).
    /// Files without an extension are rejected.
    pub fn validate_extension(file_name: &str) -> Result<(), UploadError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            _ => Err(UploadError::UnsupportedType(file_name.to_string())),
        }
    }

    /// Deterministic storage key for a filename
    pub fn artifact_key(file_name: &str) -> String {
        format!("{}/{}", ARTIFACT_PREFIX, file_name)
    }

    /// Upload one file. Exactly one object is written per successful call.
    ///
    /// The body is streamed in fixed-size chunks with cumulative progress
    /// logged at debug level (console-only, not persisted). Returns the
    /// stored key as the artifact id. No automatic retry on failure.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, UploadError> {
        // Allow-list check happens before any network call
        Self::validate_extension(file_name)?;

        let key = Self::artifact_key(file_name);
        let url = format!("{}/{}", self.storage_base_url.trim_end_matches('/'), key);
        let total_bytes = data.len() as u64;

        tracing::info!(
            artifact_id = %key,
            size = total_bytes,
            content_type = %content_type,
            "Starting upload"
        );

        let chunks: Vec<Vec<u8>> = data
            .chunks(PROGRESS_CHUNK_BYTES)
            .map(|c| c.to_vec())
            .collect();
        let progress_key = key.clone();
        let body_stream = futures::stream::iter(chunks).scan(0u64, move |transferred, chunk| {
            *transferred += chunk.len() as u64;
            let percent = if total_bytes > 0 {
                (*transferred * 100) / total_bytes
            } else {
                100
            };
            tracing::debug!(
                artifact_id = %progress_key,
                transferred_bytes = *transferred,
                total_bytes,
                percent,
                "Upload progress"
            );
            futures::future::ready(Some(Ok::<_, std::io::Error>(chunk)))
        });

        let response = self
            .http_client
            .put(&url)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, total_bytes)
            .body(reqwest::Body::wrap_stream(body_stream))
            .send()
            .await
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected(status.as_u16(), error_text));
        }

        tracing::info!(artifact_id = %key, size = total_bytes, "Upload succeeded");
        Ok(key)
    }
}
