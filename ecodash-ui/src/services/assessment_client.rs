//! Assessment collection client
//!
//! One read endpoint: `GET <api_base_url>/assessments`. The response
//! envelope varies by backend deployment; normalization lives in
//! [`ecodash_common::api::AssessmentEnvelope`]. Failures are non-fatal
//! fetch errors; callers keep whatever they were displaying before.

use ecodash_common::api::{AssessmentEnvelope, AssessmentRecord};
use ecodash_common::{Error, Result};
use std::time::Duration;

const USER_AGENT: &str = concat!("ecodash/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Read-only client for the assessments collection endpoint
#[derive(Debug, Clone)]
pub struct AssessmentClient {
    http_client: reqwest::Client,
    api_base_url: String,
}

impl AssessmentClient {
    pub fn new(api_base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base_url: api_base_url.into(),
        })
    }

    /// Fetch the full assessment collection, normalized and order-preserving.
    pub async fn fetch_assessments(&self) -> Result<Vec<AssessmentRecord>> {
        let url = format!("{}/assessments", self.api_base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to load assessments: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!(
                "Assessments endpoint returned {}: {}",
                status, error_text
            )));
        }

        let envelope: AssessmentEnvelope = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("Unparseable assessments response: {}", e)))?;

        let records = envelope.into_records();
        tracing::debug!(count = records.len(), "Fetched assessments");
        Ok(records)
    }
}
