//! Result poller
//!
//! Correlates an uploaded artifact with the assessment record the backend
//! eventually produces. The backend issues no synchronous correlation key,
//! so matching is a multi-strategy heuristic over the identifier the
//! backend stores (which may be the storage key, a derived form of it, or
//! the bare filename).
//!
//! Each poll attempt is one sleep + fetch + scan cycle. The attempt ceiling
//! scales with payload size: larger files get a longer budget to cover
//! their longer expected processing time. Fetch failures consume the
//! attempt and the loop continues; exhaustion is a soft timeout, not an
//! error.

use crate::services::assessment_client::AssessmentClient;
use crate::services::session::{SessionTracker, UploadStatus};
use ecodash_common::api::AssessmentRecord;
use std::time::Duration;

/// Poll loop tuning
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between attempts
    pub interval: Duration,
    /// Attempt ceiling for files at or under the size threshold
    pub base_attempts: u32,
    /// Attempt ceiling for files over the size threshold
    pub large_file_attempts: u32,
    /// Size above which a file gets the larger budget
    pub large_file_threshold_bytes: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            base_attempts: 40,
            large_file_attempts: 60,
            large_file_threshold_bytes: 1024 * 1024,
        }
    }
}

impl PollerConfig {
    /// Attempt ceiling for a payload of the given size
    pub fn attempts_for(&self, size_bytes: u64) -> u32 {
        if size_bytes > self.large_file_threshold_bytes {
            self.large_file_attempts
        } else {
            self.base_attempts
        }
    }

    /// Expected processing time shown to the user after upload
    pub fn processing_hint(&self, size_bytes: u64) -> &'static str {
        if size_bytes > self.large_file_threshold_bytes {
            "2-3 minutes"
        } else {
            "60 seconds"
        }
    }
}

/// Terminal outcome of one poll loop
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// First record matching any strategy (ties resolved by backend order)
    Matched(Box<AssessmentRecord>),
    /// Attempt ceiling exhausted without a match
    TimedOut { attempts: u32 },
}

/// Multi-strategy identifier match between a backend record and an
/// uploaded artifact id.
///
/// Strategies, any of which suffices:
/// 1. `file_id` equals the artifact id
/// 2. `file_id` contains the artifact id
/// 3. the artifact id contains `file_id`
/// 4. `source_file` equals the artifact filename (path prefix stripped)
/// 5. `file_id` equals the artifact filename
///
/// Substring containment can hit an unrelated record with a similar name;
/// callers take the first match in backend order.
pub fn matches_artifact(record: &AssessmentRecord, artifact_id: &str) -> bool {
    let base_name = artifact_basename(artifact_id);

    if let Some(file_id) = record.file_id.as_deref() {
        if !file_id.is_empty()
            && (file_id == artifact_id
                || file_id.contains(artifact_id)
                || artifact_id.contains(file_id)
                || file_id == base_name)
        {
            return true;
        }
    }

    matches!(record.source_file.as_deref(), Some(source) if !source.is_empty() && source == base_name)
}

/// Filename component of an artifact id (`raw-data/report.csv` → `report.csv`)
fn artifact_basename(artifact_id: &str) -> &str {
    artifact_id.rsplit('/').next().unwrap_or(artifact_id)
}

/// Run one bounded poll loop to match-or-timeout.
pub async fn poll_for_assessment(
    client: &AssessmentClient,
    artifact_id: &str,
    max_attempts: u32,
    interval: Duration,
) -> PollOutcome {
    tracing::info!(
        artifact_id = %artifact_id,
        max_attempts,
        interval_ms = interval.as_millis() as u64,
        "Polling for assessment"
    );

    for attempt in 1..=max_attempts {
        tokio::time::sleep(interval).await;

        match client.fetch_assessments().await {
            Ok(records) => {
                if let Some(record) = records.iter().find(|r| matches_artifact(r, artifact_id)) {
                    tracing::info!(
                        artifact_id = %artifact_id,
                        matched_file_id = record.file_id.as_deref().unwrap_or(""),
                        attempt,
                        "Assessment match found"
                    );
                    return PollOutcome::Matched(Box::new(record.clone()));
                }
                tracing::debug!(
                    artifact_id = %artifact_id,
                    attempt,
                    collection_size = records.len(),
                    "No matching assessment yet"
                );
            }
            Err(e) => {
                // Non-fatal: the failed fetch consumes the attempt
                tracing::warn!(
                    artifact_id = %artifact_id,
                    attempt,
                    error = %e,
                    "Poll attempt failed"
                );
            }
        }
    }

    tracing::warn!(
        artifact_id = %artifact_id,
        max_attempts,
        "Polling exhausted without a match"
    );
    PollOutcome::TimedOut {
        attempts: max_attempts,
    }
}

/// Fire-and-forget poll driver spawned per upload.
///
/// Resolves the loop outcome into exactly one keyed status update; nothing
/// here can fail in a way that escapes the spawned task. A poll timeout is
/// downgraded to `CheckDashboard` rather than surfaced as an error.
pub async fn run_poller(
    client: AssessmentClient,
    tracker: SessionTracker,
    artifact_id: String,
    size_bytes: u64,
    config: PollerConfig,
) {
    let max_attempts = config.attempts_for(size_bytes);

    let status = match poll_for_assessment(&client, &artifact_id, max_attempts, config.interval).await
    {
        PollOutcome::Matched(_) => UploadStatus::Completed,
        PollOutcome::TimedOut { attempts } => {
            tracing::info!(
                artifact_id = %artifact_id,
                attempts,
                "Processing is taking longer; results will appear on the dashboard when ready"
            );
            UploadStatus::CheckDashboard
        }
    };

    tracker.set_status(&artifact_id, status).await;
}
