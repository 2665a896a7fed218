//! Upload session tracking
//!
//! In-memory, session-scoped list of files submitted through the dashboard.
//! Records are ordered most-recent-first and never deleted; the result
//! poller updates a record's status asynchronously via the keyed update.
//!
//! State machine per record:
//! `Processing → Completed` (poller match) or
//! `Processing → CheckDashboard` (poller timeout).
//! Terminal states never transition again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Per-upload processing status shown in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Uploaded; waiting for the backend pipeline to produce an assessment
    Processing,
    /// Poller found the matching assessment record
    Completed,
    /// Poller gave up; results will appear on the dashboard when ready
    CheckDashboard,
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::CheckDashboard)
    }
}

/// One file submitted this session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Unique per upload; two uploads of the same filename get distinct ids
    pub record_id: Uuid,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
    /// Storage key returned by the uploader, used for poller correlation
    pub artifact_id: String,
    pub status: UploadStatus,
}

impl UploadRecord {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        artifact_id: impl Into<String>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            uploaded_at: Utc::now(),
            artifact_id: artifact_id.into(),
            status: UploadStatus::Processing,
        }
    }
}

/// Shared handle to the session's upload list
///
/// Cheap to clone; all clones observe the same list. Updates are keyed by
/// artifact id and replace one record's status without disturbing the
/// positions of the others, so concurrently resolving pollers need no
/// further coordination.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    records: Arc<RwLock<Vec<UploadRecord>>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new record at the front (most-recent-first ordering)
    pub async fn record_upload(&self, record: UploadRecord) {
        let mut records = self.records.write().await;
        records.insert(0, record);
    }

    /// Read access for rendering
    pub async fn snapshot(&self) -> Vec<UploadRecord> {
        self.records.read().await.clone()
    }

    /// Keyed status update. Targets the most recent still-Processing record
    /// for `artifact_id`; terminal records are never revisited, so a fresh
    /// upload of the same filename stays independent of the old one.
    ///
    /// Returns false when no updatable record exists (e.g. a poller resolving
    /// after its record already reached a terminal state).
    pub async fn set_status(&self, artifact_id: &str, status: UploadStatus) -> bool {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|r| r.artifact_id == artifact_id && !r.status.is_terminal())
        {
            Some(record) => {
                tracing::debug!(
                    artifact_id = %artifact_id,
                    record_id = %record.record_id,
                    from = ?record.status,
                    to = ?status,
                    "Upload status transition"
                );
                record.status = status;
                true
            }
            None => {
                tracing::debug!(
                    artifact_id = %artifact_id,
                    to = ?status,
                    "No updatable upload record for status change"
                );
                false
            }
        }
    }
}
