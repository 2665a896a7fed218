//! ecodash-ui library interface
//!
//! Exposes application state and router construction for the binary and
//! for integration testing.

pub mod api;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use chrono::{DateTime, Utc};
use ecodash_common::api::AssessmentRecord;
use ecodash_common::config::Settings;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::{AssessmentClient, PollerConfig, SessionTracker, SingleFlight, Uploader};

/// Largest accepted report upload (body limit for POST /upload)
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Result shape shared between concurrent deduplicated fetches
pub type SharedFetchResult = Result<Vec<AssessmentRecord>, String>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Session-scoped upload list, updated asynchronously by pollers
    pub uploads: SessionTracker,
    /// Object store client
    pub uploader: Uploader,
    /// Collection endpoint client
    pub assessments: AssessmentClient,
    /// Deduplication gate for the dashboard fetch path
    pub fetch_gate: Arc<SingleFlight<SharedFetchResult>>,
    /// Poll loop tuning (interval, size-scaled attempt ceilings)
    pub poller_config: PollerConfig,
    /// Display name from the external identity boundary
    pub display_name: String,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last upstream error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(settings: &Settings) -> ecodash_common::Result<Self> {
        let uploader = Uploader::new(&settings.storage_base_url)
            .map_err(|e| ecodash_common::Error::Internal(e.to_string()))?;
        let assessments = AssessmentClient::new(&settings.api_base_url)?;

        Ok(Self {
            uploads: SessionTracker::new(),
            uploader,
            assessments,
            fetch_gate: Arc::new(SingleFlight::new()),
            poller_config: PollerConfig::default(),
            display_name: settings.display_name.clone(),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        })
    }

    /// Override poll tuning (short intervals for tests)
    pub fn with_poller_config(mut self, config: PollerConfig) -> Self {
        self.poller_config = config;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI route (HTML page)
        .merge(api::ui_routes())
        // API routes
        .merge(api::upload_routes())
        .merge(api::assessment_routes())
        .merge(api::session_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
