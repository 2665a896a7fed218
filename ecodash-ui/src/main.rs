//! ecodash-ui - Compliance Dashboard Service
//!
//! Single-page dashboard for sustainability-report compliance assessments:
//! uploads report files to the object store the analysis pipeline watches,
//! polls the assessments collection endpoint for results, and serves the
//! dashboard page that renders both.

use anyhow::Result;
use ecodash_common::config::SettingsResolver;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ecodash_ui::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Resolve settings before logging so the configured level applies
    let settings = SettingsResolver::new().resolve();

    let filter = EnvFilter::try_new(&settings.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting ecodash-ui (Compliance Dashboard) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Assessments API: {}", settings.api_base_url);
    info!("Object store: {}", settings.storage_base_url);

    let state = AppState::new(&settings)?;
    let app = ecodash_ui::build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    info!("Listening on http://{}", settings.bind_address);
    info!("Health check: http://{}/health", settings.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
