//! Dashboard page handler
//!
//! Presentation glue only: the page renders tracker/assessment state from
//! the JSON API and posts uploads back to it. All orchestration logic lives
//! server-side in the services layer.

use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use crate::AppState;

/// GET /
///
/// Single-page dashboard: upload tab + assessments tab.
pub async fn dashboard_page() -> impl IntoResponse {
    Html(DASHBOARD_HTML.replace("__VERSION__", env!("CARGO_PKG_VERSION")))
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(dashboard_page))
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>ecodash - Compliance Dashboard</title>
<style>
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    background-color: #f4f7f4;
    color: #1f2933;
    line-height: 1.6;
}
header {
    background: #fff;
    border-bottom: 1px solid #d5dcd5;
    padding: 16px 24px;
    display: flex;
    justify-content: space-between;
    align-items: center;
}
h1 { font-size: 22px; color: #2f7a44; }
.subtitle { color: #7b8794; font-size: 13px; }
.header-right { display: flex; align-items: center; gap: 10px; font-size: 14px; }
.version { color: #9aa5b1; font-family: 'Courier New', monospace; font-size: 12px; }
.tab-button, .action-button {
    padding: 8px 16px;
    border: none;
    border-radius: 6px;
    cursor: pointer;
    font-weight: 600;
    background: #e4e7eb;
    color: #3e4c59;
}
.tab-button.active { background: #2f7a44; color: #fff; }
.sign-out { background: #fbe9e7; color: #c0392b; }
main { max-width: 960px; margin: 0 auto; padding: 24px; }
.banner {
    background: #fff8e1;
    border-left: 4px solid #f2b705;
    padding: 12px 16px;
    margin-bottom: 16px;
    border-radius: 4px;
    display: none;
}
.card {
    background: #fff;
    border-radius: 10px;
    box-shadow: 0 1px 4px rgba(31, 41, 51, 0.08);
    padding: 24px;
    margin-bottom: 20px;
}
.upload-box {
    border: 2px dashed #cbd2d9;
    border-radius: 10px;
    padding: 36px;
    text-align: center;
    color: #7b8794;
}
.upload-box input { margin-top: 12px; }
.upload-row {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 12px;
    border: 1px solid #e4e7eb;
    border-radius: 8px;
    margin-top: 10px;
}
.badge { padding: 3px 10px; border-radius: 999px; font-size: 12px; font-weight: 600; }
.badge.processing { background: #e3f2fd; color: #1565c0; }
.badge.completed { background: #e8f5e9; color: #2e7d32; }
.badge.check_dashboard { background: #fff8e1; color: #b28704; }
.stats { display: grid; grid-template-columns: repeat(4, 1fr); gap: 14px; margin-bottom: 20px; }
.stat { background: #fff; border-radius: 10px; padding: 16px; box-shadow: 0 1px 4px rgba(31,41,51,0.08); }
.stat .label { font-size: 12px; color: #7b8794; }
.stat .value { font-size: 26px; font-weight: 700; }
.assessment { border: 1px solid #e4e7eb; border-radius: 8px; padding: 16px; margin-top: 12px; }
.assessment .scores { display: flex; gap: 24px; margin-top: 8px; font-size: 14px; }
.muted { color: #9aa5b1; font-size: 13px; }
.hidden { display: none; }
</style>
</head>
<body>
<header>
    <div>
        <h1>ecodash</h1>
        <div class="subtitle">Sustainability Report Compliance</div>
    </div>
    <div class="header-right">
        <span id="user-name" class="muted"></span>
        <button id="tab-upload" class="tab-button active">Upload</button>
        <button id="tab-dashboard" class="tab-button">Dashboard</button>
        <button id="sign-out" class="tab-button sign-out">Sign Out</button>
        <span class="version">v__VERSION__</span>
    </div>
</header>

<main>
    <div id="error-banner" class="banner"></div>

    <section id="upload-view">
        <div class="card">
            <h2>Upload Report Data</h2>
            <div class="upload-box">
                <p>Supported formats: CSV, JSON, PDF</p>
                <input type="file" id="file-input" accept=".csv,.json,.pdf">
            </div>
            <p id="upload-hint" class="muted"></p>
            <h3 style="margin-top:20px">Recent Uploads</h3>
            <div id="upload-list"><p class="muted">Nothing uploaded this session.</p></div>
        </div>
    </section>

    <section id="dashboard-view" class="hidden">
        <div class="stats">
            <div class="stat"><div class="label">Total Assessments</div><div class="value" id="stat-total">0</div></div>
            <div class="stat"><div class="label">Avg Compliance Score</div><div class="value" id="stat-score">0</div></div>
            <div class="stat"><div class="label">Critical Violations</div><div class="value" id="stat-critical">0</div></div>
            <div class="stat"><div class="label">Avg Data Quality</div><div class="value" id="stat-quality">0%</div></div>
        </div>
        <div class="card">
            <h2>Compliance Assessments
                <button id="refresh" class="action-button" style="float:right">Refresh</button>
            </h2>
            <div id="assessment-list"><p class="muted">No assessments yet. Upload a file to get started.</p></div>
        </div>
    </section>
</main>

<script>
const statusLabels = {
    processing: 'Processing...',
    completed: 'Completed',
    check_dashboard: 'Check Dashboard'
};

function showError(message) {
    const banner = document.getElementById('error-banner');
    banner.textContent = message;
    banner.style.display = 'block';
}

function clearError() {
    document.getElementById('error-banner').style.display = 'none';
}

function formatSize(bytes) {
    if (bytes < 1024) return bytes + ' B';
    if (bytes < 1024 * 1024) return (bytes / 1024).toFixed(1) + ' KB';
    return (bytes / (1024 * 1024)).toFixed(1) + ' MB';
}

async function loadSession() {
    try {
        const res = await fetch('/session');
        const data = await res.json();
        document.getElementById('user-name').textContent = data.user;
    } catch (e) { /* identity display is cosmetic */ }
}

async function refreshUploads() {
    const res = await fetch('/uploads');
    const data = await res.json();
    const list = document.getElementById('upload-list');
    if (!data.uploads.length) return;
    list.innerHTML = data.uploads.map(u =>
        '<div class="upload-row"><div><strong>' + u.name + '</strong>' +
        '<div class="muted">' + formatSize(u.size) + ' &middot; ' + new Date(u.uploaded_at).toLocaleString() + '</div></div>' +
        '<span class="badge ' + u.status + '">' + (statusLabels[u.status] || u.status) + '</span></div>'
    ).join('');
}

async function refreshAssessments() {
    try {
        const res = await fetch('/assessments');
        if (!res.ok) {
            const body = await res.json();
            showError(body.error ? body.error.message : 'Failed to load assessments');
            return; // keep prior data on screen
        }
        clearError();
        const data = await res.json();
        renderAssessments(data.items);
    } catch (e) {
        showError('Failed to load assessments: ' + e.message);
    }
}

function renderAssessments(items) {
    document.getElementById('stat-total').textContent = items.length;
    const avg = (sel) => items.length
        ? Math.round(items.reduce((sum, a) => sum + (sel(a) || 0), 0) / items.length) : 0;
    document.getElementById('stat-score').textContent = avg(a => a.compliance_score);
    document.getElementById('stat-quality').textContent = avg(a => a.data_quality_score) + '%';
    document.getElementById('stat-critical').textContent =
        items.reduce((sum, a) => sum + (a.critical_violations || 0), 0);

    if (!items.length) return;
    document.getElementById('assessment-list').innerHTML = items.map(a =>
        '<div class="assessment"><strong>' + (a.source_file || a.file_id || 'Unknown File') + '</strong>' +
        '<div class="muted">' + (a.timestamp || '') + ' &middot; ' + (a.overall_status || 'unknown') + '</div>' +
        '<div class="scores"><span>Compliance: <strong>' + (a.compliance_score || 0) + '%</strong></span>' +
        '<span>Data quality: <strong>' + (a.data_quality_score || 0) + '%</strong></span>' +
        '<span>Violations: <strong>' + (a.total_violations || 0) + '</strong></span>' +
        '<span>Critical: <strong>' + (a.critical_violations || 0) + '</strong></span></div></div>'
    ).join('');
}

document.getElementById('file-input').addEventListener('change', async (e) => {
    const file = e.target.files[0];
    if (!file) return;
    const form = new FormData();
    form.append('file', file);
    try {
        const res = await fetch('/upload', { method: 'POST', body: form });
        const body = await res.json();
        if (!res.ok) {
            showError(body.error ? body.error.message : 'Upload failed');
            return;
        }
        clearError();
        document.getElementById('upload-hint').textContent =
            'Uploaded. Estimated processing time: ' + body.processing_hint +
            '. Results will appear on the Dashboard when ready.';
        refreshUploads();
    } catch (err) {
        showError('Upload failed: ' + err.message);
    } finally {
        e.target.value = '';
    }
});

function activateTab(name) {
    document.getElementById('upload-view').classList.toggle('hidden', name !== 'upload');
    document.getElementById('dashboard-view').classList.toggle('hidden', name !== 'dashboard');
    document.getElementById('tab-upload').classList.toggle('active', name === 'upload');
    document.getElementById('tab-dashboard').classList.toggle('active', name === 'dashboard');
    if (name === 'dashboard') refreshAssessments();
}

document.getElementById('tab-upload').addEventListener('click', () => activateTab('upload'));
document.getElementById('tab-dashboard').addEventListener('click', () => activateTab('dashboard'));
document.getElementById('refresh').addEventListener('click', refreshAssessments);
document.getElementById('sign-out').addEventListener('click', async () => {
    await fetch('/session/sign-out', { method: 'POST' });
    location.reload();
});

loadSession();
refreshUploads();
setInterval(refreshUploads, 3000);
</script>
</body>
</html>
"#;
