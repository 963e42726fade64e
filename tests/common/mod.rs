// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use run_dashboard::config::{DashboardConfig, IngestConfig, TokenEncoding};
use run_dashboard::render::DashboardRenderer;
use run_dashboard::routes::create_router;
use run_dashboard::services::SnapshotLoader;
use run_dashboard::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted behavior of the fake Strava API.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeStrava {
    /// Activity pages, served in order for `page=1..`; pages past the end are empty
    pub pages: Vec<Vec<Value>>,
    /// Fail the token exchange with this status and body
    pub token_failure: Option<(u16, String)>,
    /// Fail this page number with this status and body
    pub page_failure: Option<(u32, u16, String)>,
}

/// What the fake Strava API saw.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeStravaLog {
    pub token_requests: AtomicU32,
    pub activity_requests: AtomicU32,
    pub token_content_type: Mutex<Option<String>>,
    pub token_body: Mutex<Option<String>>,
    pub authorization: Mutex<Option<String>>,
    pub per_page: Mutex<Option<String>>,
}

#[allow(dead_code)]
struct FakeState {
    script: FakeStrava,
    log: Arc<FakeStravaLog>,
}

/// Start the fake Strava API on a random local port.
#[allow(dead_code)]
pub async fn spawn_fake_strava(script: FakeStrava) -> (SocketAddr, Arc<FakeStravaLog>) {
    let log = Arc::new(FakeStravaLog::default());
    let state = Arc::new(FakeState {
        script,
        log: log.clone(),
    });

    let app = Router::new()
        .route("/oauth/token", post(fake_token))
        .route("/api/v3/athlete/activities", get(fake_activities))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake strava");
    });

    (addr, log)
}

#[allow(dead_code)]
async fn fake_token(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.log.token_requests.fetch_add(1, Ordering::SeqCst);
    *state.log.token_content_type.lock().unwrap() = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.log.token_body.lock().unwrap() = Some(body);

    if let Some((status, body)) = &state.script.token_failure {
        return (StatusCode::from_u16(*status).unwrap(), body.clone()).into_response();
    }

    Json(json!({
        "access_token": "fake-access-token",
        "refresh_token": "rotated-refresh-token",
        "expires_at": 1_900_000_000
    }))
    .into_response()
}

#[allow(dead_code)]
async fn fake_activities(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.log.activity_requests.fetch_add(1, Ordering::SeqCst);
    *state.log.authorization.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.log.per_page.lock().unwrap() = params.get("per_page").cloned();

    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    if let Some((fail_page, status, body)) = &state.script.page_failure {
        if *fail_page == page {
            return (StatusCode::from_u16(*status).unwrap(), body.clone()).into_response();
        }
    }

    let batch = page
        .checked_sub(1)
        .and_then(|i| state.script.pages.get(i as usize))
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(batch)).into_response()
}

/// Ingest config pointing at the fake Strava API.
#[allow(dead_code)]
pub fn ingest_config(addr: SocketAddr, snapshot_path: &Path) -> IngestConfig {
    IngestConfig {
        snapshot_path: snapshot_path.to_path_buf(),
        api_base: format!("http://{}/api/v3", addr),
        token_url: format!("http://{}/oauth/token", addr),
        token_encoding: TokenEncoding::Form,
        ..IngestConfig::test_default()
    }
}

/// A Strava activity record as the list endpoint returns it.
#[allow(dead_code)]
pub fn activity(id: u64, sport: &str, start_date_local: &str, meters: f64, seconds: u64) -> Value {
    json!({
        "id": id,
        "name": format!("Activity {}", id),
        "type": sport,
        "start_date_local": start_date_local,
        "distance": meters,
        "moving_time": seconds,
        "total_elevation_gain": 12.0
    })
}

/// Dashboard page with every slot.
#[allow(dead_code)]
pub const DASHBOARD_HTML: &str = r#"<!doctype html>
<html>
<body>
  <ul class="stats">
    <li>Runs <span id="ytd-count">…</span></li>
    <li>Distance <span id="ytd-distance">…</span></li>
    <li>Time <span id="ytd-time">…</span></li>
    <li>Pace <span id="ytd-pace">…</span></li>
    <li>Elevation <span id="ytd-elevation">…</span></li>
    <li>Longest <span id="ytd-longest">…</span></li>
  </ul>
  <p>Updated <span id="strava-updated">…</span></p>
  <div id="strava-container"><p>Loading…</p></div>
</body>
</html>
"#;

/// A site directory with the dashboard page and an index page.
#[allow(dead_code)]
pub struct TestSite {
    pub dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl TestSite {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("sport.html"), DASHBOARD_HTML).expect("write sport.html");
        std::fs::write(dir.path().join("index.html"), "<h1>Home</h1>\n").expect("write index");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a snapshot document at a site-relative path.
    pub fn put_snapshot(&self, relative: &str, json: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).expect("create snapshot dir");
        std::fs::write(&path, json).expect("write snapshot");
        path
    }

    pub fn config(&self) -> DashboardConfig {
        DashboardConfig {
            site_dir: self.dir.path().to_path_buf(),
            ..DashboardConfig::default()
        }
    }
}

/// Create a test app serving `config`'s site.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: DashboardConfig) -> (Router, Arc<AppState>) {
    let renderer = DashboardRenderer::new(SnapshotLoader::new(), config.clone());
    let state = Arc::new(AppState { config, renderer });

    (create_router(state.clone()), state)
}

/// Snapshot with two runs of the current year.
#[allow(dead_code)]
pub fn sample_snapshot_json(year: i32) -> String {
    json!({
        "updatedAt": format!("{}-06-01T08:00:00.000Z", year),
        "runs": [
            {
                "id": 2,
                "name": "Long run",
                "date": format!("{}-05-30T07:00:00Z", year),
                "distance_km": 10.0,
                "moving_time_s": 3300,
                "pace_sec_per_km": 330,
                "elevation_gain_m": 80.0
            },
            {
                "id": 1,
                "name": "Easy run",
                "date": format!("{}-05-28T07:00:00Z", year),
                "distance_km": 5.0,
                "moving_time_s": 1500,
                "pace_sec_per_km": 300,
                "elevation_gain_m": 20.0
            }
        ]
    })
    .to_string()
}
