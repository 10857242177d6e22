//! Shared fixtures for integration tests.
//!
//! Builds the full application router — the same middleware stack production
//! uses — against temp state/log files and a recording notifier, so tests
//! can drive the HTTP surface and then inspect what was persisted and what
//! would have been mailed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::Mutex;
use tower::ServiceExt;

use saltwatch_api::config::{MonitorConfig, ServerConfig};
use saltwatch_api::router::build_app_router;
use saltwatch_api::state::AppState;
use saltwatch_core::{Notification, ScaleState, Threshold, ThresholdTable};
use saltwatch_notify::{Notifier, NotifyError};
use saltwatch_store::{MeasurementLog, StateStore};

// ---------------------------------------------------------------------------
// Recording notifier
// ---------------------------------------------------------------------------

/// Notifier double that records every delivery instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, Notification)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, to: &str, notification: &Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .await
            .push((to.to_string(), notification.clone()));
        Ok(())
    }
}

impl RecordingNotifier {
    /// Subjects of all recorded sends, in order.
    pub async fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|(_, n)| n.subject.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Test app
// ---------------------------------------------------------------------------

/// Everything a test needs: the router, the shared state behind it, the
/// recorded sends, and the temp dir keeping the files alive.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
    #[allow(dead_code)]
    dir: tempfile::TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        check_interval_secs: 300,
        monitor_config_path: "saltwatch.json".into(),
    }
}

/// The threshold table used throughout the integration tests: low weight
/// means the salt is running out, anything under a tonne of headroom is
/// still "Normal".
pub fn test_thresholds() -> ThresholdTable {
    ThresholdTable::new(vec![
        Threshold {
            bound: 10.0,
            label: "Critical".to_string(),
        },
        Threshold {
            bound: 25.0,
            label: "Warning".to_string(),
        },
        Threshold {
            bound: 1000.0,
            label: "Normal".to_string(),
        },
    ])
    .unwrap()
}

/// Build the full application against temp files seeded with `initial`.
pub async fn build_test_app(initial: &ScaleState) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let state_path = dir.path().join("state.json");
    let log_path = dir.path().join("measurements.log");
    tokio::fs::write(&state_path, serde_json::to_vec(initial).unwrap())
        .await
        .unwrap();

    let monitor = MonitorConfig {
        email_recipient: "ops@example.com".to_string(),
        thresholds: test_thresholds(),
        state_path: state_path.clone(),
        log_path: log_path.clone(),
    };

    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState {
        monitor: Arc::new(monitor),
        store: Arc::new(StateStore::new(&state_path)),
        log: Arc::new(MeasurementLog::new(&log_path)),
        notifier: Some(notifier.clone() as Arc<dyn Notifier>),
    };

    let app = build_app_router(state.clone(), &test_config());

    TestApp {
        app,
        state,
        notifier,
        dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
