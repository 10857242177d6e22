use std::sync::Arc;

use saltwatch_core::Notification;
use saltwatch_notify::Notifier;
use saltwatch_store::{MeasurementLog, StateStore};

use crate::config::MonitorConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Monitor configuration (recipient, thresholds, file locations).
    pub monitor: Arc<MonitorConfig>,
    /// Persisted scale-state record.
    pub store: Arc<StateStore>,
    /// Append-only measurement log.
    pub log: Arc<MeasurementLog>,
    /// Configured notifier; `None` when SMTP is not configured.
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl AppState {
    /// Deliver a notification to the configured recipient without
    /// propagating delivery failure. The state transition that produced the
    /// notification has already been committed; a failed or skipped send is
    /// logged and the transition stands.
    pub async fn notify_best_effort(&self, notification: &Notification) {
        let Some(notifier) = &self.notifier else {
            tracing::warn!(
                subject = %notification.subject,
                "No notifier configured, skipping send"
            );
            return;
        };

        if let Err(e) = notifier
            .deliver(&self.monitor.email_recipient, notification)
            .await
        {
            tracing::error!(
                error = %e,
                subject = %notification.subject,
                "Notification send failed"
            );
        }
    }
}
