//! Periodic salt-level check.
//!
//! Re-reads the persisted scale state on a fixed interval and mails the
//! recipient while the level is abnormal. Every abnormal tick sends again;
//! the notified flag records the send for the submission path's all-clear
//! and is not consulted here before re-sending.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use saltwatch_core::periodic_check;
use saltwatch_store::StoreError;

use crate::state::AppState;

/// Run the level-check loop until `cancel` is triggered.
///
/// Tick failures are logged and the loop keeps running.
pub async fn run(state: AppState, interval_secs: u64, cancel: CancellationToken) {
    tracing::info!(interval_secs, "Level check task started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Level check task stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = check_once(&state).await {
                    tracing::error!(error = %e, "Level check failed");
                }
            }
        }
    }
}

/// One check pass: while the level is abnormal, mark the alarm sent and
/// mail it; while it is normal, touch nothing.
pub async fn check_once(state: &AppState) -> Result<(), StoreError> {
    let outcome = state
        .store
        .update(|current| {
            let outcome = periodic_check(&current);
            (outcome.state.clone(), outcome)
        })
        .await?;

    if let Some(alarm) = &outcome.alarm {
        tracing::info!(subject = %alarm.subject, "Salt level abnormal, sending alarm");
        state.notify_best_effort(alarm).await;
    }

    Ok(())
}
