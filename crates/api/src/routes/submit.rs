//! Measurement ingestion route.
//!
//! `GET|POST /submit?v=<weight>` is the device-facing contract: classify the
//! reading, persist the new state under the store lock, append the log line,
//! and mail the all-clear when an active alarm ends. The response only
//! reports what happened; the scale firmware ignores the body.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use saltwatch_core::{apply_measurement, parse_weight};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for measurement submission.
#[derive(Deserialize)]
pub struct SubmitParams {
    /// Raw measurement as sent by the scale.
    v: Option<String>,
}

/// Result payload for a processed measurement.
#[derive(Debug, Serialize)]
pub struct SubmitReport {
    /// Parsed weight, after lenient coercion.
    pub weight: f64,
    /// Classification the weight mapped to.
    pub status: String,
    /// Whether this submission ended an active alarm.
    pub all_clear: bool,
}

/// GET/POST /submit -- ingest one measurement.
async fn submit_measurement(
    State(state): State<AppState>,
    Query(params): Query<SubmitParams>,
) -> AppResult<Json<DataResponse<SubmitReport>>> {
    let raw = params
        .v
        .ok_or_else(|| AppError::BadRequest("missing query parameter 'v'".to_string()))?;
    let weight = parse_weight(&raw);
    let label = state.monitor.thresholds.classify(weight).to_string();

    let outcome = state
        .store
        .update(|current| {
            let outcome = apply_measurement(&current, weight, &label);
            (Some(outcome.state.clone()), outcome)
        })
        .await?;

    state.log.append(weight).await?;

    tracing::info!(weight, status = %outcome.state.status, "Measurement recorded");

    if let Some(notification) = &outcome.all_clear {
        state.notify_best_effort(notification).await;
    }

    Ok(Json(DataResponse {
        data: SubmitReport {
            weight,
            status: outcome.state.status,
            all_clear: outcome.all_clear.is_some(),
        },
    }))
}

/// Mount the ingestion route. The scale issues plain GETs; POST is accepted
/// with identical semantics.
pub fn router() -> Router<AppState> {
    Router::new().route("/submit", get(submit_measurement).post(submit_measurement))
}
