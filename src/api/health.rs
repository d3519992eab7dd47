//! Liveness endpoint.

use crate::api::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    scheduler_running: bool,
    tracked_alerts: usize,
    tracked_signals: usize,
    timestamp: i64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        scheduler_running: state.engine.scheduler().is_running(),
        tracked_alerts: state.engine.alerts().len(),
        tracked_signals: state.engine.signals().len(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}
