//! Alert tracking endpoints.
//!
//! The external CRUD layer owns alert records; these routes are how its
//! records reach the engine and how the `active` flag re-arms a fired alert.

use crate::api::AppState;
use crate::engine::TrackedAlert;
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::types::{Alert, AlertCondition, AlertKind, AlertPriority};

/// Request body for creating an alert.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub symbol: String,
    pub kind: AlertKind,
    pub condition: AlertCondition,
    pub threshold: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub priority: AlertPriority,
}

fn default_active() -> bool {
    true
}

/// Request body for updating an alert's active flag.
#[derive(Debug, Deserialize)]
pub struct UpdateAlertRequest {
    pub active: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_alert).get(list_alerts))
        .route(
            "/:id",
            get(get_alert).patch(update_alert).delete(delete_alert),
        )
}

/// Track a new alert.
async fn create_alert(
    State(state): State<AppState>,
    Json(request): Json<CreateAlertRequest>,
) -> Result<Json<Alert>, AppError> {
    if request.symbol.trim().is_empty() {
        return Err(AppError::BadRequest("symbol must not be empty".to_string()));
    }
    if !request.threshold.is_finite() {
        return Err(AppError::BadRequest("threshold must be finite".to_string()));
    }

    let alert = Alert::new(
        request.symbol.trim().to_string(),
        request.kind,
        request.condition,
        request.threshold,
        request.active,
        request.priority,
    );

    state.engine.track_alert(alert.clone()).await;
    Ok(Json(alert))
}

/// List every tracked alert with its firing status.
async fn list_alerts(State(state): State<AppState>) -> Json<Vec<TrackedAlert>> {
    Json(state.engine.alerts().list())
}

async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrackedAlert>, AppError> {
    state
        .engine
        .alerts()
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("alert {}", id)))
}

/// Flip the active flag. Deactivating ends the firing session, so toggling
/// off and back on re-arms a fired alert.
async fn update_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAlertRequest>,
) -> Result<Json<TrackedAlert>, AppError> {
    let tracked = state
        .engine
        .alerts()
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("alert {}", id)))?;

    let mut alert = tracked.alert;
    alert.active = request.active;
    state.engine.track_alert(alert).await;

    state
        .engine
        .alerts()
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("alert {}", id)))
}

async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Alert>, AppError> {
    state
        .engine
        .untrack_alert(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("alert {}", id)))
}
