//! Signal tracking endpoints.

use crate::api::AppState;
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::types::{Signal, SignalSide};

/// Request body for tracking a signal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSignalRequest {
    pub symbol: String,
    pub side: SignalSide,
    pub entry_price: f64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_signal).get(list_signals))
        .route("/:id", get(get_signal))
}

/// Track a new pending signal.
async fn create_signal(
    State(state): State<AppState>,
    Json(request): Json<CreateSignalRequest>,
) -> Result<Json<Signal>, AppError> {
    if request.symbol.trim().is_empty() {
        return Err(AppError::BadRequest("symbol must not be empty".to_string()));
    }
    if !request.entry_price.is_finite() || request.entry_price <= 0.0 {
        return Err(AppError::BadRequest(
            "entryPrice must be a positive number".to_string(),
        ));
    }

    let signal = Signal::new(
        request.symbol.trim().to_string(),
        request.side,
        request.entry_price,
    );

    state.engine.track_signal(signal.clone()).await;
    Ok(Json(signal))
}

/// List every tracked signal, pending and resolved.
async fn list_signals(State(state): State<AppState>) -> Json<Vec<Signal>> {
    Json(state.engine.signals().list())
}

async fn get_signal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Signal>, AppError> {
    state
        .engine
        .signals()
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("signal {}", id)))
}
