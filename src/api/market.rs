//! Read access to the live price store.

use crate::api::AppState;
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceResponse {
    symbol: String,
    price: f64,
    timestamp: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    symbol: String,
    window: Vec<f64>,
    timestamp: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/price/:symbol", get(get_price))
        .route("/history/:symbol", get(get_history))
}

/// Latest observed price for a symbol.
async fn get_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<PriceResponse>, AppError> {
    let price = state
        .engine
        .history()
        .latest(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("no observations for {}", symbol)))?;

    Ok(Json(PriceResponse {
        symbol: symbol.to_lowercase(),
        price,
        timestamp: chrono::Utc::now().timestamp_millis(),
    }))
}

/// Retained observation window for a symbol, oldest first.
async fn get_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        symbol: symbol.to_lowercase(),
        window: state.engine.history().window(&symbol),
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}
