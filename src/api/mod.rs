pub mod alerts;
pub mod health;
pub mod market;
pub mod signals;

use crate::config::Config;
use crate::engine::Engine;
use axum::Router;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<Engine>,
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/alerts", alerts::router())
        .nest("/api/signals", signals::router())
        .nest("/api/market", market::router())
}
