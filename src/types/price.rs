use serde::{Deserialize, Serialize};

/// A single observed trade for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTick {
    pub symbol: String,
    pub price: f64,
    /// Unix timestamp (milliseconds) reported by the venue.
    pub observed_at: i64,
}

impl PriceTick {
    /// Create a tick stamped with the current time.
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            observed_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
