//! Trading signal records and their resolution lifecycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSide {
    Buy,
    Sell,
}

impl SignalSide {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            SignalSide::Buy => "Buy",
            SignalSide::Sell => "Sell",
        }
    }
}

/// Resolution state of a signal. Success and Failure are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalResult {
    #[default]
    Pending,
    Success,
    Failure,
}

impl SignalResult {
    /// A terminal result is never revisited.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SignalResult::Pending)
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            SignalResult::Pending => "Pending",
            SignalResult::Success => "Success",
            SignalResult::Failure => "Failure",
        }
    }
}

/// A trading call tracked until price movement confirms or refutes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: Uuid,
    pub symbol: String,
    pub side: SignalSide,
    pub entry_price: f64,
    /// Unix timestamp (milliseconds) when created.
    pub created_at: i64,
    #[serde(default)]
    pub result: SignalResult,
    /// Percentage move locked in at resolution. Positive for Success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_percent: Option<f64>,
    /// Unix timestamp (milliseconds) of the last state change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Signal {
    /// Create a new pending signal.
    pub fn new(symbol: impl Into<String>, side: SignalSide, entry_price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            side,
            entry_price,
            created_at: chrono::Utc::now().timestamp_millis(),
            result: SignalResult::Pending,
            profit_percent: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_new_is_pending() {
        let signal = Signal::new("BTCUSDT", SignalSide::Buy, 43_000.0);
        assert_eq!(signal.result, SignalResult::Pending);
        assert!(signal.profit_percent.is_none());
        assert!(signal.updated_at.is_none());
    }

    #[test]
    fn test_signal_result_terminal() {
        assert!(!SignalResult::Pending.is_terminal());
        assert!(SignalResult::Success.is_terminal());
        assert!(SignalResult::Failure.is_terminal());
    }

    #[test]
    fn test_signal_side_serialization() {
        assert_eq!(serde_json::to_string(&SignalSide::Buy).unwrap(), "\"buy\"");
        let parsed: SignalSide = serde_json::from_str("\"sell\"").unwrap();
        assert_eq!(parsed, SignalSide::Sell);
    }

    #[test]
    fn test_signal_deserialization_defaults_result() {
        let json = r#"{
            "id": "7f2c0a90-3c59-4a6e-9d6d-0d7f6f8a1b2c",
            "symbol": "solusdt",
            "side": "sell",
            "entryPrice": 100.0,
            "createdAt": 1700000000000
        }"#;

        let signal: Signal = serde_json::from_str(json).unwrap();
        assert_eq!(signal.result, SignalResult::Pending);
    }
}
