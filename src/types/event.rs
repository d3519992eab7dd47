//! Events emitted on engine state transitions.

use crate::types::{Alert, AlertCondition, AlertPriority, Signal, SignalResult, SignalSide};
use serde::Serialize;
use uuid::Uuid;

/// A state transition raised to the notification sinks.
///
/// Each variant carries enough context to render a human-readable message
/// without going back to the stores.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    #[serde(rename_all = "camelCase")]
    SignalResolved {
        id: Uuid,
        symbol: String,
        side: SignalSide,
        result: SignalResult,
        profit_percent: f64,
        timestamp: i64,
    },
    #[serde(rename_all = "camelCase")]
    AlertFired {
        id: Uuid,
        symbol: String,
        condition: AlertCondition,
        threshold: f64,
        price: f64,
        priority: AlertPriority,
        timestamp: i64,
    },
}

impl EngineEvent {
    /// Build a resolution event from a freshly resolved signal.
    pub fn signal_resolved(signal: &Signal) -> Self {
        EngineEvent::SignalResolved {
            id: signal.id,
            symbol: signal.symbol.clone(),
            side: signal.side,
            result: signal.result,
            profit_percent: signal.profit_percent.unwrap_or(0.0),
            timestamp: signal
                .updated_at
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Build a firing event from an alert and the tick that crossed it.
    pub fn alert_fired(alert: &Alert, price: f64) -> Self {
        EngineEvent::AlertFired {
            id: alert.id,
            symbol: alert.symbol.clone(),
            condition: alert.condition,
            threshold: alert.threshold,
            price,
            priority: alert.priority,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Symbol the event concerns.
    pub fn symbol(&self) -> &str {
        match self {
            EngineEvent::SignalResolved { symbol, .. } => symbol,
            EngineEvent::AlertFired { symbol, .. } => symbol,
        }
    }

    /// Human-readable one-line message.
    pub fn message(&self) -> String {
        match self {
            EngineEvent::SignalResolved {
                symbol,
                side,
                result,
                profit_percent,
                ..
            } => format!(
                "{} signal on {} resolved {} ({:+.2}%)",
                side.label(),
                symbol.to_uppercase(),
                result.label(),
                profit_percent
            ),
            EngineEvent::AlertFired {
                symbol,
                condition,
                threshold,
                price,
                ..
            } => format!(
                "Alert on {}: price {} {} (now {})",
                symbol.to_uppercase(),
                condition.label(),
                threshold,
                price
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlertKind, SignalSide};

    #[test]
    fn test_signal_resolved_message() {
        let mut signal = Signal::new("btcusdt", SignalSide::Buy, 100.0);
        signal.result = SignalResult::Success;
        signal.profit_percent = Some(3.0);
        signal.updated_at = Some(1_700_000_000_000);

        let event = EngineEvent::signal_resolved(&signal);
        let msg = event.message();
        assert!(msg.contains("BTCUSDT"));
        assert!(msg.contains("Success"));
        assert!(msg.contains("+3.00%"));
    }

    #[test]
    fn test_alert_fired_message() {
        let alert = Alert::new(
            "ethusdt",
            AlertKind::Price,
            AlertCondition::Above,
            2500.0,
            true,
            Default::default(),
        );

        let event = EngineEvent::alert_fired(&alert, 2510.0);
        let msg = event.message();
        assert!(msg.contains("ETHUSDT"));
        assert!(msg.contains("above"));
        assert_eq!(event.symbol(), "ethusdt");
    }

    #[test]
    fn test_event_serialization_tag() {
        let alert = Alert::new(
            "btcusdt",
            AlertKind::Price,
            AlertCondition::Below,
            40_000.0,
            true,
            AlertPriority::High,
        );
        let json = serde_json::to_string(&EngineEvent::alert_fired(&alert, 39_999.0)).unwrap();
        assert!(json.contains("\"type\":\"alert_fired\""));
        assert!(json.contains("\"priority\":\"high\""));
    }
}
