//! Unit tests for the data model.

use vigil::types::*;

#[test]
fn test_alert_round_trip() {
    let alert = Alert::new(
        "btcusdt",
        AlertKind::Price,
        AlertCondition::Above,
        50_000.0,
        true,
        AlertPriority::High,
    );

    let json = serde_json::to_string(&alert).unwrap();
    assert!(json.contains("\"kind\":\"price\""));
    assert!(json.contains("\"condition\":\"above\""));
    assert!(json.contains("\"createdAt\""));

    let parsed: Alert = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.id, alert.id);
    assert_eq!(parsed.threshold, 50_000.0);
    assert_eq!(parsed.priority, AlertPriority::High);
}

#[test]
fn test_signal_round_trip() {
    let signal = Signal::new("ethusdt", SignalSide::Sell, 2_500.0);

    let json = serde_json::to_string(&signal).unwrap();
    assert!(json.contains("\"side\":\"sell\""));
    assert!(json.contains("\"result\":\"pending\""));
    // Unset optionals are omitted from the wire shape.
    assert!(!json.contains("profitPercent"));
    assert!(!json.contains("updatedAt"));

    let parsed: Signal = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.id, signal.id);
    assert_eq!(parsed.entry_price, 2_500.0);
}

#[test]
fn test_resolved_signal_serializes_profit() {
    let mut signal = Signal::new("btcusdt", SignalSide::Buy, 100.0);
    signal.result = SignalResult::Success;
    signal.profit_percent = Some(2.5);
    signal.updated_at = Some(1_700_000_000_000);

    let json = serde_json::to_string(&signal).unwrap();
    assert!(json.contains("\"result\":\"success\""));
    assert!(json.contains("\"profitPercent\":2.5"));
}

#[test]
fn test_alert_kind_names() {
    assert_eq!(AlertKind::Price.name(), "Price");
    assert_eq!(AlertKind::Volume.name(), "Volume");
    assert_eq!(AlertKind::Trend.name(), "Trend");
}

#[test]
fn test_signal_labels() {
    assert_eq!(SignalSide::Buy.label(), "Buy");
    assert_eq!(SignalResult::Failure.label(), "Failure");
}

#[test]
fn test_alert_status_serialization() {
    assert_eq!(
        serde_json::to_string(&AlertStatus::Armed).unwrap(),
        "\"armed\""
    );
    assert_eq!(
        serde_json::to_string(&AlertStatus::Fired).unwrap(),
        "\"fired\""
    );
}

#[test]
fn test_engine_event_carries_context() {
    let mut signal = Signal::new("btcusdt", SignalSide::Buy, 100.0);
    signal.result = SignalResult::Success;
    signal.profit_percent = Some(3.2);
    signal.updated_at = Some(1_700_000_000_000);

    let event = EngineEvent::signal_resolved(&signal);
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"signal_resolved\""));
    assert!(json.contains("\"profitPercent\":3.2"));
    assert!(json.contains("\"symbol\":\"btcusdt\""));
}
