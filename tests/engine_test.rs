//! Engine-level tests: tracking, validation cycles, exactly-once delivery.

use std::sync::{Arc, Mutex};
use vigil::config::Config;
use vigil::engine::{Engine, NotificationSink, TransitionSink};
use vigil::types::{
    Alert, AlertCondition, AlertKind, AlertPriority, EngineEvent, PriceTick, Signal, SignalResult,
    SignalSide,
};

/// Sink that records everything it receives.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<EngineEvent>>,
    persisted: Mutex<Vec<Signal>>,
}

impl Recorder {
    fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    fn persisted_count(&self) -> usize {
        self.persisted.lock().unwrap().len()
    }
}

impl NotificationSink for Recorder {
    fn notify(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl TransitionSink for Recorder {
    fn persist(&self, signal: &Signal) {
        self.persisted.lock().unwrap().push(signal.clone());
    }
}

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        feed_ws_url: "wss://example.invalid/ws".to_string(),
        watch_symbols: vec!["BTCUSDT".to_string()],
        notify_webhook_url: None,
        signal_store_url: None,
    }
}

async fn engine_with_recorder() -> (Arc<Engine>, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let engine = Engine::new(&test_config(), recorder.clone(), recorder.clone()).await;
    (engine, recorder)
}

#[tokio::test]
async fn test_buy_and_sell_resolve_in_same_cycle() {
    let (engine, recorder) = engine_with_recorder().await;

    let buy = Signal::new("btcusdt", SignalSide::Buy, 100.0);
    let sell = Signal::new("btcusdt", SignalSide::Sell, 100.0);
    let buy_id = buy.id;
    let sell_id = sell.id;
    engine.track_signal(buy).await;
    engine.track_signal(sell).await;

    for price in [100.0, 101.0, 103.0] {
        engine.history().append("btcusdt", price);
    }

    engine.scheduler().run_cycle();

    let buy = engine.signals().get(buy_id).unwrap();
    assert_eq!(buy.result, SignalResult::Success);
    assert!(buy.profit_percent.unwrap() >= 2.0);

    let sell = engine.signals().get(sell_id).unwrap();
    assert_eq!(sell.result, SignalResult::Failure);
    assert!(sell.profit_percent.unwrap() <= -2.0);

    assert_eq!(recorder.event_count(), 2);
    assert_eq!(recorder.persisted_count(), 2);
}

#[tokio::test]
async fn test_resolution_is_notified_exactly_once() {
    let (engine, recorder) = engine_with_recorder().await;

    let signal = Signal::new("btcusdt", SignalSide::Buy, 100.0);
    engine.track_signal(signal).await;

    engine.history().append("btcusdt", 100.0);
    engine.history().append("btcusdt", 105.0);

    engine.scheduler().run_cycle();
    assert_eq!(recorder.event_count(), 1);

    // Further cycles with more data never touch a terminal signal.
    engine.history().append("btcusdt", 90.0);
    engine.scheduler().run_cycle();
    engine.scheduler().run_cycle();
    assert_eq!(recorder.event_count(), 1);
    assert_eq!(recorder.persisted_count(), 1);
}

#[tokio::test]
async fn test_terminal_result_survives_further_price_moves() {
    let (engine, _recorder) = engine_with_recorder().await;

    let signal = Signal::new("ethusdt", SignalSide::Buy, 100.0);
    let id = signal.id;
    engine.track_signal(signal).await;

    engine.history().append("ethusdt", 100.0);
    engine.history().append("ethusdt", 103.0);
    engine.scheduler().run_cycle();

    let resolved = engine.signals().get(id).unwrap();
    assert_eq!(resolved.result, SignalResult::Success);
    let locked_profit = resolved.profit_percent;

    // A crash after resolution changes nothing.
    engine.history().append("ethusdt", 50.0);
    engine.scheduler().run_cycle();

    let after = engine.signals().get(id).unwrap();
    assert_eq!(after.result, SignalResult::Success);
    assert_eq!(after.profit_percent, locked_profit);
}

#[tokio::test]
async fn test_signal_without_history_stays_pending() {
    let (engine, recorder) = engine_with_recorder().await;

    let signal = Signal::new("dogeusdt", SignalSide::Sell, 0.1);
    let id = signal.id;
    engine.track_signal(signal).await;

    engine.scheduler().run_cycle();
    assert_eq!(engine.signals().get(id).unwrap().result, SignalResult::Pending);

    // One observation is still not enough.
    engine.history().append("dogeusdt", 0.09);
    engine.scheduler().run_cycle();
    assert_eq!(engine.signals().get(id).unwrap().result, SignalResult::Pending);
    assert_eq!(recorder.event_count(), 0);
}

#[tokio::test]
async fn test_alert_fires_once_and_rearms_via_engine() {
    let (engine, recorder) = engine_with_recorder().await;

    let mut alert = Alert::new(
        "btcusdt",
        AlertKind::Price,
        AlertCondition::Above,
        50_000.0,
        true,
        AlertPriority::High,
    );
    engine.track_alert(alert.clone()).await;

    let tick = PriceTick::new("btcusdt", 50_000.0);
    engine.alerts().on_tick(&tick, recorder.as_ref());
    engine.alerts().on_tick(&PriceTick::new("btcusdt", 51_000.0), recorder.as_ref());
    assert_eq!(recorder.event_count(), 1);

    // External re-arm: active off, then on.
    alert.active = false;
    engine.track_alert(alert.clone()).await;
    alert.active = true;
    engine.track_alert(alert).await;

    engine.alerts().on_tick(&PriceTick::new("btcusdt", 50_500.0), recorder.as_ref());
    assert_eq!(recorder.event_count(), 2);
}

#[tokio::test]
async fn test_desired_symbols_follow_tracked_records() {
    let (engine, _recorder) = engine_with_recorder().await;

    // Base watch list only.
    let expected: std::collections::HashSet<String> =
        ["btcusdt".to_string()].into_iter().collect();
    assert_eq!(engine.desired_symbols(), expected);

    let alert = Alert::new(
        "ETHUSDT",
        AlertKind::Price,
        AlertCondition::Below,
        2_000.0,
        true,
        AlertPriority::Normal,
    );
    let alert_id = alert.id;
    engine.track_alert(alert).await;
    engine
        .track_signal(Signal::new("SOLUSDT", SignalSide::Buy, 150.0))
        .await;

    let symbols = engine.desired_symbols();
    assert!(symbols.contains("btcusdt"));
    assert!(symbols.contains("ethusdt"));
    assert!(symbols.contains("solusdt"));

    engine.untrack_alert(alert_id).await;
    assert!(!engine.desired_symbols().contains("ethusdt"));
}

#[tokio::test]
async fn test_stop_clears_transient_state() {
    let (engine, recorder) = engine_with_recorder().await;
    engine.scheduler().start();

    let alert = Alert::new(
        "btcusdt",
        AlertKind::Price,
        AlertCondition::Above,
        10.0,
        true,
        AlertPriority::Normal,
    );
    engine.track_alert(alert).await;
    engine
        .track_signal(Signal::new("btcusdt", SignalSide::Buy, 100.0))
        .await;
    engine
        .alerts()
        .on_tick(&PriceTick::new("btcusdt", 20.0), recorder.as_ref());
    assert_eq!(recorder.event_count(), 1);

    engine.stop().await;
    assert!(!engine.scheduler().is_running());
    assert!(engine.signals().is_empty());

    // Alert definitions survive, but the firing session is over.
    engine
        .alerts()
        .on_tick(&PriceTick::new("btcusdt", 20.0), recorder.as_ref());
    assert_eq!(recorder.event_count(), 2);
}
