//! The validation and alert engine.
//!
//! Owns all mutable state (price history, alert book, signal book) as one
//! explicitly constructed object; the feed client and the scheduler only see
//! the shared stores. Built once at process start, torn down on shutdown.

pub mod alerts;
pub mod history;
pub mod notify;
pub mod scheduler;
pub mod signals;
pub mod validator;

pub use alerts::{AlertBook, TrackedAlert};
pub use history::{PriceHistory, HISTORY_CAP};
pub use notify::{Fanout, LogSink, NotificationSink, TransitionSink, WebhookSink};
pub use scheduler::{ValidationScheduler, VALIDATION_INTERVAL};
pub use signals::SignalBook;
pub use validator::{Validation, MIN_OBSERVATIONS, RESOLUTION_THRESHOLD_PCT};

use crate::config::Config;
use crate::sources::BinanceWs;
use crate::types::{Alert, Signal};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Wires the feed, the stores, and the scheduler together.
pub struct Engine {
    history: Arc<PriceHistory>,
    alerts: Arc<AlertBook>,
    signals: Arc<SignalBook>,
    feed: BinanceWs,
    scheduler: Arc<ValidationScheduler>,
    /// Symbols the feed always carries, regardless of tracked records.
    base_symbols: Vec<String>,
}

impl Engine {
    /// Build an engine from configuration and outbound sinks.
    pub async fn new(
        config: &Config,
        sink: Arc<dyn NotificationSink>,
        persist: Arc<dyn TransitionSink>,
    ) -> Arc<Self> {
        let history = PriceHistory::new();
        let alerts = AlertBook::new();
        let signals = SignalBook::new();
        let feed = BinanceWs::new(config.feed_ws_url.clone());
        let scheduler = ValidationScheduler::new(
            history.clone(),
            signals.clone(),
            alerts.clone(),
            sink.clone(),
            persist,
        );

        let engine = Arc::new(Self {
            history,
            alerts,
            signals,
            feed,
            scheduler,
            base_symbols: config
                .watch_symbols
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
        });

        // The tick path: append to history, then scan alerts. Both are
        // bounded, non-blocking work; slow delivery lives in the sinks.
        let history = engine.history.clone();
        let alert_book = engine.alerts.clone();
        let tick_sink = sink;
        engine
            .feed
            .on_tick(move |tick| {
                history.append(&tick.symbol, tick.price);
                alert_book.on_tick(tick, tick_sink.as_ref());
            })
            .await;

        engine
    }

    /// Start the feed connection and the validation loop.
    pub async fn start(self: &Arc<Self>) {
        info!("starting engine");
        self.feed.subscribe(self.desired_symbols()).await;

        let feed = self.feed.clone();
        tokio::spawn(async move {
            if let Err(e) = feed.connect().await {
                error!("price feed task ended: {}", e);
            }
        });

        self.scheduler.start();
    }

    /// Stop the validation loop and the feed. Transient state (firing
    /// statuses, tracked signals) is cleared; price history is kept.
    pub async fn stop(&self) {
        info!("stopping engine");
        self.scheduler.stop();
        self.feed.stop();
    }

    /// Track an alert and widen the feed to cover its symbol.
    pub async fn track_alert(&self, alert: Alert) {
        self.alerts.track(alert);
        self.feed.subscribe(self.desired_symbols()).await;
    }

    /// Untrack an alert and shrink the feed set back down.
    pub async fn untrack_alert(&self, id: Uuid) -> Option<Alert> {
        let removed = self.alerts.untrack(id);
        if removed.is_some() {
            self.feed.subscribe(self.desired_symbols()).await;
        }
        removed
    }

    /// Track a signal and widen the feed to cover its symbol.
    pub async fn track_signal(&self, signal: Signal) {
        self.signals.track(signal);
        self.feed.subscribe(self.desired_symbols()).await;
    }

    /// Symbols the feed should carry: the configured base watch list plus
    /// everything referenced by tracked alerts and pending signals.
    pub fn desired_symbols(&self) -> HashSet<String> {
        let mut symbols: HashSet<String> = self.base_symbols.iter().cloned().collect();
        symbols.extend(self.alerts.symbols());
        symbols.extend(self.signals.pending_symbols());
        symbols
    }

    pub fn history(&self) -> &Arc<PriceHistory> {
        &self.history
    }

    pub fn alerts(&self) -> &Arc<AlertBook> {
        &self.alerts
    }

    pub fn signals(&self) -> &Arc<SignalBook> {
        &self.signals
    }

    pub fn scheduler(&self) -> &Arc<ValidationScheduler> {
        &self.scheduler
    }
}
