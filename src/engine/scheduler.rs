//! Periodic validation of pending signals.

use crate::engine::notify::{NotificationSink, TransitionSink};
use crate::engine::validator::{self, Validation};
use crate::engine::{AlertBook, PriceHistory, SignalBook};
use crate::types::EngineEvent;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Fixed cadence of the validation cycle.
pub const VALIDATION_INTERVAL: Duration = Duration::from_secs(60);

/// Drives signal validation on a fixed interval.
///
/// Two states, Stopped and Running. Alert evaluation does not belong here;
/// it runs on the feed tick path. The scheduler and the tick path share only
/// the synchronized stores.
pub struct ValidationScheduler {
    history: Arc<PriceHistory>,
    signals: Arc<SignalBook>,
    alerts: Arc<AlertBook>,
    sink: Arc<dyn NotificationSink>,
    persist: Arc<dyn TransitionSink>,
    /// Some while Running; dropping the sender stops the loop.
    shutdown: Mutex<Option<watch::Sender<bool>>>,
}

impl ValidationScheduler {
    pub fn new(
        history: Arc<PriceHistory>,
        signals: Arc<SignalBook>,
        alerts: Arc<AlertBook>,
        sink: Arc<dyn NotificationSink>,
        persist: Arc<dyn TransitionSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            history,
            signals,
            alerts,
            sink,
            persist,
            shutdown: Mutex::new(None),
        })
    }

    /// Stopped -> Running. Spawns the periodic loop; a second call while
    /// Running is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut guard = match self.shutdown.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_some() {
            warn!("validation scheduler already running");
            return;
        }

        let (tx, mut rx) = watch::channel(false);
        *guard = Some(tx);
        drop(guard);

        let scheduler = self.clone();
        tokio::spawn(async move {
            info!(
                "validation scheduler started ({}s interval)",
                VALIDATION_INTERVAL.as_secs()
            );
            let mut ticker = tokio::time::interval(VALIDATION_INTERVAL);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        scheduler.run_cycle();
                    }
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("validation scheduler stopped");
        });
    }

    /// Running -> Stopped. The in-flight cycle completes; transient state
    /// (pending-signal tracking and alert firing statuses) is cleared so a
    /// later `start` begins fresh.
    pub fn stop(&self) {
        let mut guard = match self.shutdown.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.take() {
            Some(tx) => {
                let _ = tx.send(true);
            }
            None => {
                warn!("validation scheduler not running");
                return;
            }
        }
        drop(guard);

        self.signals.clear();
        self.alerts.rearm_all();
    }

    /// Whether the periodic loop is active.
    pub fn is_running(&self) -> bool {
        match self.shutdown.lock() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    /// Run one validation pass over every pending signal.
    ///
    /// Each signal is judged against the latest history snapshot; a
    /// resolution updates the book first, then notifies and persists.
    pub fn run_cycle(&self) {
        let pending = self.signals.pending();
        if pending.is_empty() {
            return;
        }
        debug!("validating {} pending signal(s)", pending.len());

        for signal in pending {
            let window = self.history.window(&signal.symbol);
            match validator::validate(&signal, &window) {
                Validation::Pending => {}
                Validation::Resolved {
                    result,
                    profit_percent,
                } => {
                    // resolve() enforces exactly-once even if a concurrent
                    // pass judged the same signal.
                    if let Some(resolved) = self.signals.resolve(signal.id, result, profit_percent)
                    {
                        self.sink.notify(EngineEvent::signal_resolved(&resolved));
                        self.persist.persist(&resolved);
                    }
                }
            }
        }
    }
}
