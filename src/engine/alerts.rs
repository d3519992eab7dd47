//! Tracked alerts and their per-tick evaluation.

use crate::engine::notify::NotificationSink;
use crate::types::{Alert, AlertCondition, AlertKind, AlertStatus, EngineEvent, PriceTick};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// An alert definition together with its firing status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedAlert {
    pub alert: Alert,
    pub status: AlertStatus,
}

/// Decide whether a tick crosses an alert's threshold.
///
/// Closed interval on both conditions: a price exactly at the threshold
/// fires. Volume and trend alerts are accepted into the book but have no
/// evaluation yet and never fire.
fn crosses(alert: &Alert, tick: &PriceTick) -> bool {
    if !alert.symbol.eq_ignore_ascii_case(&tick.symbol) {
        return false;
    }
    match alert.kind {
        AlertKind::Price => match alert.condition {
            AlertCondition::Above => tick.price >= alert.threshold,
            AlertCondition::Below => tick.price <= alert.threshold,
        },
        AlertKind::Volume | AlertKind::Trend => false,
    }
}

/// All alerts the engine is watching, keyed by id.
///
/// Firing is edge-triggered: each alert fires at most once while Armed and
/// stays silent until re-armed. Re-arming happens when the caller upserts
/// the record with `active == false`, or wholesale via [`AlertBook::rearm_all`]
/// on engine shutdown.
pub struct AlertBook {
    alerts: DashMap<Uuid, TrackedAlert>,
}

impl AlertBook {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            alerts: DashMap::new(),
        })
    }

    /// Insert or update an alert definition.
    ///
    /// Deactivating an alert ends its firing session: the next activation
    /// starts Armed again.
    pub fn track(&self, alert: Alert) {
        let id = alert.id;
        match self.alerts.get_mut(&id) {
            Some(mut entry) => {
                let status = if alert.active {
                    entry.status
                } else {
                    AlertStatus::Armed
                };
                *entry = TrackedAlert { alert, status };
            }
            None => {
                self.alerts.insert(
                    id,
                    TrackedAlert {
                        alert,
                        status: AlertStatus::Armed,
                    },
                );
            }
        }
        debug!("tracking alert {}", id);
    }

    /// Stop watching an alert. Returns the record if it was tracked.
    pub fn untrack(&self, id: Uuid) -> Option<Alert> {
        self.alerts.remove(&id).map(|(_, tracked)| tracked.alert)
    }

    pub fn get(&self, id: Uuid) -> Option<TrackedAlert> {
        self.alerts.get(&id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<TrackedAlert> {
        self.alerts.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Symbols referenced by any tracked alert, lowercased.
    pub fn symbols(&self) -> Vec<String> {
        self.alerts
            .iter()
            .map(|entry| entry.alert.symbol.to_lowercase())
            .collect()
    }

    /// Evaluate every armed, active alert against one tick.
    ///
    /// Runs synchronously on the feed path, so the work per tick is a scan
    /// and a status flip; delivery itself is non-blocking in the sink.
    pub fn on_tick(&self, tick: &PriceTick, sink: &dyn NotificationSink) {
        let mut fired = Vec::new();

        for mut entry in self.alerts.iter_mut() {
            if !entry.alert.active || entry.status != AlertStatus::Armed {
                continue;
            }
            if crosses(&entry.alert, tick) {
                entry.status = AlertStatus::Fired;
                fired.push(EngineEvent::alert_fired(&entry.alert, tick.price));
            }
        }

        for event in fired {
            sink.notify(event);
        }
    }

    /// Reset every alert's firing status to Armed.
    pub fn rearm_all(&self) {
        for mut entry in self.alerts.iter_mut() {
            entry.status = AlertStatus::Armed;
        }
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

impl Default for AlertBook {
    fn default() -> Self {
        Self {
            alerts: DashMap::new(),
        }
    }
}
