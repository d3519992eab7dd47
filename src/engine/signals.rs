//! Tracked signals awaiting resolution.

use crate::types::{Signal, SignalResult};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// All signals the engine knows about, keyed by id.
///
/// Only Pending entries are picked up by the validation cycle; resolved
/// signals stay readable until the book is cleared on shutdown.
pub struct SignalBook {
    signals: DashMap<Uuid, Signal>,
}

impl SignalBook {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            signals: DashMap::new(),
        })
    }

    /// Start tracking a signal.
    pub fn track(&self, signal: Signal) {
        debug!("tracking signal {} on {}", signal.id, signal.symbol);
        self.signals.insert(signal.id, signal);
    }

    pub fn get(&self, id: Uuid) -> Option<Signal> {
        self.signals.get(&id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<Signal> {
        self.signals.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Snapshot of signals still awaiting resolution.
    pub fn pending(&self) -> Vec<Signal> {
        self.signals
            .iter()
            .filter(|entry| entry.result == SignalResult::Pending)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Symbols referenced by any pending signal, lowercased.
    pub fn pending_symbols(&self) -> Vec<String> {
        self.signals
            .iter()
            .filter(|entry| entry.result == SignalResult::Pending)
            .map(|entry| entry.symbol.to_lowercase())
            .collect()
    }

    /// Apply a terminal result to a signal, exactly once.
    ///
    /// Returns the updated record, or None when the signal is unknown or was
    /// already resolved (a second resolution attempt is refused and logged,
    /// never re-decided).
    pub fn resolve(
        &self,
        id: Uuid,
        result: SignalResult,
        profit_percent: f64,
    ) -> Option<Signal> {
        let mut entry = self.signals.get_mut(&id)?;

        if entry.result.is_terminal() {
            warn!(
                "refusing to re-resolve signal {} (already {})",
                id,
                entry.result.label()
            );
            return None;
        }

        entry.result = result;
        entry.profit_percent = Some(profit_percent);
        entry.updated_at = Some(chrono::Utc::now().timestamp_millis());
        Some(entry.value().clone())
    }

    /// Drop every tracked signal.
    pub fn clear(&self) {
        self.signals.clear();
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl Default for SignalBook {
    fn default() -> Self {
        Self {
            signals: DashMap::new(),
        }
    }
}
