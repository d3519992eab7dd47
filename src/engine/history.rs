//! Rolling per-symbol price history.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

/// Maximum number of observations retained per symbol.
pub const HISTORY_CAP: usize = 100;

/// In-memory ring buffer of recent prices, keyed by symbol.
///
/// Pure data structure; the feed writes, the evaluators read. `window`
/// returns an owned snapshot so evaluation never sees a buffer mutating
/// underneath it.
pub struct PriceHistory {
    series: DashMap<String, VecDeque<f64>>,
}

impl PriceHistory {
    /// Create an empty history store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            series: DashMap::new(),
        })
    }

    /// Record a price observation, evicting the oldest past the cap.
    pub fn append(&self, symbol: &str, price: f64) {
        let key = symbol.to_lowercase();
        let mut entry = self.series.entry(key).or_default();
        let buffer = entry.value_mut();

        buffer.push_back(price);
        while buffer.len() > HISTORY_CAP {
            buffer.pop_front();
        }
    }

    /// Most recent observation for a symbol, if any has been seen.
    pub fn latest(&self, symbol: &str) -> Option<f64> {
        self.series
            .get(&symbol.to_lowercase())
            .and_then(|entry| entry.back().copied())
    }

    /// Snapshot of the retained observations, oldest first.
    ///
    /// Empty when no tick for the symbol has been seen; callers treat that
    /// as "cannot decide yet".
    pub fn window(&self, symbol: &str) -> Vec<f64> {
        self.series
            .get(&symbol.to_lowercase())
            .map(|entry| entry.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of observations retained for a symbol.
    pub fn len(&self, symbol: &str) -> usize {
        self.series
            .get(&symbol.to_lowercase())
            .map(|entry| entry.len())
            .unwrap_or(0)
    }

    /// Symbols with at least one observation.
    pub fn symbols(&self) -> Vec<String> {
        self.series.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self {
            series: DashMap::new(),
        }
    }
}
