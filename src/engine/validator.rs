//! Signal resolution against rolling price history.

use crate::types::{Signal, SignalResult, SignalSide};
use tracing::error;

/// Percentage move that resolves a signal, in either direction.
pub const RESOLUTION_THRESHOLD_PCT: f64 = 2.0;

/// Minimum observations required before a signal can be judged.
pub const MIN_OBSERVATIONS: usize = 2;

/// Outcome of validating one signal against one history window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Validation {
    /// Not enough movement (or data) to decide.
    Pending,
    /// The signal has reached a terminal result.
    Resolved {
        result: SignalResult,
        profit_percent: f64,
    },
}

/// Judge a pending signal against the symbol's price history.
///
/// Deterministic function of the window: the latest price is compared to the
/// signal's entry price and the move must cross `RESOLUTION_THRESHOLD_PCT`
/// in either direction to resolve. Fewer than `MIN_OBSERVATIONS` samples
/// means no decision.
///
/// Calling this with an already-resolved signal is a caller bug; it asserts
/// in debug builds and logs without deciding in release.
pub fn validate(signal: &Signal, window: &[f64]) -> Validation {
    if signal.result.is_terminal() {
        debug_assert!(
            false,
            "validate called on resolved signal {} ({})",
            signal.id,
            signal.result.label()
        );
        error!(
            "validate called on resolved signal {} ({}), skipping",
            signal.id,
            signal.result.label()
        );
        return Validation::Pending;
    }

    if window.len() < MIN_OBSERVATIONS {
        return Validation::Pending;
    }

    let latest = match window.last() {
        Some(price) => *price,
        None => return Validation::Pending,
    };

    let change_pct = (latest - signal.entry_price) / signal.entry_price * 100.0;

    match signal.side {
        SignalSide::Buy => {
            if change_pct >= RESOLUTION_THRESHOLD_PCT {
                Validation::Resolved {
                    result: SignalResult::Success,
                    profit_percent: change_pct,
                }
            } else if change_pct <= -RESOLUTION_THRESHOLD_PCT {
                Validation::Resolved {
                    result: SignalResult::Failure,
                    profit_percent: change_pct,
                }
            } else {
                Validation::Pending
            }
        }
        SignalSide::Sell => {
            if change_pct <= -RESOLUTION_THRESHOLD_PCT {
                Validation::Resolved {
                    result: SignalResult::Success,
                    profit_percent: change_pct.abs(),
                }
            } else if change_pct >= RESOLUTION_THRESHOLD_PCT {
                Validation::Resolved {
                    result: SignalResult::Failure,
                    profit_percent: -change_pct,
                }
            } else {
                Validation::Pending
            }
        }
    }
}
