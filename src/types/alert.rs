//! Alert definitions supplied by the external CRUD layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What quantity an alert watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Price,
    Volume,
    Trend,
}

impl AlertKind {
    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            AlertKind::Price => "Price",
            AlertKind::Volume => "Volume",
            AlertKind::Trend => "Trend",
        }
    }
}

/// Direction of the threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    Above,
    Below,
}

impl AlertCondition {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            AlertCondition::Above => "above",
            AlertCondition::Below => "below",
        }
    }
}

/// Delivery priority attached to an alert by its creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// A user-defined alert as stored by the external CRUD layer.
///
/// The engine reads `active` and keeps its own firing status next to the
/// tracked record; it never deletes or rewrites the definition itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub symbol: String,
    pub kind: AlertKind,
    pub condition: AlertCondition,
    pub threshold: f64,
    pub active: bool,
    #[serde(default)]
    pub priority: AlertPriority,
    /// Unix timestamp (milliseconds) when created.
    pub created_at: i64,
}

impl Alert {
    /// Create a new alert record.
    pub fn new(
        symbol: impl Into<String>,
        kind: AlertKind,
        condition: AlertCondition,
        threshold: f64,
        active: bool,
        priority: AlertPriority,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            kind,
            condition,
            threshold,
            active,
            priority,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Firing lifecycle of a tracked alert.
///
/// An alert fires at most once while Armed; it stays Fired until the caller
/// toggles `active` off (and on again) or the engine is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Armed,
    Fired,
}
