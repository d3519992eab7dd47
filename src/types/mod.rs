pub mod alert;
pub mod event;
pub mod price;
pub mod signal;

pub use alert::{Alert, AlertCondition, AlertKind, AlertPriority, AlertStatus};
pub use event::EngineEvent;
pub use price::PriceTick;
pub use signal::{Signal, SignalResult, SignalSide};
