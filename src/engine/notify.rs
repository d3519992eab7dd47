//! Outbound sinks for engine transitions.

use crate::types::{EngineEvent, Signal};
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

/// Receives each engine transition exactly once.
///
/// Implementations must not block the caller; anything slow is handed to a
/// spawned task. The sink performs no deduplication of its own.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: EngineEvent);
}

/// Receives each resolved signal for persistence in the external store.
///
/// Delivery is at-least-once from the engine's point of view: a failed
/// persist is logged and not retried, and never rolls back the in-memory
/// resolution.
pub trait TransitionSink: Send + Sync {
    fn persist(&self, signal: &Signal);
}

/// Sink that writes transitions to the log.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, event: EngineEvent) {
        info!("{}", event.message());
    }
}

impl TransitionSink for LogSink {
    fn persist(&self, signal: &Signal) {
        info!(
            "signal {} on {} persisted locally only: {}",
            signal.id,
            signal.symbol,
            signal.result.label()
        );
    }
}

/// Sink that POSTs transitions to an external HTTP endpoint.
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: String) -> Self {
        let client = Client::builder()
            .user_agent("Vigil/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, url }
    }
}

impl NotificationSink for WebhookSink {
    fn notify(&self, event: EngineEvent) {
        let client = self.client.clone();
        let url = self.url.clone();
        // Delivery happens off the tick path; the feed never waits on HTTP.
        tokio::spawn(async move {
            match client.post(&url).json(&event).send().await {
                Ok(response) if !response.status().is_success() => {
                    warn!(
                        "notification webhook returned {} for {}",
                        response.status(),
                        event.symbol()
                    );
                }
                Ok(_) => {}
                Err(e) => warn!("notification webhook failed: {}", e),
            }
        });
    }
}

impl TransitionSink for WebhookSink {
    fn persist(&self, signal: &Signal) {
        let client = self.client.clone();
        let url = format!("{}/{}", self.url.trim_end_matches('/'), signal.id);
        let body = signal.clone();
        tokio::spawn(async move {
            match client.put(&url).json(&body).send().await {
                Ok(response) if !response.status().is_success() => {
                    warn!(
                        "signal store returned {} persisting {}",
                        response.status(),
                        body.id
                    );
                }
                Ok(_) => {}
                Err(e) => warn!("signal store persist failed for {}: {}", body.id, e),
            }
        });
    }
}

/// Composite sink fanning one event out to several receivers.
pub struct Fanout {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl Fanout {
    pub fn new(sinks: Vec<Arc<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }
}

impl NotificationSink for Fanout {
    fn notify(&self, event: EngineEvent) {
        for sink in &self.sinks {
            sink.notify(event.clone());
        }
    }
}
