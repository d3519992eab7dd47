//! Binance trade-stream WebSocket client.
//!
//! The engine's single price feed: one outbound connection, a dynamic symbol
//! set, and synchronous tick dispatch to registered listeners. Listeners must
//! not block; anything slow belongs on a spawned task.

use crate::types::PriceTick;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Fixed delay before redialing after a connection loss.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Callback invoked for every parsed tick, in registration order.
pub type TickListener = Arc<dyn Fn(&PriceTick) + Send + Sync>;

/// Stream subscription request.
#[derive(Debug, Serialize)]
struct SubscribeRequest {
    method: &'static str,
    params: Vec<String>,
    id: u64,
}

/// Trade event fields we care about; everything else is ignored.
#[derive(Debug, Deserialize)]
struct TradeMessage {
    #[serde(rename = "e")]
    event: Option<String>,
    #[serde(rename = "s")]
    symbol: Option<String>,
    #[serde(rename = "p")]
    price: Option<String>,
    #[serde(rename = "T")]
    trade_time: Option<i64>,
}

/// Why a connection attempt ended.
enum ConnectionEnd {
    /// Transport closed or errored; redial after the fixed delay.
    Closed,
    /// The desired symbol set changed; redial immediately with the new set.
    Resubscribe,
    /// `stop()` was called.
    Stopped,
}

/// Streaming price feed client.
#[derive(Clone)]
pub struct BinanceWs {
    url: String,
    /// Desired symbol set, lowercased.
    symbols: Arc<RwLock<HashSet<String>>>,
    listeners: Arc<RwLock<Vec<TickListener>>>,
    /// Bumped whenever the desired set changes.
    changes_tx: Arc<watch::Sender<u64>>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    next_request_id: Arc<AtomicU64>,
}

impl BinanceWs {
    /// Create a new feed client for the given stream endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        let (changes_tx, _) = watch::channel(0u64);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            url: url.into(),
            symbols: Arc::new(RwLock::new(HashSet::new())),
            listeners: Arc::new(RwLock::new(Vec::new())),
            changes_tx: Arc::new(changes_tx),
            shutdown_tx: Arc::new(shutdown_tx),
            next_request_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Replace the watched symbol set.
    ///
    /// A changed set tears down the current connection and re-establishes it
    /// with the full new subscription; an identical set is a no-op.
    pub async fn subscribe(&self, symbols: HashSet<String>) {
        let desired: HashSet<String> = symbols.into_iter().map(|s| s.to_lowercase()).collect();

        let mut current = self.symbols.write().await;
        if *current == desired {
            return;
        }
        debug!("feed symbol set now {} symbol(s)", desired.len());
        *current = desired;
        drop(current);

        self.changes_tx.send_modify(|generation| *generation += 1);
    }

    /// Register a tick listener. Listeners run synchronously on the feed
    /// path, in registration order, before the next message is read.
    pub async fn on_tick(&self, listener: impl Fn(&PriceTick) + Send + Sync + 'static) {
        self.listeners.write().await.push(Arc::new(listener));
    }

    /// Request shutdown. The connection loop exits before its next dial.
    pub fn stop(&self) {
        info!("stopping price feed client");
        let _ = self.shutdown_tx.send(true);
    }

    /// Run the feed until `stop()` is called.
    ///
    /// Connection loss is never fatal: the loop redials after
    /// [`RECONNECT_DELAY`] with the last-known symbol set, indefinitely.
    pub async fn connect(&self) -> anyhow::Result<()> {
        let mut shutdown = self.shutdown_tx.subscribe();

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.run_connection(&mut shutdown).await {
                Ok(ConnectionEnd::Stopped) => break,
                Ok(ConnectionEnd::Resubscribe) => {
                    info!("symbol set changed, resubscribing");
                    continue;
                }
                Ok(ConnectionEnd::Closed) => {
                    warn!(
                        "price feed disconnected, reconnecting in {}s",
                        RECONNECT_DELAY.as_secs()
                    );
                }
                Err(e) => {
                    error!(
                        "price feed error: {}, reconnecting in {}s",
                        e,
                        RECONNECT_DELAY.as_secs()
                    );
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                _ = shutdown.changed() => {}
            }
        }

        info!("price feed client stopped");
        Ok(())
    }

    async fn run_connection(
        &self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> anyhow::Result<ConnectionEnd> {
        let mut changes = self.changes_tx.subscribe();
        changes.borrow_and_update();

        let subscribed: Vec<String> = {
            let symbols = self.symbols.read().await;
            symbols.iter().cloned().collect()
        };

        // Nothing to watch: hold off dialing until the set changes.
        if subscribed.is_empty() {
            debug!("no symbols to watch, feed idle");
            tokio::select! {
                _ = changes.changed() => return Ok(ConnectionEnd::Resubscribe),
                _ = shutdown.changed() => return Ok(ConnectionEnd::Stopped),
            }
        }

        info!("connecting to price feed at {}", self.url);
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();
        info!("connected to price feed ({} symbols)", subscribed.len());

        let request = SubscribeRequest {
            method: "SUBSCRIBE",
            params: subscribed.iter().map(|s| trade_channel(s)).collect(),
            id: self.next_request_id.fetch_add(1, Ordering::Relaxed),
        };
        write
            .send(Message::Text(serde_json::to_string(&request)?))
            .await?;

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_message(&text).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = write.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            info!("price feed closed by venue");
                            return Ok(ConnectionEnd::Closed);
                        }
                        Some(Err(e)) => {
                            error!("price feed read error: {}", e);
                            return Ok(ConnectionEnd::Closed);
                        }
                        None => {
                            return Ok(ConnectionEnd::Closed);
                        }
                        _ => {}
                    }
                }
                _ = changes.changed() => {
                    return Ok(ConnectionEnd::Resubscribe);
                }
                _ = shutdown.changed() => {
                    return Ok(ConnectionEnd::Stopped);
                }
            }
        }
    }

    /// Parse one text frame and dispatch the tick, if it is one.
    ///
    /// Payload problems drop the message, never the connection.
    async fn handle_message(&self, text: &str) {
        let tick = match parse_trade(text) {
            Some(tick) => tick,
            None => {
                debug!("dropping non-trade feed payload");
                return;
            }
        };

        debug!("tick: {} = {}", tick.symbol, tick.price);

        let listeners = self.listeners.read().await;
        for listener in listeners.iter() {
            listener(&tick);
        }
    }
}

/// Stream name for a symbol's trade channel.
fn trade_channel(symbol: &str) -> String {
    format!("{}@trade", symbol.to_lowercase())
}

/// Extract a tick from a raw frame.
///
/// Returns None for subscription acks, other event kinds, and malformed
/// payloads alike.
fn parse_trade(text: &str) -> Option<PriceTick> {
    let msg: TradeMessage = serde_json::from_str(text).ok()?;

    if msg.event.as_deref() != Some("trade") {
        return None;
    }

    let symbol = msg.symbol?.to_lowercase();
    let price: f64 = msg.price?.parse().ok()?;
    let observed_at = msg
        .trade_time
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    Some(PriceTick {
        symbol,
        price,
        observed_at,
    })
}
