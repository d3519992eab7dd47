use std::env;

const DEFAULT_FEED_WS_URL: &str = "wss://stream.binance.com:9443/ws";
const DEFAULT_WATCH_SYMBOLS: &str = "BTCUSDT,ETHUSDT,SOLUSDT";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Venue WebSocket stream endpoint.
    pub feed_ws_url: String,
    /// Symbols the feed always watches, so history is warm before any
    /// alert or signal arrives.
    pub watch_symbols: Vec<String>,
    /// Webhook receiving notification events (optional).
    pub notify_webhook_url: Option<String>,
    /// External store receiving resolved signals (optional).
    pub signal_store_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        let watch_symbols = env::var("WATCH_SYMBOLS")
            .unwrap_or_else(|_| DEFAULT_WATCH_SYMBOLS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            feed_ws_url: env::var("FEED_WS_URL")
                .unwrap_or_else(|_| DEFAULT_FEED_WS_URL.to_string()),
            watch_symbols,
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL").ok(),
            signal_store_url: env::var("SIGNAL_STORE_URL").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
