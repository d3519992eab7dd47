pub mod binance_ws;

pub use binance_ws::{BinanceWs, RECONNECT_DELAY};
