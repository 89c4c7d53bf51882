//! Quote ticks.

use serde::{Deserialize, Serialize};

/// A real-time quote tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Symbol
    pub symbol: String,
    /// Timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Best bid price
    pub bid: f64,
    /// Best ask price
    pub ask: f64,
    /// Bid size
    pub bid_size: f64,
    /// Ask size
    pub ask_size: f64,
    /// Last traded price, if the feed carries trades
    pub last: Option<f64>,
}

impl Tick {
    /// Create a quote tick without sizes or trade price.
    pub fn quote(symbol: impl Into<String>, timestamp: i64, bid: f64, ask: f64) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            bid,
            ask,
            bid_size: 0.0,
            ask_size: 0.0,
            last: None,
        }
    }

    /// Check that the tick carries a usable symbol.
    pub fn has_symbol(&self) -> bool {
        !self.symbol.trim().is_empty()
    }

    /// Get the mid price.
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Get the spread.
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Last traded price, falling back to the mid price.
    pub fn price(&self) -> f64 {
        self.last.unwrap_or_else(|| self.mid())
    }
}
