//! Data stream descriptors.

use serde::{Deserialize, Serialize};

use super::Timeframe;

/// A subscribed market data stream: one symbol at a default interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataStream {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl DataStream {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }
}
