//! Agent configuration.

use serde::{Deserialize, Serialize};
use trading_core::types::{AgentId, Timeframe};

/// Identity, default stream and backfill settings of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent identifier, fixed for the agent's lifetime
    pub id: AgentId,
    /// Display name
    pub name: String,
    /// Default symbol
    pub symbol: String,
    /// Primary timeframe; only bars of this interval drive decisions
    pub timeframe: Timeframe,
    /// Number of primary bars to replay before trading
    pub backfill_bars: u64,
    /// Backfill period in seconds, converted to bars of the primary timeframe
    pub backfill_period_secs: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            id: 1,
            name: "agent".to_string(),
            symbol: String::new(),
            timeframe: Timeframe::default(),
            backfill_bars: 0,
            backfill_period_secs: None,
        }
    }
}

impl AgentConfig {
    pub fn new(id: AgentId, symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            timeframe,
            ..Self::default()
        }
    }
}
