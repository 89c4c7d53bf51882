//! Chart points published by modules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AgentId;

/// How a chart series should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Step,
    Bar,
    Scatter,
}

/// A single value published to a named chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub agent_id: AgentId,
    /// Module that published the point
    pub module: String,
    /// Series name
    pub name: String,
    pub kind: ChartKind,
    pub value: Decimal,
    /// Bar time (Unix milliseconds) the point belongs to, if known
    pub timestamp: Option<i64>,
}
