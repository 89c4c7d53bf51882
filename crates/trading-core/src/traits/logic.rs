//! Agent-level decision logic.

use serde::{Deserialize, Serialize};

use crate::context::AgentContext;
use crate::types::{AgentState, PendingOrder};

/// An order the agent logic wants processed, with the decision behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDecision {
    pub order: PendingOrder,
    pub state: AgentState,
}

impl OrderDecision {
    pub fn new(order: PendingOrder, state: AgentState) -> Self {
        Self { order, state }
    }
}

/// Logic supplied by a concrete agent.
///
/// `entry` runs after the entry modules have calculated and `exit` after the
/// exit modules; both read the decision state through the context and return
/// the orders to run through risk and money management.
pub trait AgentLogic: Send {
    fn entry(&mut self, ctx: &mut AgentContext<'_>) -> Vec<OrderDecision>;

    fn exit(&mut self, ctx: &mut AgentContext<'_>) -> Vec<OrderDecision>;

    /// Adjust the order proposed by the first risk management module.
    fn risk_management(&mut self, _order: &mut PendingOrder, _ctx: &mut AgentContext<'_>) {}

    /// Adjust the entry order after money management modules sized it.
    fn money_management(&mut self, _order: &mut PendingOrder, _ctx: &mut AgentContext<'_>) {}
}
