//! Agent logic turning module signals into orders.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trading_core::context::AgentContext;
use trading_core::error::StrategyError;
use trading_core::traits::{AgentLogic, ModuleConfig, OrderDecision};
use trading_core::types::{AgentState, OrderRequest};

/// Configuration for [`StateDrivenLogic`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicConfig {
    /// Quantity of entry orders before money management
    pub quantity: Decimal,
    /// Treat a `NoEntry` from any module as a veto
    pub unanimous: bool,
    /// Allow adding to an open position
    pub pyramiding: bool,
}

impl Default for LogicConfig {
    fn default() -> Self {
        Self {
            quantity: dec!(1),
            unanimous: false,
            pyramiding: false,
        }
    }
}

impl ModuleConfig for LogicConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.quantity <= Decimal::ZERO {
            return Err(StrategyError::InvalidConfig(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        Ok(())
    }
}

/// Opens a position when the entry modules agree on a direction and closes
/// it when an exit module signals the matching exit.
///
/// Entry signals in opposite directions cancel out.
#[derive(Debug, Clone, Default)]
pub struct StateDrivenLogic {
    config: LogicConfig,
}

impl StateDrivenLogic {
    pub fn new(config: LogicConfig) -> Self {
        Self { config }
    }

    fn entry_state(&self, signals: &[AgentState]) -> Option<AgentState> {
        let long = signals.contains(&AgentState::EntryLong);
        let short = signals.contains(&AgentState::EntryShort);
        if self.config.unanimous && signals.contains(&AgentState::NoEntry) {
            return None;
        }
        match (long, short) {
            (true, false) => Some(AgentState::EntryLong),
            (false, true) => Some(AgentState::EntryShort),
            _ => None,
        }
    }
}

impl AgentLogic for StateDrivenLogic {
    fn entry(&mut self, ctx: &mut AgentContext<'_>) -> Vec<OrderDecision> {
        let candidates: Vec<(String, AgentState)> = ctx
            .decision_state()
            .iter()
            .filter_map(|(symbol, signals)| {
                self.entry_state(signals).map(|state| (symbol.to_string(), state))
            })
            .collect();

        let mut decisions = Vec::new();
        for (symbol, state) in candidates {
            let position = ctx.position(&symbol);
            if !position.is_flat() && !self.config.pyramiding {
                debug!(symbol = %symbol, state = ?state, "Position open, entry skipped");
                continue;
            }
            let Some(direction) = state.order_direction() else {
                continue;
            };
            let request = OrderRequest::market(&symbol, direction, self.config.quantity)
                .with_comment("entry");
            let order = ctx.create_order(&request);
            decisions.push(OrderDecision::new(order, state));
        }
        decisions
    }

    fn exit(&mut self, ctx: &mut AgentContext<'_>) -> Vec<OrderDecision> {
        let candidates: Vec<(String, Vec<AgentState>)> = ctx
            .decision_state()
            .iter()
            .filter(|(_, signals)| signals.iter().any(AgentState::is_exit))
            .map(|(symbol, signals)| (symbol.to_string(), signals.to_vec()))
            .collect();

        let mut decisions = Vec::new();
        for (symbol, signals) in candidates {
            let position = ctx.position(&symbol);
            let state = if position.is_long() && signals.contains(&AgentState::ExitLong) {
                AgentState::ExitLong
            } else if position.is_short() && signals.contains(&AgentState::ExitShort) {
                AgentState::ExitShort
            } else {
                continue;
            };
            let Some(direction) = state.order_direction() else {
                continue;
            };
            let request = OrderRequest::market(&symbol, direction, position.unsigned_size())
                .with_comment("exit");
            let order = ctx.create_order(&request);
            decisions.push(OrderDecision::new(order, state));
        }
        decisions
    }
}
