//! Stop-loss risk module.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trading_core::context::AgentContext;
use trading_core::error::StrategyError;
use trading_core::traits::{Module, ModuleConfig};
use trading_core::types::{AgentState, Direction, Hook, ModuleRole, OrderRequest, PendingOrder};

/// Stop-loss calculation method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum StopLossMethod {
    /// Fixed percentage away from the entry price
    FixedPercent { percent: Decimal },
    /// Fixed price distance from the entry price
    FixedAmount { amount: Decimal },
}

impl Default for StopLossMethod {
    fn default() -> Self {
        StopLossMethod::FixedPercent { percent: dec!(2) }
    }
}

impl StopLossMethod {
    /// Stop price protecting a position entered at `entry_price` in
    /// `direction`. Long stops sit below the entry, short stops above.
    pub fn stop_price(&self, entry_price: Decimal, direction: Direction) -> Decimal {
        let offset = match self {
            StopLossMethod::FixedPercent { percent } => entry_price * (*percent / dec!(100)),
            StopLossMethod::FixedAmount { amount } => *amount,
        };
        match direction {
            Direction::Long => entry_price - offset,
            Direction::Short => entry_price + offset,
        }
    }
}

/// Stop-loss module parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StopLossConfig {
    pub method: StopLossMethod,
    /// Open positions above which new trading is refused (0 = unlimited)
    pub max_open_positions: usize,
}

impl Default for StopLossConfig {
    fn default() -> Self {
        Self {
            method: StopLossMethod::default(),
            max_open_positions: 0,
        }
    }
}

impl ModuleConfig for StopLossConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        let distance = match self.method {
            StopLossMethod::FixedPercent { percent } => {
                if percent >= dec!(100) {
                    return Err(StrategyError::InvalidConfig(format!(
                        "stop percent must be below 100, got {percent}"
                    )));
                }
                percent
            }
            StopLossMethod::FixedAmount { amount } => amount,
        };
        if distance <= Decimal::ZERO {
            return Err(StrategyError::InvalidConfig(format!(
                "stop distance must be positive, got {distance}"
            )));
        }
        Ok(())
    }
}

/// Risk management module that attaches a protective stop order to every
/// entry and refuses trading once too many positions are open.
pub struct StopLossRisk {
    name: String,
    config: StopLossConfig,
}

impl StopLossRisk {
    pub fn new(name: impl Into<String>, config: StopLossConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn config(&self) -> &StopLossConfig {
        &self.config
    }

    /// Price the stop is placed from: the order's limit price, otherwise the
    /// latest close of the symbol.
    fn reference_price(order: &PendingOrder, ctx: &AgentContext<'_>) -> Option<Decimal> {
        order.order.limit_price.or_else(|| {
            ctx.current_bar(order.symbol())
                .and_then(|bar| bar.close_decimal())
        })
    }
}

impl Module for StopLossRisk {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ModuleRole {
        ModuleRole::RiskManagement
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::RiskManagement]
    }

    fn is_trading_allowed(&self, ctx: &AgentContext<'_>) -> bool {
        self.config.max_open_positions == 0
            || ctx.open_positions() < self.config.max_open_positions
    }

    fn risk_management(
        &mut self,
        order: &PendingOrder,
        state: AgentState,
        ctx: &mut AgentContext<'_>,
    ) -> Option<PendingOrder> {
        if !state.is_entry() {
            return None;
        }

        let Some(entry_price) = Self::reference_price(order, ctx) else {
            debug!(
                module = %self.name,
                symbol = %order.symbol(),
                "No reference price, stop not placed"
            );
            return None;
        };

        let direction = order.order.direction;
        let stop_price = self.config.method.stop_price(entry_price, direction);
        let request = OrderRequest::stop(
            order.symbol(),
            direction.opposite(),
            order.order.quantity,
            stop_price,
        )
        .with_comment("stop loss");

        debug!(
            module = %self.name,
            symbol = %order.symbol(),
            entry = %entry_price,
            stop = %stop_price,
            "Protective stop proposed"
        );
        Some(ctx.create_order(&request))
    }
}
