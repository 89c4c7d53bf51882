//! Position sizing module.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trading_core::context::AgentContext;
use trading_core::error::StrategyError;
use trading_core::traits::{Module, ModuleConfig};
use trading_core::types::{AgentState, Hook, ModuleRole, PendingOrder};

/// Position sizing method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SizingMethod {
    /// Fixed number of units
    Fixed { quantity: Decimal },
    /// Fixed notional value per order
    FixedNotional { amount: Decimal },
    /// Percentage of available capital per order
    PercentOfCapital { percent: Decimal },
}

impl Default for SizingMethod {
    fn default() -> Self {
        SizingMethod::PercentOfCapital { percent: dec!(2) }
    }
}

/// Position sizer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionSizerConfig {
    pub method: SizingMethod,
    /// Upper bound on the order quantity
    pub max_quantity: Option<Decimal>,
    /// Round the quantity down to whole units
    pub whole_units: bool,
}

impl Default for PositionSizerConfig {
    fn default() -> Self {
        Self {
            method: SizingMethod::default(),
            max_quantity: None,
            whole_units: true,
        }
    }
}

impl ModuleConfig for PositionSizerConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        let value = match self.method {
            SizingMethod::Fixed { quantity } => quantity,
            SizingMethod::FixedNotional { amount } => amount,
            SizingMethod::PercentOfCapital { percent } => {
                if percent > dec!(100) {
                    return Err(StrategyError::InvalidConfig(format!(
                        "percent of capital must be at most 100, got {percent}"
                    )));
                }
                percent
            }
        };
        if value <= Decimal::ZERO {
            return Err(StrategyError::InvalidConfig(format!(
                "sizing value must be positive, got {value}"
            )));
        }
        if let Some(max) = self.max_quantity.filter(|max| *max <= Decimal::ZERO) {
            return Err(StrategyError::InvalidConfig(format!(
                "max quantity must be positive, got {max}"
            )));
        }
        Ok(())
    }
}

/// Money management module setting the quantity of entry orders.
///
/// Exit orders keep the quantity they were created with.
pub struct PositionSizer {
    name: String,
    config: PositionSizerConfig,
}

impl PositionSizer {
    pub fn new(name: impl Into<String>, config: PositionSizerConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Quantity for an order at `price` given `capital`. Zero when the price
    /// is unusable.
    pub fn quantity(&self, price: Decimal, capital: Decimal) -> Decimal {
        if price <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let base = match self.config.method {
            SizingMethod::Fixed { quantity } => quantity,
            SizingMethod::FixedNotional { amount } => amount / price,
            SizingMethod::PercentOfCapital { percent } => capital * (percent / dec!(100)) / price,
        };

        let capped = match self.config.max_quantity {
            Some(max) => base.min(max),
            None => base,
        };

        if self.config.whole_units {
            capped.floor()
        } else {
            capped
        }
    }
}

impl Module for PositionSizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ModuleRole {
        ModuleRole::MoneyManagement
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::PositionSize]
    }

    fn position_size(
        &mut self,
        order: &mut PendingOrder,
        state: AgentState,
        ctx: &mut AgentContext<'_>,
    ) {
        if !state.is_entry() {
            return;
        }

        let price = order.order.limit_price.or_else(|| {
            ctx.current_bar(order.symbol())
                .and_then(|bar| bar.close_decimal())
        });
        let Some(price) = price else {
            debug!(module = %self.name, symbol = %order.symbol(), "No price, order not resized");
            return;
        };

        let quantity = self.quantity(price, ctx.capital());
        debug!(
            module = %self.name,
            symbol = %order.symbol(),
            from = %order.order.quantity,
            to = %quantity,
            "Order resized"
        );
        order.order.resize(quantity);
    }
}
