//! Fill statistics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trading_core::context::AgentContext;
use trading_core::error::StrategyError;
use trading_core::traits::{Module, ModuleConfig};
use trading_core::types::{ChartKind, Hook, ModuleRole, PendingOrder, Trade};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FillCounterConfig {
    /// Publish the running count as a chart series
    pub chart: bool,
}

impl Default for FillCounterConfig {
    fn default() -> Self {
        Self { chart: true }
    }
}

impl ModuleConfig for FillCounterConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        Ok(())
    }
}

/// Statistic module counting fills and traded volume.
pub struct FillCounter {
    name: String,
    chart: bool,
    fills: u64,
    volume: Decimal,
    commission: Decimal,
}

impl FillCounter {
    pub fn new(name: impl Into<String>, config: &FillCounterConfig) -> Self {
        Self {
            name: name.into(),
            chart: config.chart,
            fills: 0,
            volume: Decimal::ZERO,
            commission: Decimal::ZERO,
        }
    }

    pub fn fills(&self) -> u64 {
        self.fills
    }

    /// Total traded value.
    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn commission(&self) -> Decimal {
        self.commission
    }
}

impl Module for FillCounter {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ModuleRole {
        ModuleRole::Statistic
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::OnFill]
    }

    fn on_fill(&mut self, trade: &Trade, _order: &PendingOrder, ctx: &mut AgentContext<'_>) {
        self.fills += 1;
        self.volume += trade.value();
        self.commission += trade.commission;

        if self.chart {
            ctx.update_chart(&self.name, "fills", ChartKind::Step, Decimal::from(self.fills));
        }
    }
}
