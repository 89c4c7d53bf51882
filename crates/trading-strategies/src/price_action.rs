//! Breakout entry on raw price action.

use serde::{Deserialize, Serialize};
use trading_core::context::AgentContext;
use trading_core::error::StrategyError;
use trading_core::traits::{Module, ModuleConfig};
use trading_core::types::{Bar, BarSeries, Hook, ModuleRole, Timeframe};

/// Configuration for the breakout entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceActionConfig {
    /// Number of completed bars forming the range
    pub lookback: usize,
}

impl Default for PriceActionConfig {
    fn default() -> Self {
        Self { lookback: 20 }
    }
}

impl ModuleConfig for PriceActionConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.lookback == 0 {
            return Err(StrategyError::InvalidConfig(
                "Lookback must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Enters long when a bar closes above the highest high of the previous
/// `lookback` bars, short when it closes below their lowest low.
pub struct PriceActionEntry {
    name: String,
    timeframe: Timeframe,
    lookback: usize,
    series: BarSeries,
}

impl PriceActionEntry {
    pub fn new(
        name: impl Into<String>,
        config: &PriceActionConfig,
        symbol: impl Into<String>,
        timeframe: Timeframe,
    ) -> Self {
        Self {
            name: name.into(),
            timeframe,
            lookback: config.lookback,
            series: BarSeries::with_capacity(symbol, timeframe, config.lookback + 1),
        }
    }

    fn range(&self) -> Option<(f64, f64)> {
        if self.series.len() <= self.lookback {
            return None;
        }
        (1..=self.lookback)
            .filter_map(|n| self.series.back(n))
            .fold(None, |range, bar| match range {
                None => Some((bar.high, bar.low)),
                Some((high, low)) => Some((high.max(bar.high), low.min(bar.low))),
            })
    }
}

impl Module for PriceActionEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ModuleRole {
        ModuleRole::Entry
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::OnBar, Hook::OnCalculate]
    }

    fn interval(&self) -> Option<Timeframe> {
        Some(self.timeframe)
    }

    fn initialize(&mut self, _ctx: &mut AgentContext<'_>) {
        self.series.clear();
    }

    fn on_bar(&mut self, bar: &Bar, _ctx: &mut AgentContext<'_>) {
        self.series.push(bar.clone());
    }

    fn on_calculate(&mut self, ctx: &mut AgentContext<'_>) {
        let symbol = self.series.symbol.clone();
        let (Some((high, low)), Some(last)) = (self.range(), self.series.last()) else {
            ctx.no_entry(&symbol);
            return;
        };

        if last.close > high {
            ctx.enter_long(&symbol);
        } else if last.close < low {
            ctx.enter_short(&symbol);
        } else {
            ctx.no_entry(&symbol);
        }
    }
}
