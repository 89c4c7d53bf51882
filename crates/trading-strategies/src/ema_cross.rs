//! Moving average crossover entry.
//!
//! Signals a long entry when the fast average crosses above the slow one and
//! a short entry when it crosses below.

use serde::{Deserialize, Serialize};
use tracing::trace;
use trading_core::context::AgentContext;
use trading_core::error::StrategyError;
use trading_core::traits::{Module, ModuleConfig};
use trading_core::types::{Hook, ModuleRole, Timeframe};
use trading_indicators::{IndicatorModule, IndicatorOutput, MovingAverageKind};

/// Configuration for the crossover entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaCrossConfig {
    /// Fast moving average period
    pub fast_period: usize,
    /// Slow moving average period
    pub slow_period: usize,
    /// Average flavour for both lines
    pub kind: MovingAverageKind,
    /// Publish both averages as chart lines
    pub chart: bool,
}

impl Default for EmaCrossConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            kind: MovingAverageKind::Ema,
            chart: false,
        }
    }
}

impl ModuleConfig for EmaCrossConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be greater than 0".into(),
            ));
        }
        if self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be less than slow period".into(),
            ));
        }
        Ok(())
    }
}

/// Entry module reading two indicator outputs.
pub struct EmaCrossEntry {
    name: String,
    symbol: String,
    fast: IndicatorOutput,
    slow: IndicatorOutput,
}

impl EmaCrossEntry {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        fast: IndicatorOutput,
        slow: IndicatorOutput,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            fast,
            slow,
        }
    }

    /// Build the entry module together with the two indicator modules that
    /// feed it. The indicators must be registered with the same agent.
    pub fn with_indicators(
        config: &EmaCrossConfig,
        symbol: &str,
        timeframe: Timeframe,
    ) -> (Self, IndicatorModule, IndicatorModule) {
        let mut fast = IndicatorModule::moving_average(
            format!("{symbol}_fast_{}", config.fast_period),
            config.kind,
            config.fast_period,
            symbol,
            timeframe,
        );
        let mut slow = IndicatorModule::moving_average(
            format!("{symbol}_slow_{}", config.slow_period),
            config.kind,
            config.slow_period,
            symbol,
            timeframe,
        );
        if config.chart {
            fast = fast.with_chart();
            slow = slow.with_chart();
        }

        let entry = Self::new("ema_cross", symbol, fast.output(), slow.output());
        (entry, fast, slow)
    }
}

impl Module for EmaCrossEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ModuleRole {
        ModuleRole::Entry
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::OnCalculate]
    }

    fn on_calculate(&mut self, ctx: &mut AgentContext<'_>) {
        let fast = self.fast.get();
        let slow = self.slow.get();

        if fast.crossed_above(&slow) {
            trace!(module = %self.name, symbol = %self.symbol, "Crossed above");
            ctx.enter_long(&self.symbol);
        } else if fast.crossed_under(&slow) {
            trace!(module = %self.name, symbol = %self.symbol, "Crossed under");
            ctx.enter_short(&self.symbol);
        } else {
            ctx.no_entry(&self.symbol);
        }
    }
}
