//! Indicator modules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;
use trading_core::context::AgentContext;
use trading_core::traits::Module;
use trading_core::types::{Bar, ChartKind, Hook, ModuleRole, Timeframe};

use crate::moving_average::{StreamingEma, StreamingIndicator, StreamingSma};
use crate::output::IndicatorOutput;

/// Moving average flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovingAverageKind {
    Sma,
    Ema,
}

/// Indicator-role module feeding bar closes of one stream into a streaming
/// indicator.
///
/// Only bars of the configured symbol and timeframe update the indicator.
pub struct IndicatorModule {
    name: String,
    streams: Vec<String>,
    timeframe: Timeframe,
    indicator: Box<dyn StreamingIndicator>,
    output: IndicatorOutput,
    chart: bool,
}

impl IndicatorModule {
    pub fn new(
        name: impl Into<String>,
        indicator: Box<dyn StreamingIndicator>,
        symbol: impl Into<String>,
        timeframe: Timeframe,
    ) -> Self {
        Self {
            name: name.into(),
            streams: vec![symbol.into()],
            timeframe,
            indicator,
            output: IndicatorOutput::new(),
            chart: false,
        }
    }

    /// Create a moving average module.
    pub fn moving_average(
        name: impl Into<String>,
        kind: MovingAverageKind,
        period: usize,
        symbol: impl Into<String>,
        timeframe: Timeframe,
    ) -> Self {
        let indicator: Box<dyn StreamingIndicator> = match kind {
            MovingAverageKind::Sma => Box::new(StreamingSma::new(period)),
            MovingAverageKind::Ema => Box::new(StreamingEma::new(period)),
        };
        Self::new(name, indicator, symbol, timeframe)
    }

    /// Also publish every value as a chart point.
    pub fn with_chart(mut self) -> Self {
        self.chart = true;
        self
    }

    /// Handle consumers read the values from.
    pub fn output(&self) -> IndicatorOutput {
        self.output.clone()
    }

    pub fn period(&self) -> usize {
        self.indicator.period()
    }
}

impl Module for IndicatorModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ModuleRole {
        ModuleRole::Indicator
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::OnBar]
    }

    fn data_streams(&self) -> &[String] {
        &self.streams
    }

    fn initialize(&mut self, _ctx: &mut AgentContext<'_>) {
        self.indicator.reset();
        self.output.clear();
    }

    fn on_bar(&mut self, bar: &Bar, ctx: &mut AgentContext<'_>) {
        if bar.timeframe != self.timeframe {
            return;
        }
        let Some(value) = self.indicator.update(bar.close) else {
            trace!(module = %self.name, period = self.indicator.period(), "Indicator warming up");
            return;
        };
        self.output.push(value, bar.timestamp);

        if self.chart {
            if let Ok(value) = Decimal::try_from(value) {
                ctx.update_chart(&self.name, self.indicator.name(), ChartKind::Line, value);
            }
        }
    }
}
