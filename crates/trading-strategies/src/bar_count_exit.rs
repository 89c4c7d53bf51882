//! Time-based exit.

use serde::{Deserialize, Serialize};
use trading_core::context::AgentContext;
use trading_core::error::StrategyError;
use trading_core::traits::{Module, ModuleConfig};
use trading_core::types::{Bar, Hook, ModuleRole, Timeframe};

/// Configuration for the bar count exit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarCountExitConfig {
    /// Bars a position may be held before it is exited
    pub max_bars: u32,
}

impl Default for BarCountExitConfig {
    fn default() -> Self {
        Self { max_bars: 10 }
    }
}

impl ModuleConfig for BarCountExitConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.max_bars == 0 {
            return Err(StrategyError::InvalidConfig(
                "Max bars must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Exits a position once it has been open for `max_bars` bars.
pub struct BarCountExit {
    name: String,
    symbol: String,
    timeframe: Timeframe,
    max_bars: u32,
    held: u32,
}

impl BarCountExit {
    pub fn new(
        name: impl Into<String>,
        config: &BarCountExitConfig,
        symbol: impl Into<String>,
        timeframe: Timeframe,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            timeframe,
            max_bars: config.max_bars,
            held: 0,
        }
    }

    /// Bars the current position has been held for.
    pub fn bars_held(&self) -> u32 {
        self.held
    }
}

impl Module for BarCountExit {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ModuleRole {
        ModuleRole::Exit
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::OnBar, Hook::OnCalculate]
    }

    fn interval(&self) -> Option<Timeframe> {
        Some(self.timeframe)
    }

    fn initialize(&mut self, _ctx: &mut AgentContext<'_>) {
        self.held = 0;
    }

    fn on_bar(&mut self, bar: &Bar, ctx: &mut AgentContext<'_>) {
        if bar.symbol != self.symbol {
            return;
        }
        if ctx.position(&self.symbol).is_flat() {
            self.held = 0;
        } else {
            self.held += 1;
        }
    }

    fn on_calculate(&mut self, ctx: &mut AgentContext<'_>) {
        let position = ctx.position(&self.symbol);
        if self.held < self.max_bars {
            ctx.no_exit(&self.symbol);
            return;
        }

        if position.is_long() {
            ctx.exit_long(&self.symbol);
        } else if position.is_short() {
            ctx.exit_short(&self.symbol);
        } else {
            ctx.no_exit(&self.symbol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trading_broker::{PaperPortfolio, PositionBook};
    use trading_core::context::{AgentInfo, Session};
    use trading_core::traits::PositionTracker;
    use trading_core::types::{AgentState, Direction, Order, OrderRequest, PendingOrder, Trade};

    fn fill(positions: &mut PositionBook, direction: Direction) {
        let request = OrderRequest::market("AAPL", direction, dec!(5));
        let order = PendingOrder::new(Order::from_request(&request, 1));
        positions.got_fill(&Trade::fill(&order, dec!(5), dec!(100)));
    }

    fn step(module: &mut BarCountExit, positions: &PositionBook) -> Vec<AgentState> {
        let mut portfolio = PaperPortfolio::new(dec!(1000));
        let mut session = Session::new();
        session.decisions.track("AAPL");
        let info = AgentInfo {
            id: 1,
            symbol: "AAPL",
            timeframe: Timeframe::DAY,
            backfilling: false,
        };
        let mut ctx = AgentContext::new(info, &mut portfolio, positions, &mut session);
        let bar = Bar::new("AAPL", Timeframe::DAY, 0, 1.0, 1.0, 1.0, 1.0);
        module.on_bar(&bar, &mut ctx);
        module.on_calculate(&mut ctx);
        ctx.decisions("AAPL").to_vec()
    }

    #[test]
    fn test_exits_after_max_bars() {
        let config = BarCountExitConfig { max_bars: 2 };
        let mut module = BarCountExit::new("timeout", &config, "AAPL", Timeframe::DAY);
        let mut positions = PositionBook::new();

        assert_eq!(step(&mut module, &positions), vec![AgentState::NoExit]);

        fill(&mut positions, Direction::Short);
        assert_eq!(step(&mut module, &positions), vec![AgentState::NoExit]);
        assert_eq!(step(&mut module, &positions), vec![AgentState::ExitShort]);
        assert_eq!(module.bars_held(), 2);

        // closed: counter restarts
        fill(&mut positions, Direction::Long);
        assert_eq!(step(&mut module, &positions), vec![AgentState::NoExit]);
        assert_eq!(module.bars_held(), 0);
    }

    #[test]
    fn test_config_validation() {
        assert!(BarCountExitConfig::default().validate().is_ok());
        assert!(BarCountExitConfig::from_params(serde_json::json!({ "max_bars": 0 })).is_err());
    }
}
