//! Position ledger.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;
use trading_core::traits::PositionTracker;
use trading_core::types::{Position, Trade};

/// Tracks one position per symbol from fills.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: HashMap<String, Position>,
    realized_pnl: Decimal,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Realized P&L across all symbols, net of commission.
    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    /// Unrealized P&L at the last known prices.
    pub fn unrealized_pnl(&self) -> Decimal {
        self.positions.values().map(Position::unrealized_pnl).sum()
    }

    /// Update all position prices.
    pub fn update_prices(&mut self, prices: &HashMap<String, Decimal>) {
        for (symbol, price) in prices {
            if let Some(position) = self.positions.get_mut(symbol) {
                position.update_price(*price);
            }
        }
    }
}

impl PositionTracker for PositionBook {
    fn got_fill(&mut self, trade: &Trade) {
        let position = self
            .positions
            .entry(trade.symbol.clone())
            .or_insert_with(|| Position::flat(&trade.symbol));
        let realized = position.apply_trade(trade);
        self.realized_pnl += realized;

        debug!(
            symbol = %trade.symbol,
            quantity = %position.quantity,
            realized = %realized,
            "Position updated"
        );
    }

    fn position(&self, symbol: &str) -> Position {
        self.positions
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Position::flat(symbol))
    }

    fn positions(&self) -> Vec<Position> {
        self.positions.values().cloned().collect()
    }
}
