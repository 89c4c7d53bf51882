//! Position type.

use num_traits::Signed;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Direction, Trade};

/// A position in a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Signed size (positive for long, negative for short)
    pub quantity: Decimal,
    /// Average entry price
    pub avg_entry_price: Decimal,
    /// Last known market price
    pub current_price: Decimal,
    /// Realized profit/loss from closed portions
    pub realized_pnl: Decimal,
}

impl Position {
    /// Create a flat position.
    pub fn flat(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: Decimal::ZERO,
            avg_entry_price: Decimal::ZERO,
            current_price: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
        }
    }

    pub fn is_long(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    pub fn is_short(&self) -> bool {
        self.quantity < Decimal::ZERO
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == Decimal::ZERO
    }

    /// Absolute size of the position.
    pub fn unsigned_size(&self) -> Decimal {
        self.quantity.abs()
    }

    /// Signed quantity needed to bring the position back to flat.
    pub fn flat_quantity(&self) -> Decimal {
        -self.quantity
    }

    /// Direction of the open position, if any.
    pub fn direction(&self) -> Option<Direction> {
        if self.is_long() {
            Some(Direction::Long)
        } else if self.is_short() {
            Some(Direction::Short)
        } else {
            None
        }
    }

    /// Unrealized P&L at the last known price.
    pub fn unrealized_pnl(&self) -> Decimal {
        self.quantity * (self.current_price - self.avg_entry_price)
    }

    pub fn update_price(&mut self, price: Decimal) {
        self.current_price = price;
    }

    /// Apply a trade to the position. Returns the realized P&L.
    pub fn apply_trade(&mut self, trade: &Trade) -> Decimal {
        let realized = self.apply_fill(trade.direction, trade.quantity, trade.price);
        self.realized_pnl -= trade.commission;
        realized - trade.commission
    }

    fn apply_fill(&mut self, direction: Direction, quantity: Decimal, price: Decimal) -> Decimal {
        let fill_qty = quantity * direction.sign();
        let same_direction = self.quantity.signum() == fill_qty.signum();

        let mut realized = Decimal::ZERO;
        if same_direction || self.is_flat() {
            let total_cost = self.quantity * self.avg_entry_price + fill_qty * price;
            let new_quantity = self.quantity + fill_qty;
            if new_quantity != Decimal::ZERO {
                self.avg_entry_price = total_cost / new_quantity;
            }
            self.quantity = new_quantity;
        } else {
            let close_qty = fill_qty.abs().min(self.quantity.abs());
            realized = if self.is_long() {
                close_qty * (price - self.avg_entry_price)
            } else {
                close_qty * (self.avg_entry_price - price)
            };
            self.realized_pnl += realized;

            let remaining = fill_qty.abs() - close_qty;
            if remaining > Decimal::ZERO {
                // reversed through flat
                self.quantity = fill_qty.signum() * remaining;
                self.avg_entry_price = price;
            } else {
                self.quantity += fill_qty;
                if self.is_flat() {
                    self.avg_entry_price = Decimal::ZERO;
                }
            }
        }

        self.current_price = price;
        realized
    }
}
