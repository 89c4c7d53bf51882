//! Backfill budget.

use chrono::Duration;
use trading_core::types::Timeframe;

/// Number of primary-timeframe bars still to be replayed before the agent
/// starts making decisions.
///
/// The budget only grows through the setters and only shrinks by consuming
/// bars, one per primary bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillBudget {
    remaining: u64,
}

impl BackfillBudget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_backfilling(&self) -> bool {
        self.remaining > 0
    }

    /// Raise the budget to at least `bars`.
    pub fn raise_to(&mut self, bars: u64) {
        self.remaining = self.remaining.max(bars);
    }

    /// Raise the budget to cover `period` of `timeframe` bars.
    pub fn raise_to_period(&mut self, period: Duration, timeframe: Timeframe) {
        self.raise_to(timeframe.bars_in(period));
    }

    /// Raise the budget to cover `secs` seconds of `timeframe` bars.
    pub fn raise_to_period_secs(&mut self, secs: u64, timeframe: Timeframe) {
        self.raise_to(timeframe.bars_in_secs(secs));
    }

    /// Consume one bar. Returns `true` if the bar was part of the backfill.
    pub fn consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}
