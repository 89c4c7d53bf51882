//! OHLCV bar types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Timeframe;

/// A completed OHLCV bar for one symbol and interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Symbol the bar belongs to
    pub symbol: String,
    /// Interval of the bar
    pub timeframe: Timeframe,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar with zero volume.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            timestamp,
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    /// Set the bar volume.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Check that the bar carries a usable symbol.
    pub fn has_symbol(&self) -> bool {
        !self.symbol.trim().is_empty()
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Check if the bar is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the bar is bearish (close < open).
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Closing price as a decimal, for order arithmetic.
    pub fn close_decimal(&self) -> Option<Decimal> {
        Decimal::try_from(self.close).ok()
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Bounded history of bars for one symbol and interval, oldest first.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: VecDeque<Bar>,
    /// Maximum capacity (0 = unlimited)
    capacity: usize,
}

impl BarSeries {
    /// Create a bar series with a maximum capacity.
    /// When capacity is reached, oldest bars are removed.
    pub fn with_capacity(symbol: impl Into<String>, timeframe: Timeframe, capacity: usize) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a bar if it belongs to this series. Returns whether it was kept.
    pub fn push(&mut self, bar: Bar) -> bool {
        if bar.symbol != self.symbol || bar.timeframe != self.timeframe {
            return false;
        }
        if self.capacity > 0 && self.bars.len() >= self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Get the bar `n` positions back from the newest (0 = newest).
    pub fn back(&self, n: usize) -> Option<&Bar> {
        self.bars
            .len()
            .checked_sub(n + 1)
            .and_then(|idx| self.bars.get(idx))
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Clear all bars.
    pub fn clear(&mut self) {
        self.bars.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new("EURUSD", Timeframe::HOUR, ts, close - 0.5, close + 1.0, close - 1.0, close)
    }

    #[test]
    fn test_bar_calculations() {
        let bar = Bar::new("AAPL", Timeframe::DAY, 1000, 100.0, 110.0, 95.0, 105.0)
            .with_volume(1_000_000.0);

        assert!((bar.typical_price() - 103.333333).abs() < 0.001);
        assert!((bar.range() - 15.0).abs() < 0.001);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
        assert!(bar.has_symbol());
        assert_eq!(bar.volume, 1_000_000.0);
    }

    #[test]
    fn test_blank_symbol_is_not_usable() {
        let bar = Bar::new("  ", Timeframe::DAY, 0, 1.0, 1.0, 1.0, 1.0);
        assert!(!bar.has_symbol());
    }

    #[test]
    fn test_bar_series_capacity() {
        let mut series = BarSeries::with_capacity("EURUSD", Timeframe::HOUR, 3);

        for ts in 1..=4 {
            assert!(series.push(bar(ts, 100.0 + ts as f64)));
        }

        assert_eq!(series.len(), 3);
        assert_eq!(series.back(2).unwrap().timestamp, 2);
        assert_eq!(series.last().unwrap().timestamp, 4);
        assert!(series.back(3).is_none());
        assert_eq!(series.closes(), vec![102.0, 103.0, 104.0]);
    }

    #[test]
    fn test_bar_series_rejects_foreign_bars() {
        let mut series = BarSeries::with_capacity("EURUSD", Timeframe::HOUR, 0);
        let foreign = Bar::new("GBPUSD", Timeframe::HOUR, 1, 1.0, 1.0, 1.0, 1.0);
        let other_interval = Bar::new("EURUSD", Timeframe::DAY, 1, 1.0, 1.0, 1.0, 1.0);

        assert!(!series.push(foreign));
        assert!(!series.push(other_interval));
        assert!(series.is_empty());
    }
}
