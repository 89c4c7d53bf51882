//! Streaming moving averages.

use std::collections::VecDeque;

/// An indicator updated one value at a time.
pub trait StreamingIndicator: Send {
    /// Feed a value. Returns the indicator value once enough data was seen.
    fn update(&mut self, value: f64) -> Option<f64>;

    /// Latest value, if ready.
    fn current(&self) -> Option<f64>;

    /// Lookback period.
    fn period(&self) -> usize;

    fn name(&self) -> &str;

    fn reset(&mut self);

    fn is_ready(&self) -> bool {
        self.current().is_some()
    }
}

/// Simple Moving Average (SMA) over a sliding window.
#[derive(Debug, Clone)]
pub struct StreamingSma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl StreamingSma {
    /// Create a new SMA. A zero period is treated as one.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            window: VecDeque::with_capacity(period),
            sum: 0.0,
        }
    }
}

impl StreamingIndicator for StreamingSma {
    fn update(&mut self, value: f64) -> Option<f64> {
        self.window.push_back(value);
        self.sum += value;
        if self.window.len() > self.period {
            if let Some(oldest) = self.window.pop_front() {
                self.sum -= oldest;
            }
        }
        self.current()
    }

    fn current(&self) -> Option<f64> {
        (self.window.len() == self.period).then(|| self.sum / self.period as f64)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }

    fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }
}

/// Exponential Moving Average (EMA), seeded with the SMA of the first
/// `period` values.
#[derive(Debug, Clone)]
pub struct StreamingEma {
    period: usize,
    multiplier: f64,
    current: Option<f64>,
    count: usize,
    sum: f64,
}

impl StreamingEma {
    /// Create a new EMA. A zero period is treated as one.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            current: None,
            count: 0,
            sum: 0.0,
        }
    }
}

impl StreamingIndicator for StreamingEma {
    fn update(&mut self, value: f64) -> Option<f64> {
        self.count += 1;

        self.current = match self.current {
            Some(ema) => Some(value * self.multiplier + ema * (1.0 - self.multiplier)),
            None => {
                self.sum += value;
                (self.count == self.period).then(|| self.sum / self.period as f64)
            }
        };
        self.current
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }

    fn reset(&mut self) {
        self.current = None;
        self.count = 0;
        self.sum = 0.0;
    }
}
