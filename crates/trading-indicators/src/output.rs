//! Shared indicator output.

use std::sync::{Arc, Mutex, PoisonError};

/// Latest two values of an indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorValue {
    pub current: Option<f64>,
    pub previous: Option<f64>,
    /// Time of the bar that produced `current`
    pub timestamp: Option<i64>,
}

impl IndicatorValue {
    pub fn is_ready(&self) -> bool {
        self.current.is_some() && self.previous.is_some()
    }

    /// `self` moved from at or below `other` to strictly above it.
    pub fn crossed_above(&self, other: &IndicatorValue) -> bool {
        match (self.previous, self.current, other.previous, other.current) {
            (Some(prev), Some(cur), Some(other_prev), Some(other_cur)) => {
                prev <= other_prev && cur > other_cur
            }
            _ => false,
        }
    }

    /// `self` moved from at or above `other` to strictly below it.
    pub fn crossed_under(&self, other: &IndicatorValue) -> bool {
        other.crossed_above(self)
    }
}

/// Handle to an indicator's values, shared between the indicator module that
/// writes them and the modules that read them.
#[derive(Debug, Clone, Default)]
pub struct IndicatorOutput(Arc<Mutex<IndicatorValue>>);

impl IndicatorOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> IndicatorValue {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a new value, shifting the current one to previous.
    pub fn push(&self, value: f64, timestamp: i64) {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        guard.previous = guard.current;
        guard.current = Some(value);
        guard.timestamp = Some(timestamp);
    }

    pub fn clear(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = IndicatorValue::default();
    }
}
