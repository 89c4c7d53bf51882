//! Bar intervals.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interval of a bar, in whole seconds.
///
/// Common intervals are available as constants; any positive number of
/// seconds is a valid custom interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe(u32);

impl Timeframe {
    pub const MINUTE: Timeframe = Timeframe(60);
    pub const FIVE_MINUTES: Timeframe = Timeframe(300);
    pub const FIFTEEN_MINUTES: Timeframe = Timeframe(900);
    pub const THIRTY_MINUTES: Timeframe = Timeframe(1_800);
    pub const HOUR: Timeframe = Timeframe(3_600);
    pub const FOUR_HOURS: Timeframe = Timeframe(14_400);
    pub const DAY: Timeframe = Timeframe(86_400);
    pub const WEEK: Timeframe = Timeframe(604_800);

    /// Create a custom timeframe. Returns `None` for zero seconds.
    pub fn from_secs(secs: u32) -> Option<Self> {
        (secs > 0).then_some(Self(secs))
    }

    /// Get the duration of the timeframe in seconds.
    pub fn as_secs(&self) -> u64 {
        u64::from(self.0)
    }

    /// Get the duration of the timeframe.
    pub fn as_duration(&self) -> Duration {
        Duration::seconds(i64::from(self.0))
    }

    /// Check if this is an intraday timeframe.
    pub fn is_intraday(&self) -> bool {
        self.0 < Self::DAY.0
    }

    /// Number of bars of this timeframe needed to cover `period` (rounded up).
    pub fn bars_in(&self, period: Duration) -> u64 {
        u64::try_from(period.num_seconds())
            .map(|secs| self.bars_in_secs(secs))
            .unwrap_or(0)
    }

    /// Number of bars needed to cover `secs` seconds, rounded up.
    pub fn bars_in_secs(&self, secs: u64) -> u64 {
        secs.div_ceil(self.as_secs())
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::DAY
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0;
        if secs % Self::WEEK.0 == 0 {
            write!(f, "{}w", secs / Self::WEEK.0)
        } else if secs % Self::DAY.0 == 0 {
            write!(f, "{}d", secs / Self::DAY.0)
        } else if secs % Self::HOUR.0 == 0 {
            write!(f, "{}h", secs / Self::HOUR.0)
        } else if secs % Self::MINUTE.0 == 0 {
            write!(f, "{}m", secs / Self::MINUTE.0)
        } else {
            write!(f, "{}s", secs)
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "minute" => return Ok(Self::MINUTE),
            "hour" | "hourly" => return Ok(Self::HOUR),
            "day" | "daily" => return Ok(Self::DAY),
            "week" | "weekly" => return Ok(Self::WEEK),
            _ => {}
        }

        let split = normalized
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(normalized.len());
        let (count, unit) = normalized.split_at(split);
        let count: u32 = count
            .parse()
            .map_err(|_| format!("Invalid timeframe: {}", s))?;

        let unit_secs = match unit {
            "s" | "sec" | "secs" => 1,
            "m" | "min" | "mins" => Self::MINUTE.0,
            "h" | "hour" | "hours" => Self::HOUR.0,
            "d" | "day" | "days" => Self::DAY.0,
            "w" | "week" | "weeks" => Self::WEEK.0,
            _ => return Err(format!("Invalid timeframe: {}", s)),
        };

        count
            .checked_mul(unit_secs)
            .and_then(Self::from_secs)
            .ok_or_else(|| format!("Invalid timeframe: {}", s))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(timeframe: Timeframe) -> Self {
        timeframe.to_string()
    }
}
