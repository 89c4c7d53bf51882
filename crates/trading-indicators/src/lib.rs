//! Streaming indicators and the indicator modules that feed them.
//!
//! Indicators are updated one value at a time as bars arrive. An
//! [`IndicatorModule`] wraps one for the agent's indicator phase and
//! publishes its values through an [`IndicatorOutput`] that consumer modules
//! read later in the same event.

pub mod module;
pub mod moving_average;
pub mod output;

pub use module::{IndicatorModule, MovingAverageKind};
pub use moving_average::{StreamingEma, StreamingIndicator, StreamingSma};
pub use output::{IndicatorOutput, IndicatorValue};
