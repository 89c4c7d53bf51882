//! Risk and money management modules.
//!
//! [`StopLossRisk`] gates trading and attaches protective stops to entries;
//! [`PositionSizer`] sets entry order quantities.

mod position_sizer;
mod stop_loss;

pub use position_sizer::{PositionSizer, PositionSizerConfig, SizingMethod};
pub use stop_loss::{StopLossConfig, StopLossMethod, StopLossRisk};
