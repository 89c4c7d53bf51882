//! Stock strategy modules and agent logic.
//!
//! - [`EmaCrossEntry`]: moving average crossover entry
//! - [`PriceActionEntry`]: range breakout entry
//! - [`BarCountExit`]: exit after a holding period
//! - [`FillCounter`]: fill statistics
//! - [`StateDrivenLogic`]: turns entry/exit signals into orders
//!
//! [`ModuleRegistry`] builds any of these, plus the risk and money modules,
//! from JSON parameters.

mod bar_count_exit;
mod ema_cross;
mod fill_counter;
mod logic;
mod price_action;
mod registry;

pub use bar_count_exit::{BarCountExit, BarCountExitConfig};
pub use ema_cross::{EmaCrossConfig, EmaCrossEntry};
pub use fill_counter::{FillCounter, FillCounterConfig};
pub use logic::{LogicConfig, StateDrivenLogic};
pub use price_action::{PriceActionConfig, PriceActionEntry};
pub use registry::{ModuleInfo, ModuleRegistry};
