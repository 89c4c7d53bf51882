//! Core data types for the trading agent runtime.

mod chart;
mod module;
mod ohlcv;
mod order;
mod position;
mod state;
mod stream;
mod tick;
mod timeframe;

pub use chart::{ChartKind, ChartPoint};
pub use module::{Hook, ModuleRole};
pub use ohlcv::{Bar, BarSeries};
pub use order::{
    AgentId, Direction, Order, OrderRequest, OrderStatus, OrderType, PendingOrder, Trade,
};
pub use position::Position;
pub use state::{AgentState, DecisionState};
pub use stream::DataStream;
pub use tick::Tick;
pub use timeframe::Timeframe;
