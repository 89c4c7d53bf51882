//! Core types and traits for the trading agent runtime.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Tick, Timeframe)
//! - Order, trade and position types
//! - Decision signals produced by strategy modules
//! - The module, agent logic and collaborator traits
//! - The context handed to every module hook

pub mod context;
pub mod error;
pub mod traits;
pub mod types;

pub use context::{AgentContext, AgentInfo, Session};
pub use error::{AgentError, OrderError, StrategyError, TradingError, TradingResult};
pub use traits::*;
pub use types::*;
