//! Core traits for the trading agent runtime.

mod config;
mod logic;
mod module;
mod portfolio;

pub use config::ModuleConfig;
pub use logic::{AgentLogic, OrderDecision};
pub use module::{share, Module, SharedModule};
pub use portfolio::{Portfolio, PositionTracker};
