//! Per-agent runtime.
//!
//! A [`TradingAgent`] binds strategy modules to event hooks, drives each
//! market event through the indicator, module, entry and exit phases, and
//! runs the resulting orders through risk and money management before they
//! reach the portfolio's queue.

mod agent;
mod backfill;
mod binder;
mod config;
mod events;
mod lifecycle;
mod pipeline;
mod registry;
mod runner;

#[cfg(test)]
mod scenarios;

pub use agent::TradingAgent;
pub use backfill::BackfillBudget;
pub use binder::{bind, BoundHandle, Payload};
pub use config::AgentConfig;
pub use lifecycle::{Lifecycle, LifecycleState};
pub use registry::EventRegistry;
pub use runner::{AgentEvent, AgentRunner};
