//! Error types for the trading agent runtime.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level trading system error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Agent lifecycle usage errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("agent {agent_id} is running, stop it before deinitializing")]
    StillRunning { agent_id: u32 },

    #[error("agent {agent_id} is not initialized")]
    NotInitialized { agent_id: u32 },
}

/// Reasons an order fails its validity check at submission time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order has no symbol")]
    MissingSymbol,

    #[error("order quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    #[error("invalid {kind} price {price}")]
    InvalidPrice { kind: &'static str, price: Decimal },
}

/// Errors raised while building strategy modules.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Module not found: {0}")]
    NotFound(String),
}

/// Result type alias for trading operations.
pub type TradingResult<T> = Result<T, TradingError>;
