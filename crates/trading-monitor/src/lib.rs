//! Structured logging for trading agents.

mod logging;

pub use logging::{setup_logging, LoggingError};
