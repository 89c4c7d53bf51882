//! Module parameter sets.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StrategyError;

/// Parameters a module is built from, loadable from JSON.
pub trait ModuleConfig: Serialize + DeserializeOwned + Default + Clone {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;

    /// Parse and validate parameters.
    fn from_params(params: serde_json::Value) -> Result<Self, StrategyError> {
        let config: Self = serde_json::from_value(params)
            .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
