//! Configuration structures.

use serde::{Deserialize, Serialize};
use trading_agent::AgentConfig;
use trading_broker::PaperConfig;
use trading_core::error::StrategyError;
use trading_core::traits::SharedModule;
use trading_strategies::ModuleRegistry;

use crate::SettingsError;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub portfolio: PaperConfig,
    /// Modules in registration order
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "trading-agent".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
    /// Also write logs to this file, rotated daily
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

/// A module to build through the module registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Registry key, e.g. `ema_cross`
    pub kind: String,
    /// Symbol the module trades; the agent's default symbol when absent
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl AppConfig {
    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.agent.symbol.trim().is_empty() {
            return Err(SettingsError::Invalid("agent symbol is empty".into()));
        }
        if let Some(index) = self.modules.iter().position(|m| m.kind.trim().is_empty()) {
            return Err(SettingsError::Invalid(format!(
                "module #{index} has an empty kind"
            )));
        }
        if !self
            .portfolio
            .streams
            .iter()
            .any(|s| s.symbol == self.agent.symbol)
        {
            return Err(SettingsError::Invalid(format!(
                "no portfolio stream for agent symbol {}",
                self.agent.symbol
            )));
        }
        Ok(())
    }

    /// Build every configured module, in order.
    pub fn build_modules(
        &self,
        registry: &ModuleRegistry,
    ) -> Result<Vec<SharedModule>, StrategyError> {
        let mut modules = Vec::new();
        for spec in &self.modules {
            let symbol = spec.symbol.as_deref().unwrap_or(&self.agent.symbol);
            modules.extend(registry.create(
                &spec.kind,
                spec.params.clone(),
                symbol,
                self.agent.timeframe,
            )?);
        }
        Ok(modules)
    }
}
