//! Layered configuration: a TOML file overridden by `TRADING__*`
//! environment variables.

mod settings;

pub use settings::{AppConfig, AppSettings, LogFormat, LoggingConfig, ModuleSpec};

use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from file and environment, then validate it.
///
/// Environment variables use the `TRADING` prefix and `__` as the section
/// separator, e.g. `TRADING__AGENT__SYMBOL=MSFT`.
pub fn load_config(path: &Path) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix("TRADING")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings: AppConfig = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

/// Parse configuration from a TOML string, without environment overrides.
pub fn from_toml_str(contents: &str) -> Result<AppConfig, SettingsError> {
    let settings: AppConfig = toml::from_str(contents)
        .map_err(|e| SettingsError::Invalid(e.to_string()))?;
    settings.validate()?;
    Ok(settings)
}
