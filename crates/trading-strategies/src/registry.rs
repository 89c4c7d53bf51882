//! Module registry for building stock modules from parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trading_core::error::StrategyError;
use trading_core::traits::{share, Module, ModuleConfig, SharedModule};
use trading_core::types::Timeframe;
use trading_risk::{PositionSizer, PositionSizerConfig, StopLossConfig, StopLossRisk};

use crate::{
    BarCountExit, BarCountExitConfig, EmaCrossConfig, EmaCrossEntry, FillCounter,
    FillCounterConfig, PriceActionConfig, PriceActionEntry,
};

/// Information about a registered module kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Registry key
    pub kind: String,
    pub description: String,
    /// Default parameters as JSON
    pub default_params: serde_json::Value,
}

/// Registry of the stock module kinds.
pub struct ModuleRegistry {
    kinds: BTreeMap<String, ModuleInfo>,
}

impl ModuleRegistry {
    /// Create a registry with all stock module kinds.
    pub fn new() -> Self {
        let mut registry = Self {
            kinds: BTreeMap::new(),
        };
        registry.insert::<EmaCrossConfig>(
            "ema_cross",
            "Enters on fast/slow moving average crossovers",
        );
        registry.insert::<PriceActionConfig>(
            "price_action",
            "Enters on closes outside the recent high/low range",
        );
        registry.insert::<BarCountExitConfig>(
            "bar_count_exit",
            "Exits positions held for a number of bars",
        );
        registry.insert::<StopLossConfig>(
            "stop_loss",
            "Places a protective stop for every entry",
        );
        registry.insert::<PositionSizerConfig>(
            "position_sizer",
            "Sizes entry orders by quantity, notional or capital share",
        );
        registry.insert::<FillCounterConfig>("fill_counter", "Counts fills and traded volume");
        registry
    }

    fn insert<C: ModuleConfig>(&mut self, kind: &str, description: &str) {
        let default_params =
            serde_json::to_value(C::default()).unwrap_or(serde_json::Value::Null);
        self.kinds.insert(
            kind.to_string(),
            ModuleInfo {
                kind: kind.to_string(),
                description: description.to_string(),
                default_params,
            },
        );
    }

    /// List all module kinds, sorted by key.
    pub fn list(&self) -> Vec<&ModuleInfo> {
        self.kinds.values().collect()
    }

    pub fn get(&self, kind: &str) -> Option<&ModuleInfo> {
        self.kinds.get(kind)
    }

    pub fn exists(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Build the modules for `kind` from JSON parameters.
    ///
    /// Most kinds yield a single module. `ema_cross` also yields the two
    /// indicator modules it reads, which must be registered with the same
    /// agent. A `null` parameter value selects the defaults.
    pub fn create(
        &self,
        kind: &str,
        params: serde_json::Value,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<SharedModule>, StrategyError> {
        let params = match params {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            other => other,
        };

        let modules: Vec<SharedModule> = match kind {
            "ema_cross" => {
                let config = EmaCrossConfig::from_params(params)?;
                let (entry, fast, slow) =
                    EmaCrossEntry::with_indicators(&config, symbol, timeframe);
                vec![shared(fast), shared(slow), shared(entry)]
            }
            "price_action" => {
                let config = PriceActionConfig::from_params(params)?;
                vec![shared(PriceActionEntry::new(kind, &config, symbol, timeframe))]
            }
            "bar_count_exit" => {
                let config = BarCountExitConfig::from_params(params)?;
                vec![shared(BarCountExit::new(kind, &config, symbol, timeframe))]
            }
            "stop_loss" => {
                let config = StopLossConfig::from_params(params)?;
                vec![shared(StopLossRisk::new(kind, config))]
            }
            "position_sizer" => {
                let config = PositionSizerConfig::from_params(params)?;
                vec![shared(PositionSizer::new(kind, config))]
            }
            "fill_counter" => {
                let config = FillCounterConfig::from_params(params)?;
                vec![shared(FillCounter::new(kind, &config))]
            }
            _ => return Err(StrategyError::NotFound(kind.to_string())),
        };
        Ok(modules)
    }

    /// Build `kind` with its default parameters.
    pub fn create_default(
        &self,
        kind: &str,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<SharedModule>, StrategyError> {
        let info = self
            .get(kind)
            .ok_or_else(|| StrategyError::NotFound(kind.to_string()))?;
        self.create(kind, info.default_params.clone(), symbol, timeframe)
    }
}

fn shared<M: Module + 'static>(module: M) -> SharedModule {
    share(module)
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
