//! Decision signals produced by entry and exit modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Direction;

/// A decision signal for one symbol within one decision phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    EntryLong,
    EntryShort,
    NoEntry,
    ExitLong,
    ExitShort,
    NoExit,
}

impl AgentState {
    /// Opening states (long or short entry).
    pub fn is_entry(&self) -> bool {
        matches!(self, AgentState::EntryLong | AgentState::EntryShort)
    }

    /// Closing states (long or short exit).
    pub fn is_exit(&self) -> bool {
        matches!(self, AgentState::ExitLong | AgentState::ExitShort)
    }

    /// Direction of the order that acts on this decision.
    pub fn order_direction(&self) -> Option<Direction> {
        match self {
            AgentState::EntryLong | AgentState::ExitShort => Some(Direction::Long),
            AgentState::EntryShort | AgentState::ExitLong => Some(Direction::Short),
            AgentState::NoEntry | AgentState::NoExit => None,
        }
    }
}

/// Per-symbol decision signals for the current phase.
///
/// Symbols are tracked once when the agent initializes; signals for
/// untracked symbols are refused. Iteration runs in symbol order.
#[derive(Debug, Clone, Default)]
pub struct DecisionState {
    by_symbol: BTreeMap<String, Vec<AgentState>>,
}

impl DecisionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking decisions for a symbol.
    pub fn track(&mut self, symbol: impl Into<String>) {
        self.by_symbol.entry(symbol.into()).or_default();
    }

    pub fn is_tracked(&self, symbol: &str) -> bool {
        self.by_symbol.contains_key(symbol)
    }

    /// Record a signal. Returns `false` if the symbol is not tracked.
    pub fn push(&mut self, symbol: &str, state: AgentState) -> bool {
        match self.by_symbol.get_mut(symbol) {
            Some(signals) => {
                signals.push(state);
                true
            }
            None => false,
        }
    }

    /// Signals recorded for a symbol in the current phase.
    pub fn get(&self, symbol: &str) -> &[AgentState] {
        self.by_symbol.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Clear every symbol's signals, keeping the tracked symbols.
    pub fn clear(&mut self) {
        self.by_symbol.values_mut().for_each(Vec::clear);
    }

    /// True when no symbol holds a signal.
    pub fn is_empty(&self) -> bool {
        self.by_symbol.values().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AgentState])> {
        self.by_symbol
            .iter()
            .map(|(symbol, signals)| (symbol.as_str(), signals.as_slice()))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.by_symbol.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_requires_tracked_symbol() {
        let mut state = DecisionState::new();
        state.track("EURUSD");

        assert!(state.push("EURUSD", AgentState::EntryLong));
        assert!(!state.push("GBPUSD", AgentState::EntryShort));
        assert_eq!(state.get("EURUSD"), &[AgentState::EntryLong]);
        assert!(state.get("GBPUSD").is_empty());
    }

    #[test]
    fn test_clear_keeps_symbols() {
        let mut state = DecisionState::new();
        state.track("EURUSD");
        state.push("EURUSD", AgentState::ExitLong);

        state.clear();

        assert!(state.is_empty());
        assert!(state.is_tracked("EURUSD"));
    }

    #[test]
    fn test_iter_in_symbol_order() {
        let mut state = DecisionState::new();
        for symbol in ["USDJPY", "AUDUSD", "GBPUSD", "EURUSD"] {
            state.track(symbol);
            state.push(symbol, AgentState::EntryLong);
        }

        let symbols: Vec<&str> = state.iter().map(|(symbol, _)| symbol).collect();
        assert_eq!(symbols, vec!["AUDUSD", "EURUSD", "GBPUSD", "USDJPY"]);
        assert!(state.symbols().eq(symbols.iter().copied()));
    }

    #[test]
    fn test_order_direction() {
        assert_eq!(AgentState::EntryLong.order_direction(), Some(Direction::Long));
        assert_eq!(AgentState::ExitLong.order_direction(), Some(Direction::Short));
        assert_eq!(AgentState::NoEntry.order_direction(), None);
        assert!(AgentState::EntryShort.is_entry());
        assert!(!AgentState::NoEntry.is_entry());
        assert!(AgentState::ExitShort.is_exit());
    }
}
