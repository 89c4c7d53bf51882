//! Strategy module trait.

use std::sync::{Arc, Mutex};

use crate::context::AgentContext;
use crate::types::{
    AgentState, Bar, Hook, ModuleRole, PendingOrder, Position, Tick, Timeframe, Trade,
};

/// A module as registered with an agent.
///
/// The host owns modules; an agent only keeps weak references to them.
pub type SharedModule = Arc<Mutex<dyn Module>>;

/// Wrap a module for registration while keeping a typed handle to it.
pub fn share<M: Module + 'static>(module: M) -> Arc<Mutex<M>> {
    Arc::new(Mutex::new(module))
}

/// A pluggable strategy unit.
///
/// Modules implement any subset of the event hooks and declare that subset
/// through [`Module::hooks`]. The agent binds declared hooks once, when the
/// module is registered; undeclared hooks are never called, so their default
/// bodies are no-ops.
pub trait Module: Send {
    /// Get the name of this module.
    fn name(&self) -> &str;

    /// Declared role. Decides dispatch priority and which phase runs
    /// `on_calculate`.
    fn role(&self) -> ModuleRole;

    /// Hooks this module implements.
    fn hooks(&self) -> &[Hook];

    /// Symbols of the data streams an indicator follows. Empty means all.
    fn data_streams(&self) -> &[String] {
        &[]
    }

    /// Interval a non-indicator module listens to. `None` means all.
    fn interval(&self) -> Option<Timeframe> {
        None
    }

    /// Called once when the agent initializes, before hooks are bound.
    fn initialize(&mut self, _ctx: &mut AgentContext<'_>) {}

    fn on_bar(&mut self, _bar: &Bar, _ctx: &mut AgentContext<'_>) {}

    fn on_tick(&mut self, _tick: &Tick, _ctx: &mut AgentContext<'_>) {}

    fn on_order(&mut self, _order: &PendingOrder, _ctx: &mut AgentContext<'_>) {}

    fn on_order_update(&mut self, _order: &PendingOrder, _ctx: &mut AgentContext<'_>) {}

    fn on_fill(&mut self, _trade: &Trade, _order: &PendingOrder, _ctx: &mut AgentContext<'_>) {}

    fn on_position(&mut self, _position: &Position, _ctx: &mut AgentContext<'_>) {}

    /// Decision logic. Entry and exit modules record their signals here.
    fn on_calculate(&mut self, _ctx: &mut AgentContext<'_>) {}

    /// Gate consulted before any order is processed (risk modules).
    fn is_trading_allowed(&self, _ctx: &AgentContext<'_>) -> bool {
        true
    }

    /// Propose an additional order for `order`, such as a protective stop
    /// (risk modules).
    fn risk_management(
        &mut self,
        _order: &PendingOrder,
        _state: AgentState,
        _ctx: &mut AgentContext<'_>,
    ) -> Option<PendingOrder> {
        None
    }

    /// Resize `order` (money management modules).
    fn position_size(
        &mut self,
        _order: &mut PendingOrder,
        _state: AgentState,
        _ctx: &mut AgentContext<'_>,
    ) {
    }
}
