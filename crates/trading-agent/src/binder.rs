//! Module capability binder.
//!
//! Turns the hooks a module declares into [`BoundHandle`]s, once, when the
//! module is registered. Dispatch afterwards never inspects the module again
//! beyond calling the bound hook.

use std::sync::{Arc, MutexGuard, PoisonError, Weak};

use std::sync::Mutex;
use tracing::{debug, warn};
use trading_core::context::AgentContext;
use trading_core::traits::{Module, SharedModule};
use trading_core::types::{
    AgentState, Bar, DataStream, Hook, ModuleRole, PendingOrder, Position, Tick, Timeframe, Trade,
};

/// Lock a module, recovering from a poisoned mutex.
pub(crate) fn lock<'a>(
    module: &'a Mutex<dyn Module + 'static>,
) -> MutexGuard<'a, dyn Module + 'static> {
    module.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Event payload routed to a bound handle.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'e> {
    Bar(&'e Bar),
    Tick(&'e Tick),
    Order(&'e PendingOrder),
    OrderUpdate(&'e PendingOrder),
    Fill(&'e Trade, &'e PendingOrder),
    Position(&'e Position),
    Calculate,
}

impl Payload<'_> {
    /// Hook that receives this payload.
    pub fn hook(&self) -> Hook {
        match self {
            Payload::Bar(_) => Hook::OnBar,
            Payload::Tick(_) => Hook::OnTick,
            Payload::Order(_) => Hook::OnOrder,
            Payload::OrderUpdate(_) => Hook::OnOrderUpdate,
            Payload::Fill(..) => Hook::OnFill,
            Payload::Position(_) => Hook::OnPosition,
            Payload::Calculate => Hook::OnCalculate,
        }
    }
}

/// A module's implementation of one hook, resolved at registration.
///
/// Holds only a weak reference; the host owns the module.
#[derive(Debug, Clone)]
pub struct BoundHandle {
    hook: Hook,
    module: String,
    role: ModuleRole,
    streams: Vec<String>,
    interval: Option<Timeframe>,
    target: Weak<Mutex<dyn Module>>,
}

impl BoundHandle {
    pub fn hook(&self) -> Hook {
        self.hook
    }

    /// Name of the module the handle was bound from.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn role(&self) -> ModuleRole {
        self.role
    }

    pub fn is_indicator(&self) -> bool {
        self.role.is_indicator()
    }

    /// Data streams an indicator handle follows.
    pub fn streams(&self) -> &[String] {
        &self.streams
    }

    pub fn interval(&self) -> Option<Timeframe> {
        self.interval
    }

    /// Whether the module behind the handle is still alive.
    pub fn is_live(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Indicator routing: undeclared indicators follow every stream, including
    /// an unresolved one; declared indicators only follow their own streams.
    pub fn follows(&self, stream: Option<&DataStream>) -> bool {
        if self.streams.is_empty() {
            return true;
        }
        stream.is_some_and(|s| self.streams.iter().any(|symbol| *symbol == s.symbol))
    }

    /// Interval routing for non-indicator handles.
    pub fn listens_to(&self, interval: Option<Timeframe>) -> bool {
        match self.interval {
            None => true,
            Some(own) => interval == Some(own),
        }
    }

    fn with_module<R>(&self, f: impl FnOnce(&mut dyn Module) -> R) -> Option<R> {
        let Some(module) = self.target.upgrade() else {
            warn!(module = %self.module, hook = %self.hook, "Module dropped, handle skipped");
            return None;
        };
        let mut guard = lock(&module);
        Some(f(&mut *guard))
    }

    /// Invoke the handle with an event payload. Returns `false` if the module
    /// is gone.
    pub fn dispatch(&self, payload: Payload<'_>, ctx: &mut AgentContext<'_>) -> bool {
        let hook = self.hook;
        self.with_module(|module| match (hook, payload) {
            (Hook::OnBar, Payload::Bar(bar)) => module.on_bar(bar, ctx),
            (Hook::OnTick, Payload::Tick(tick)) => module.on_tick(tick, ctx),
            (Hook::OnOrder, Payload::Order(order)) => module.on_order(order, ctx),
            (Hook::OnOrderUpdate, Payload::OrderUpdate(order)) => {
                module.on_order_update(order, ctx)
            }
            (Hook::OnFill, Payload::Fill(trade, order)) => module.on_fill(trade, order, ctx),
            (Hook::OnPosition, Payload::Position(position)) => module.on_position(position, ctx),
            (Hook::OnCalculate, Payload::Calculate) => module.on_calculate(ctx),
            (hook, payload) => {
                debug!(%hook, payload = %payload.hook(), "Payload does not match hook");
            }
        })
        .is_some()
    }

    /// Invoke a risk management handle.
    pub fn risk_management(
        &self,
        order: &PendingOrder,
        state: AgentState,
        ctx: &mut AgentContext<'_>,
    ) -> Option<PendingOrder> {
        self.with_module(|module| module.risk_management(order, state, ctx))
            .flatten()
    }

    /// Invoke a position size handle.
    pub fn position_size(
        &self,
        order: &mut PendingOrder,
        state: AgentState,
        ctx: &mut AgentContext<'_>,
    ) {
        self.with_module(|module| module.position_size(order, state, ctx));
    }
}

/// Read a module's declared hooks and bind one handle per valid hook.
///
/// A hook that does not fit the module's role is skipped, as are repeated
/// declarations. A module declaring nothing yields no handles.
pub fn bind(module: &SharedModule) -> Vec<BoundHandle> {
    let guard = lock(module);
    let name = guard.name().to_string();
    let role = guard.role();
    let streams = if role.is_indicator() {
        guard.data_streams().to_vec()
    } else {
        Vec::new()
    };
    let interval = if role.is_indicator() {
        None
    } else {
        guard.interval()
    };

    let mut handles: Vec<BoundHandle> = Vec::new();
    for &hook in guard.hooks() {
        if !hook.accepts(role) {
            debug!(module = %name, %hook, %role, "Hook does not fit module role, skipped");
            continue;
        }
        if handles.iter().any(|h| h.hook == hook) {
            continue;
        }
        handles.push(BoundHandle {
            hook,
            module: name.clone(),
            role,
            streams: streams.clone(),
            interval,
            target: Arc::downgrade(module),
        });
    }

    debug!(module = %name, %role, handles = handles.len(), "Module bound");
    handles
}
