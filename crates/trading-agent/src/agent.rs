//! Trading agent: module registrations and lifecycle.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, error, info, warn};
use trading_core::context::{AgentContext, AgentInfo, Session};
use trading_core::error::AgentError;
use trading_core::traits::{AgentLogic, Module, Portfolio, PositionTracker, SharedModule};
use trading_core::types::{AgentId, ChartPoint, DataStream, ModuleRole, Timeframe};

use crate::backfill::BackfillBudget;
use crate::binder::{bind, lock};
use crate::config::AgentConfig;
use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::registry::EventRegistry;

/// A module registration. The agent never owns the module.
#[derive(Debug, Clone)]
pub(crate) struct Registration {
    pub(crate) name: String,
    pub(crate) role: ModuleRole,
    pub(crate) module: Weak<Mutex<dyn Module>>,
}

impl Registration {
    pub(crate) fn upgrade(&self) -> Option<SharedModule> {
        self.module.upgrade()
    }
}

/// State every hook may see through the [`AgentContext`].
pub(crate) struct AgentCore<P> {
    pub(crate) id: AgentId,
    pub(crate) name: String,
    pub(crate) symbol: String,
    pub(crate) timeframe: Timeframe,
    pub(crate) portfolio: P,
    pub(crate) positions: Box<dyn PositionTracker>,
    pub(crate) session: Session,
    pub(crate) backfill: BackfillBudget,
}

impl<P: Portfolio> AgentCore<P> {
    pub(crate) fn context(&mut self) -> AgentContext<'_> {
        let info = AgentInfo {
            id: self.id,
            symbol: &self.symbol,
            timeframe: self.timeframe,
            backfilling: self.backfill.is_backfilling(),
        };
        AgentContext::new(
            info,
            &mut self.portfolio,
            self.positions.as_ref(),
            &mut self.session,
        )
    }

    /// Track decisions for every portfolio stream and the default symbol.
    pub(crate) fn track_symbols(&mut self) {
        for stream in self.portfolio.streams() {
            self.session.decisions.track(stream.symbol);
        }
        if !self.symbol.is_empty() {
            self.session.decisions.track(self.symbol.clone());
        }
    }
}

/// Per-agent runtime wiring strategy modules into the event cycle.
///
/// The agent owns its portfolio `P`, its position tracker and the logic
/// supplied by the concrete strategy. Modules stay owned by the host.
pub struct TradingAgent<P> {
    pub(crate) core: AgentCore<P>,
    pub(crate) registry: EventRegistry,
    pub(crate) modules: Vec<Registration>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) logic: Box<dyn AgentLogic>,
}

impl<P: Portfolio> TradingAgent<P> {
    /// Create an agent. The configured backfill budget applies immediately.
    pub fn new(
        config: &AgentConfig,
        portfolio: P,
        positions: impl PositionTracker + 'static,
        logic: impl AgentLogic + 'static,
    ) -> Self {
        let mut agent = Self {
            core: AgentCore {
                id: config.id,
                name: config.name.clone(),
                symbol: config.symbol.clone(),
                timeframe: config.timeframe,
                portfolio,
                positions: Box::new(positions),
                session: Session::new(),
                backfill: BackfillBudget::new(),
            },
            registry: EventRegistry::new(),
            modules: Vec::new(),
            lifecycle: Lifecycle::new(),
            logic: Box::new(logic),
        };
        agent.set_backfill_bars(config.backfill_bars);
        if let Some(secs) = config.backfill_period_secs {
            agent.core.backfill.raise_to_period_secs(secs, agent.core.timeframe);
        }
        agent
    }

    // --- Identity ---

    pub fn id(&self) -> AgentId {
        self.core.id
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.core.name = name.into();
    }

    /// Default symbol.
    pub fn symbol(&self) -> &str {
        &self.core.symbol
    }

    /// Primary timeframe.
    pub fn timeframe(&self) -> Timeframe {
        self.core.timeframe
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle.started_at()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn is_backfilling(&self) -> bool {
        self.core.backfill.is_backfilling()
    }

    /// Primary bars left before decisions start.
    pub fn backfill_remaining(&self) -> u64 {
        self.core.backfill.remaining()
    }

    // --- Collaborators ---

    pub fn portfolio(&self) -> &P {
        &self.core.portfolio
    }

    pub fn portfolio_mut(&mut self) -> &mut P {
        &mut self.core.portfolio
    }

    pub fn positions(&self) -> &dyn PositionTracker {
        self.core.positions.as_ref()
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.core.session
    }

    /// Context over this agent's state, as handed to module hooks.
    pub fn context(&mut self) -> AgentContext<'_> {
        self.core.context()
    }

    /// Take the chart points modules published since the last call.
    pub fn drain_chart_updates(&mut self) -> Vec<ChartPoint> {
        self.core.session.drain_charts()
    }

    // --- Modules ---

    /// Register a module.
    ///
    /// Refused while running. After `initialize` the module is initialized
    /// and bound immediately.
    pub fn add_module(&mut self, module: SharedModule) -> bool {
        let (name, role) = {
            let guard = lock(&module);
            (guard.name().to_string(), guard.role())
        };

        if self.lifecycle.is_running() {
            warn!(agent_id = self.core.id, module = %name, "Cannot add module while running");
            return false;
        }

        let target = Arc::downgrade(&module);
        if self.modules.iter().any(|r| r.module.ptr_eq(&target)) {
            warn!(agent_id = self.core.id, module = %name, "Module already registered");
            return false;
        }

        debug!(agent_id = self.core.id, module = %name, %role, "Adding module");
        self.modules.push(Registration {
            name,
            role,
            module: target,
        });

        if self.lifecycle.is_initialized() {
            lock(&module).initialize(&mut self.core.context());
            self.registry.register(bind(&module));
            self.core.track_symbols();
        }
        true
    }

    /// Registered modules that are still alive.
    pub fn modules(&self) -> Vec<SharedModule> {
        self.modules.iter().filter_map(Registration::upgrade).collect()
    }

    /// Registered modules with the Statistic role.
    pub fn statistics(&self) -> Vec<SharedModule> {
        self.modules_with_role(ModuleRole::Statistic)
    }

    pub fn modules_with_role(&self, role: ModuleRole) -> Vec<SharedModule> {
        self.modules
            .iter()
            .filter(|r| r.role == role)
            .filter_map(Registration::upgrade)
            .collect()
    }

    // --- Streams ---

    /// Add a data stream to the portfolio. Refused while running.
    pub fn add_data_stream(&mut self, stream: DataStream) -> bool {
        if self.lifecycle.is_running() {
            warn!(agent_id = self.core.id, symbol = %stream.symbol, "Cannot add data stream while running");
            return false;
        }
        let symbol = stream.symbol.clone();
        self.core.portfolio.add_stream(stream);
        if self.lifecycle.is_initialized() {
            self.core.portfolio.subscribe_bars(self.core.id, &symbol);
            self.core.track_symbols();
        }
        true
    }

    /// Make `stream` the agent's default symbol and primary timeframe.
    /// Refused while running.
    pub fn set_default_stream(&mut self, stream: DataStream) -> bool {
        if self.lifecycle.is_running() {
            warn!(agent_id = self.core.id, symbol = %stream.symbol, "Cannot change default stream while running");
            return false;
        }
        self.core.symbol = stream.symbol.clone();
        self.core.timeframe = stream.timeframe;
        self.add_data_stream(stream)
    }

    // --- Backfill ---

    /// Raise the backfill budget to at least `bars` primary bars.
    pub fn set_backfill_bars(&mut self, bars: u64) {
        self.core.backfill.raise_to(bars);
    }

    /// Raise the backfill budget to cover `period` of primary bars.
    pub fn set_backfill_period(&mut self, period: Duration) {
        self.core.backfill.raise_to_period(period, self.core.timeframe);
    }

    // --- Lifecycle ---

    /// Subscribe to bars, initialize and bind every registered module and
    /// set up decision state. A second call does nothing.
    pub fn initialize(&mut self) {
        if self.lifecycle.is_initialized() {
            warn!(agent_id = self.core.id, "Agent already initialized");
            return;
        }
        debug!(agent_id = self.core.id, name = %self.core.name, "Initializing agent");

        for stream in self.core.portfolio.streams() {
            self.core.portfolio.subscribe_bars(self.core.id, &stream.symbol);
        }

        let modules = self.modules();
        for module in &modules {
            lock(module).initialize(&mut self.core.context());
        }
        for module in &modules {
            self.registry.register(bind(module));
        }

        self.core.track_symbols();
        self.lifecycle.mark_initialized();
        debug!(
            agent_id = self.core.id,
            modules = modules.len(),
            handles = self.registry.len(),
            "Agent initialized"
        );
    }

    pub fn start(&mut self) -> bool {
        if !self.lifecycle.start() {
            warn!(agent_id = self.core.id, state = %self.state(), "Agent cannot start");
            return false;
        }
        info!(agent_id = self.core.id, name = %self.core.name, "Agent started");
        true
    }

    pub fn stop(&mut self) -> bool {
        if !self.lifecycle.stop() {
            warn!(agent_id = self.core.id, "Agent is not running");
            return false;
        }
        info!(agent_id = self.core.id, name = %self.core.name, "Agent stopped");
        true
    }

    /// Unsubscribe from bar notifications. Fails while running.
    pub fn deinitialize(&mut self) -> Result<(), AgentError> {
        if self.lifecycle.is_running() {
            error!(agent_id = self.core.id, "Cannot deinitialize a running agent");
            return Err(AgentError::StillRunning {
                agent_id: self.core.id,
            });
        }
        for stream in self.core.portfolio.streams() {
            self.core.portfolio.unsubscribe_bars(self.core.id, &stream.symbol);
        }
        let pruned = self.registry.prune();
        debug!(agent_id = self.core.id, pruned, "Agent deinitialized");
        Ok(())
    }
}
