//! Event cycle: routes inbound market and order events to bound handles and
//! drives the entry and exit phases.

use tracing::{debug, error, info, trace, warn};
use trading_core::traits::Portfolio;
use trading_core::types::{
    Bar, DataStream, Hook, ModuleRole, PendingOrder, Position, Tick, Trade,
};

use crate::agent::TradingAgent;
use crate::binder::Payload;
use crate::runner::AgentEvent;

impl<P: Portfolio> TradingAgent<P> {
    /// Process a new bar.
    ///
    /// Indicator handles run first, then every other bar handle. Only bars of
    /// the primary timeframe go on to the entry and exit phases, and not
    /// while backfilling.
    pub fn on_bar(&mut self, bar: &Bar) {
        if !bar.has_symbol() {
            warn!(agent_id = self.core.id, "Dropping bar without symbol");
            return;
        }
        if !self.lifecycle.is_running() {
            trace!(agent_id = self.core.id, symbol = %bar.symbol, "Agent not running, bar ignored");
            return;
        }
        if !self.core.session.decisions.is_tracked(&bar.symbol) {
            warn!(agent_id = self.core.id, symbol = %bar.symbol, "Dropping bar for untracked symbol");
            return;
        }

        self.core
            .session
            .current_bars
            .insert(bar.symbol.clone(), bar.clone());

        let stream = self.core.portfolio.stream(&bar.symbol).cloned();
        if stream.is_none() {
            error!(agent_id = self.core.id, symbol = %bar.symbol, "No data stream for bar");
        }

        trace!(agent_id = self.core.id, symbol = %bar.symbol, timeframe = %bar.timeframe, "Indicator phase");
        for handle in self.registry.handles(Hook::OnBar) {
            if handle.is_indicator() && handle.follows(stream.as_ref()) {
                handle.dispatch(Payload::Bar(bar), &mut self.core.context());
            }
        }

        trace!(agent_id = self.core.id, symbol = %bar.symbol, "Module phase");
        for handle in self.registry.handles(Hook::OnBar) {
            if !handle.is_indicator() && handle.listens_to(Some(bar.timeframe)) {
                handle.dispatch(Payload::Bar(bar), &mut self.core.context());
            }
        }

        if bar.timeframe != self.core.timeframe {
            trace!(
                agent_id = self.core.id,
                symbol = %bar.symbol,
                timeframe = %bar.timeframe,
                primary = %self.core.timeframe,
                "Secondary timeframe, no decisions"
            );
            return;
        }

        if self.core.backfill.consume() {
            trace!(
                agent_id = self.core.id,
                remaining = self.core.backfill.remaining(),
                "Backfilling, no decisions"
            );
            return;
        }

        self.run_decisions();
    }

    /// Entry phase then exit phase, each starting from cleared decisions.
    fn run_decisions(&mut self) {
        self.core.session.decisions.clear();
        self.calculate(ModuleRole::Entry);
        let entries = self.logic.entry(&mut self.core.context());
        for decision in entries {
            self.process_order(decision.order, decision.state);
        }

        self.core.session.decisions.clear();
        self.calculate(ModuleRole::Exit);
        let exits = self.logic.exit(&mut self.core.context());
        for decision in exits {
            self.process_order(decision.order, decision.state);
        }
    }

    fn calculate(&mut self, role: ModuleRole) {
        trace!(agent_id = self.core.id, %role, "Calculating");
        for handle in self.registry.handles(Hook::OnCalculate) {
            if handle.role() == role {
                handle.dispatch(Payload::Calculate, &mut self.core.context());
            }
        }
    }

    /// Record the tick and, while running, hand it to tick handles.
    pub fn on_tick(&mut self, tick: &Tick) {
        if !tick.has_symbol() {
            warn!(agent_id = self.core.id, "Dropping tick without symbol");
            return;
        }
        if !self.lifecycle.is_initialized() {
            warn!(agent_id = self.core.id, symbol = %tick.symbol, "Agent not initialized, tick ignored");
            return;
        }
        if !self.core.session.decisions.is_tracked(&tick.symbol) {
            warn!(agent_id = self.core.id, symbol = %tick.symbol, "Dropping tick for untracked symbol");
            return;
        }

        self.core
            .session
            .current_ticks
            .insert(tick.symbol.clone(), tick.clone());

        if !self.lifecycle.is_running() || !self.registry.has(Hook::OnTick) {
            return;
        }

        let stream: Option<DataStream> = self.core.portfolio.stream(&tick.symbol).cloned();
        for handle in self.registry.handles(Hook::OnTick) {
            let routed = if handle.is_indicator() {
                handle.follows(stream.as_ref())
            } else {
                handle.listens_to(stream.as_ref().map(|s| s.timeframe))
            };
            if routed {
                handle.dispatch(Payload::Tick(tick), &mut self.core.context());
            }
        }
    }

    /// Update positions from a fill and, while running, notify fill handles.
    pub fn on_fill(&mut self, trade: &Trade, order: &PendingOrder) {
        self.core.positions.got_fill(trade);
        debug!(
            agent_id = self.core.id,
            order_id = %order.id(),
            symbol = %trade.symbol,
            quantity = %trade.quantity,
            price = %trade.price,
            "Fill"
        );
        self.dispatch(Payload::Fill(trade, order));
    }

    pub fn on_order(&mut self, order: &PendingOrder) {
        debug!(agent_id = self.core.id, order_id = %order.id(), "Order event");
        self.dispatch(Payload::Order(order));
    }

    pub fn on_order_update(&mut self, order: &PendingOrder) {
        debug!(agent_id = self.core.id, order_id = %order.id(), status = ?order.status(), "Order update");
        self.dispatch(Payload::OrderUpdate(order));
    }

    pub fn on_position(&mut self, position: &Position) {
        debug!(agent_id = self.core.id, symbol = %position.symbol, quantity = %position.quantity, "Position event");
        self.dispatch(Payload::Position(position));
    }

    /// Hand a payload to every handle of its hook, in priority order, while
    /// running.
    fn dispatch(&mut self, payload: Payload<'_>) {
        let hook = payload.hook();
        if !self.lifecycle.is_running() || !self.registry.has(hook) {
            return;
        }
        for handle in self.registry.handles(hook) {
            handle.dispatch(payload, &mut self.core.context());
        }
    }

    /// Apply one runner event.
    pub fn handle_event(&mut self, event: AgentEvent) {
        match event {
            AgentEvent::Bar(bar) => self.on_bar(&bar),
            AgentEvent::Tick(tick) => self.on_tick(&tick),
            AgentEvent::Fill { trade, order } => self.on_fill(&trade, &order),
            AgentEvent::Order(order) => self.on_order(&order),
            AgentEvent::OrderUpdate(order) => self.on_order_update(&order),
            AgentEvent::Position(position) => self.on_position(&position),
            AgentEvent::Start => {
                self.start();
            }
            AgentEvent::Stop => {
                self.stop();
            }
            AgentEvent::Flatten => {
                info!(agent_id = self.core.id, "Flatten requested");
                self.flatten();
            }
        }
    }
}
