//! Context handed to every module hook.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::traits::{Portfolio, PositionTracker};
use crate::types::{
    AgentId, AgentState, Bar, ChartKind, ChartPoint, DataStream, DecisionState, OrderRequest,
    OrderStatus, PendingOrder, Position, Tick, Timeframe,
};

/// Mutable per-agent state that lives across events.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Signals of the current decision phase
    pub decisions: DecisionState,
    /// Latest bar per symbol
    pub current_bars: HashMap<String, Bar>,
    /// Latest tick per symbol
    pub current_ticks: HashMap<String, Tick>,
    /// Chart points published since the last drain
    pub charts: Vec<ChartPoint>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the chart points published so far.
    pub fn drain_charts(&mut self) -> Vec<ChartPoint> {
        std::mem::take(&mut self.charts)
    }
}

/// Identity of the agent a context belongs to.
#[derive(Debug, Clone, Copy)]
pub struct AgentInfo<'a> {
    pub id: AgentId,
    /// Default symbol
    pub symbol: &'a str,
    /// Primary timeframe
    pub timeframe: Timeframe,
    pub backfilling: bool,
}

/// Everything a module may read or change while handling an event.
///
/// Borrowed from the agent for the duration of a single hook call.
pub struct AgentContext<'a> {
    info: AgentInfo<'a>,
    portfolio: &'a mut dyn Portfolio,
    positions: &'a dyn PositionTracker,
    session: &'a mut Session,
}

impl<'a> AgentContext<'a> {
    pub fn new(
        info: AgentInfo<'a>,
        portfolio: &'a mut dyn Portfolio,
        positions: &'a dyn PositionTracker,
        session: &'a mut Session,
    ) -> Self {
        Self {
            info,
            portfolio,
            positions,
            session,
        }
    }

    pub fn agent_id(&self) -> AgentId {
        self.info.id
    }

    /// Default symbol of the agent.
    pub fn symbol(&self) -> &str {
        self.info.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.info.timeframe
    }

    /// True while the agent replays history to warm up its modules.
    pub fn is_backfilling(&self) -> bool {
        self.info.backfilling
    }

    // --- Market data ---

    pub fn current_bar(&self, symbol: &str) -> Option<&Bar> {
        self.session.current_bars.get(symbol)
    }

    pub fn current_tick(&self, symbol: &str) -> Option<&Tick> {
        self.session.current_ticks.get(symbol)
    }

    pub fn stream(&self, symbol: &str) -> Option<&DataStream> {
        self.portfolio.stream(symbol)
    }

    pub fn add_stream(&mut self, stream: DataStream) {
        self.portfolio.add_stream(stream);
    }

    /// Cash the portfolio reports as available.
    pub fn capital(&self) -> Decimal {
        self.portfolio.capital()
    }

    // --- Positions ---

    pub fn position(&self, symbol: &str) -> Position {
        self.positions.position(symbol)
    }

    pub fn positions(&self) -> Vec<Position> {
        self.positions.positions()
    }

    /// Number of symbols with an open position.
    pub fn open_positions(&self) -> usize {
        self.positions
            .positions()
            .iter()
            .filter(|p| !p.is_flat())
            .count()
    }

    // --- Decisions ---

    /// Record a decision signal for a symbol.
    pub fn signal(&mut self, symbol: &str, state: AgentState) -> bool {
        let accepted = self.session.decisions.push(symbol, state);
        if !accepted {
            warn!(
                agent_id = self.info.id,
                symbol,
                state = ?state,
                "Signal for untracked symbol ignored"
            );
        }
        accepted
    }

    pub fn enter_long(&mut self, symbol: &str) -> bool {
        self.signal(symbol, AgentState::EntryLong)
    }

    pub fn enter_short(&mut self, symbol: &str) -> bool {
        self.signal(symbol, AgentState::EntryShort)
    }

    pub fn no_entry(&mut self, symbol: &str) -> bool {
        self.signal(symbol, AgentState::NoEntry)
    }

    pub fn exit_long(&mut self, symbol: &str) -> bool {
        self.signal(symbol, AgentState::ExitLong)
    }

    pub fn exit_short(&mut self, symbol: &str) -> bool {
        self.signal(symbol, AgentState::ExitShort)
    }

    pub fn no_exit(&mut self, symbol: &str) -> bool {
        self.signal(symbol, AgentState::NoExit)
    }

    /// Signals recorded for a symbol in the current phase.
    pub fn decisions(&self, symbol: &str) -> &[AgentState] {
        self.session.decisions.get(symbol)
    }

    pub fn decision_state(&self) -> &DecisionState {
        &self.session.decisions
    }

    // --- Orders ---

    /// Create an order owned by this agent through the portfolio's factory.
    pub fn create_order(&mut self, request: &OrderRequest) -> PendingOrder {
        self.portfolio.create_order(request, self.info.id)
    }

    /// Queue an order with the portfolio unless it was cancelled.
    ///
    /// Returns the order's status at the time of the call.
    pub fn submit_order(&mut self, order: PendingOrder) -> OrderStatus {
        let status = order.status();
        if order.is_cancelled() {
            warn!(
                agent_id = self.info.id,
                order_id = %order.id(),
                symbol = %order.symbol(),
                "Cancelled order not queued"
            );
            return status;
        }

        debug!(
            agent_id = self.info.id,
            order_id = %order.id(),
            symbol = %order.symbol(),
            direction = %order.order.direction,
            order_type = %order.order.order_type,
            quantity = %order.order.quantity,
            "Queueing order"
        );
        self.portfolio.queue_order(order);
        status
    }

    pub fn pending_orders(&self) -> Vec<&PendingOrder> {
        self.portfolio.pending_orders()
    }

    // --- Charts ---

    /// Publish a value to a named chart series.
    pub fn update_chart(
        &mut self,
        module: &str,
        name: &str,
        kind: ChartKind,
        value: Decimal,
    ) {
        let timestamp = self
            .session
            .current_bars
            .get(self.info.symbol)
            .map(|bar| bar.timestamp);
        self.session.charts.push(ChartPoint {
            agent_id: self.info.id,
            module: module.to_string(),
            name: name.to_string(),
            kind,
            value,
            timestamp,
        });
    }
}
