//! Collaborator traits: portfolio and position tracking.

use rust_decimal::Decimal;

use crate::types::{AgentId, DataStream, OrderRequest, PendingOrder, Position, Trade};

/// Streams, order factory and order queue shared by an agent's modules.
pub trait Portfolio: Send {
    /// Look up the data stream for a symbol.
    fn stream(&self, symbol: &str) -> Option<&DataStream>;

    /// All data streams.
    fn streams(&self) -> Vec<DataStream>;

    fn add_stream(&mut self, stream: DataStream);

    /// Order factory.
    fn create_order(&mut self, request: &OrderRequest, agent_id: AgentId) -> PendingOrder;

    /// Enqueue an order for execution. Does not wait for a fill.
    fn queue_order(&mut self, order: PendingOrder);

    /// Orders queued and not yet executed.
    fn pending_orders(&self) -> Vec<&PendingOrder>;

    /// Register an agent for new-bar notifications on a symbol.
    fn subscribe_bars(&mut self, agent_id: AgentId, symbol: &str);

    fn unsubscribe_bars(&mut self, agent_id: AgentId, symbol: &str);

    /// Cash available for new positions. Zero when the portfolio does not
    /// track cash.
    fn capital(&self) -> Decimal {
        Decimal::ZERO
    }
}

/// Position ledger updated from fills.
pub trait PositionTracker: Send {
    fn got_fill(&mut self, trade: &Trade);

    /// Position for a symbol; flat when none is open.
    fn position(&self, symbol: &str) -> Position;

    /// All tracked positions, including flat ones.
    fn positions(&self) -> Vec<Position>;
}
