//! Async event runner.

use tokio::sync::mpsc;
use tracing::{debug, info};
use trading_core::traits::Portfolio;
use trading_core::types::{Bar, PendingOrder, Position, Tick, Trade};

use crate::agent::TradingAgent;

/// An inbound notification for one agent.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    Bar(Bar),
    Tick(Tick),
    Fill { trade: Trade, order: PendingOrder },
    Order(PendingOrder),
    OrderUpdate(PendingOrder),
    Position(Position),
    Start,
    Stop,
    Flatten,
}

/// Feeds events from a channel into one agent, strictly in arrival order.
pub struct AgentRunner<P> {
    agent: TradingAgent<P>,
    events: mpsc::Receiver<AgentEvent>,
}

impl<P: Portfolio> AgentRunner<P> {
    /// Create a runner and the sender feeding it.
    pub fn new(agent: TradingAgent<P>, buffer: usize) -> (Self, mpsc::Sender<AgentEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { agent, events: rx }, tx)
    }

    /// Process events until every sender is dropped, then hand the agent
    /// back.
    pub async fn run(mut self) -> TradingAgent<P> {
        info!(agent_id = self.agent.id(), "Agent runner started");
        let mut processed = 0u64;
        while let Some(event) = self.events.recv().await {
            debug!(agent_id = self.agent.id(), ?event, "Event");
            self.agent.handle_event(event);
            processed += 1;
        }
        info!(agent_id = self.agent.id(), processed, "Agent runner finished");
        self.agent
    }
}
