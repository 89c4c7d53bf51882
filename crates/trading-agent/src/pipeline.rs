//! Order decision pipeline: risk gate, risk management, money management and
//! submission.

use tracing::{debug, info, warn};
use trading_core::traits::Portfolio;
use trading_core::types::{
    AgentState, Hook, ModuleRole, OrderRequest, OrderStatus, PendingOrder, Position,
};

use crate::agent::TradingAgent;
use crate::binder::lock;

impl<P: Portfolio> TradingAgent<P> {
    /// Run an order through risk and money management and submit what
    /// survives.
    ///
    /// Returns `false` only when the risk gate refuses trading for a
    /// non-opening decision. Otherwise both stages are attempted and the
    /// result is `true`, whether or not anything was submitted.
    pub fn process_order(&mut self, mut order: PendingOrder, state: AgentState) -> bool {
        if !self.trading_allowed() && !state.is_entry() {
            debug!(
                agent_id = self.core.id,
                order_id = %order.id(),
                state = ?state,
                "Trading not allowed, order dropped"
            );
            return false;
        }

        let risk_handles = self.registry.handles(Hook::RiskManagement);
        if !risk_handles.is_empty() {
            // Every risk handle runs; the first one's order is the one used.
            let mut risk_order = None;
            for (index, handle) in risk_handles.iter().enumerate() {
                let proposed = handle.risk_management(&order, state, &mut self.core.context());
                if index == 0 {
                    risk_order = proposed;
                }
            }

            if let Some(mut risk_order) = risk_order {
                self.logic
                    .risk_management(&mut risk_order, &mut self.core.context());
                self.submit_valid(risk_order);
            }
        }

        let money_handles = self.registry.handles(Hook::PositionSize);
        if !money_handles.is_empty() {
            for handle in money_handles {
                handle.position_size(&mut order, state, &mut self.core.context());
            }
            self.logic
                .money_management(&mut order, &mut self.core.context());
        }

        self.submit_valid(order);
        true
    }

    /// Ask the first live risk management module whether trading is allowed.
    /// Without one, trading is always allowed.
    fn trading_allowed(&mut self) -> bool {
        let Some(module) = self
            .modules
            .iter()
            .filter(|r| r.role == ModuleRole::RiskManagement)
            .find_map(|r| r.upgrade())
        else {
            return true;
        };
        let allowed = lock(&module).is_trading_allowed(&self.core.context());
        allowed
    }

    fn submit_valid(&mut self, order: PendingOrder) {
        match order.order.validate() {
            Ok(()) => {
                self.submit_order(order);
            }
            Err(err) => {
                warn!(
                    agent_id = self.core.id,
                    order_id = %order.id(),
                    symbol = %order.symbol(),
                    error = %err,
                    "Invalid order dropped"
                );
            }
        }
    }

    /// Create an order owned by this agent.
    pub fn create_order(&mut self, request: &OrderRequest) -> PendingOrder {
        self.core.context().create_order(request)
    }

    /// Queue an order unless it was cancelled. Returns the order's status at
    /// the time of the call.
    pub fn submit_order(&mut self, order: PendingOrder) -> OrderStatus {
        self.core.context().submit_order(order)
    }

    /// Submit a market order that takes `position` back to flat.
    pub fn close_position(&mut self, position: &Position) -> Option<OrderStatus> {
        let direction = position.direction()?.opposite();
        let request = OrderRequest::market(&position.symbol, direction, position.unsigned_size())
            .with_comment("close position");
        let order = self.create_order(&request);
        Some(self.submit_order(order))
    }

    /// Close every open position. Returns how many orders were submitted.
    pub fn flatten(&mut self) -> usize {
        let open: Vec<Position> = self
            .core
            .positions
            .positions()
            .into_iter()
            .filter(|p| !p.is_flat())
            .collect();

        info!(agent_id = self.core.id, positions = open.len(), "Flattening");
        open.iter()
            .filter_map(|position| self.close_position(position))
            .count()
    }

    /// Queued orders of this agent that have not been cancelled.
    pub fn pending_orders(&self) -> Vec<&PendingOrder> {
        self.core
            .portfolio
            .pending_orders()
            .into_iter()
            .filter(|o| o.agent_id() == self.core.id && !o.is_cancelled())
            .collect()
    }
}
