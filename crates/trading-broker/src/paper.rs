//! Paper portfolio for simulation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};
use uuid::Uuid;
use trading_core::traits::Portfolio;
use trading_core::types::{
    AgentId, DataStream, Direction, Order, OrderRequest, OrderStatus, OrderType, PendingOrder,
    Trade,
};

/// Paper portfolio settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    /// Initial capital
    pub initial_capital: Decimal,
    /// Slippage percentage applied against the order direction
    pub slippage_pct: Decimal,
    /// Commission per unit traded
    pub commission_per_unit: Decimal,
    /// Data streams available to agents
    pub streams: Vec<DataStream>,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            initial_capital: dec!(100000),
            slippage_pct: dec!(0.05),
            commission_per_unit: Decimal::ZERO,
            streams: Vec::new(),
        }
    }
}

/// In-memory portfolio: data streams, order factory, order queue and bar
/// subscriptions, with simulated execution of the queue.
#[derive(Debug, Clone)]
pub struct PaperPortfolio {
    streams: Vec<DataStream>,
    queue: Vec<PendingOrder>,
    subscriptions: HashMap<String, Vec<AgentId>>,
    cash: Decimal,
    slippage_pct: Decimal,
    commission_per_unit: Decimal,
}

impl PaperPortfolio {
    /// Create a new paper portfolio with initial capital.
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            streams: Vec::new(),
            queue: Vec::new(),
            subscriptions: HashMap::new(),
            cash: initial_capital,
            slippage_pct: dec!(0.05),
            commission_per_unit: Decimal::ZERO,
        }
    }

    pub fn from_config(config: &PaperConfig) -> Self {
        let mut portfolio = Self::new(config.initial_capital)
            .with_slippage(config.slippage_pct)
            .with_commission(config.commission_per_unit);
        for stream in &config.streams {
            portfolio.add_stream(stream.clone());
        }
        portfolio
    }

    /// Set slippage percentage.
    pub fn with_slippage(mut self, slippage_pct: Decimal) -> Self {
        self.slippage_pct = slippage_pct;
        self
    }

    /// Set commission per unit.
    pub fn with_commission(mut self, commission: Decimal) -> Self {
        self.commission_per_unit = commission;
        self
    }

    /// Add a data stream.
    pub fn with_stream(mut self, stream: DataStream) -> Self {
        self.add_stream(stream);
        self
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    /// Number of orders waiting in the queue, cancelled ones included.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Agents subscribed to new bars of `symbol`.
    pub fn subscribers(&self, symbol: &str) -> &[AgentId] {
        self.subscriptions
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Cancel a queued order. Returns `false` if no such order is queued.
    pub fn cancel_queued(&mut self, order_id: Uuid) -> bool {
        match self.queue.iter_mut().find(|o| o.id() == order_id) {
            Some(order) => {
                order.cancel();
                true
            }
            None => false,
        }
    }

    /// Execute queued orders against market prices.
    ///
    /// Cancelled orders are discarded. Orders without a price, or whose limit
    /// or stop condition is not met, stay queued. Returns each fill with the
    /// filled order, ready to be fed back into the owning agent.
    pub fn execute_queued(&mut self, prices: &HashMap<String, Decimal>) -> Vec<(Trade, PendingOrder)> {
        let mut fills = Vec::new();
        let mut waiting = Vec::new();

        for mut order in std::mem::take(&mut self.queue) {
            if order.is_cancelled() {
                debug!(order_id = %order.id(), symbol = %order.symbol(), "Dropping cancelled order");
                continue;
            }

            let Some(&market_price) = prices.get(order.symbol()) else {
                waiting.push(order);
                continue;
            };

            let Some(fill_price) = self.fill_price(&order.order, market_price) else {
                trace!(order_id = %order.id(), %market_price, "Order not marketable");
                waiting.push(order);
                continue;
            };

            let quantity = order.order.quantity;
            let commission = self.commission_per_unit * quantity;
            match order.order.direction {
                Direction::Long => self.cash -= fill_price * quantity + commission,
                Direction::Short => self.cash += fill_price * quantity - commission,
            }

            order.set_status(OrderStatus::Filled);
            let trade = Trade::fill(&order, quantity, fill_price).with_commission(commission);
            debug!(
                order_id = %order.id(),
                symbol = %trade.symbol,
                direction = %trade.direction,
                quantity = %trade.quantity,
                price = %trade.price,
                "Order filled"
            );
            fills.push((trade, order));
        }

        self.queue = waiting;
        fills
    }

    /// Price at which `order` fills given the market price, if it fills.
    fn fill_price(&self, order: &Order, market_price: Decimal) -> Option<Decimal> {
        let triggered = match (order.order_type, order.stop_price) {
            (OrderType::Stop | OrderType::StopLimit, Some(stop)) => match order.direction {
                Direction::Long => market_price >= stop,
                Direction::Short => market_price <= stop,
            },
            _ => true,
        };
        if !triggered {
            return None;
        }

        // Apply slippage
        let fill_price = match order.direction {
            Direction::Long => market_price * (dec!(1) + self.slippage_pct / dec!(100)),
            Direction::Short => market_price * (dec!(1) - self.slippage_pct / dec!(100)),
        };

        if let (OrderType::Limit | OrderType::StopLimit, Some(limit)) =
            (order.order_type, order.limit_price)
        {
            match order.direction {
                Direction::Long if fill_price > limit => return None,
                Direction::Short if fill_price < limit => return None,
                _ => {}
            }
        }

        Some(fill_price)
    }
}

impl Portfolio for PaperPortfolio {
    fn stream(&self, symbol: &str) -> Option<&DataStream> {
        self.streams.iter().find(|s| s.symbol == symbol)
    }

    fn streams(&self) -> Vec<DataStream> {
        self.streams.clone()
    }

    fn add_stream(&mut self, stream: DataStream) {
        match self.streams.iter_mut().find(|s| s.symbol == stream.symbol) {
            Some(existing) => *existing = stream,
            None => self.streams.push(stream),
        }
    }

    fn create_order(&mut self, request: &OrderRequest, agent_id: AgentId) -> PendingOrder {
        PendingOrder::new(Order::from_request(request, agent_id))
    }

    fn queue_order(&mut self, mut order: PendingOrder) {
        order.set_status(OrderStatus::Submitted);
        self.queue.push(order);
    }

    fn pending_orders(&self) -> Vec<&PendingOrder> {
        self.queue.iter().filter(|o| !o.is_cancelled()).collect()
    }

    fn subscribe_bars(&mut self, agent_id: AgentId, symbol: &str) {
        let agents = self.subscriptions.entry(symbol.to_string()).or_default();
        if !agents.contains(&agent_id) {
            agents.push(agent_id);
        }
    }

    fn unsubscribe_bars(&mut self, agent_id: AgentId, symbol: &str) {
        if let Some(agents) = self.subscriptions.get_mut(symbol) {
            agents.retain(|id| *id != agent_id);
        }
    }

    fn capital(&self) -> Decimal {
        self.cash
    }
}
