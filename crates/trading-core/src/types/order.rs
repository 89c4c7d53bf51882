//! Order types and structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OrderError;

/// Identifier of a trading agent.
pub type AgentId = u32;

/// Direction of an order or position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Get the opposite direction.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }

    /// Get the sign for position calculations (+1 for long, -1 for short).
    pub fn sign(&self) -> Decimal {
        match self {
            Direction::Long => Decimal::ONE,
            Direction::Short => -Decimal::ONE,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// Order type, derived from which prices are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order - execute immediately at best available price
    Market,
    /// Limit order - execute at specified price or better
    Limit,
    /// Stop order - becomes market order when stop price is reached
    Stop,
    /// Stop-limit order - becomes limit order when stop price is reached
    StopLimit,
}

impl OrderType {
    fn from_prices(limit_price: Option<Decimal>, stop_price: Option<Decimal>) -> Self {
        match (limit_price, stop_price) {
            (None, None) => OrderType::Market,
            (Some(_), None) => OrderType::Limit,
            (None, Some(_)) => OrderType::Stop,
            (Some(_), Some(_)) => OrderType::StopLimit,
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Stop => write!(f, "STOP"),
            OrderType::StopLimit => write!(f, "STOP_LIMIT"),
        }
    }
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created but not yet submitted
    Pending,
    /// Order submitted to broker
    Submitted,
    /// Order accepted by broker/exchange
    Accepted,
    /// Order partially filled
    PartiallyFilled,
    /// Order completely filled
    Filled,
    /// Order canceled
    Canceled,
    /// Order rejected
    Rejected,
    /// Order expired
    Expired,
}

impl OrderStatus {
    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Canceled
                | OrderStatus::Rejected
                | OrderStatus::Expired
        )
    }

    /// Check if the order is active (can still be filled).
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

/// Parameters for creating a new order through the order factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: String,
    /// Long or short
    pub direction: Direction,
    /// Quantity to trade
    pub quantity: Decimal,
    /// Limit price (for limit and stop-limit orders)
    pub limit_price: Option<Decimal>,
    /// Stop price (for stop and stop-limit orders)
    pub stop_price: Option<Decimal>,
    /// Free-form comment carried to the broker
    pub comment: String,
}

impl OrderRequest {
    /// Create a market order request.
    pub fn market(symbol: impl Into<String>, direction: Direction, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            direction,
            quantity,
            limit_price: None,
            stop_price: None,
            comment: String::new(),
        }
    }

    /// Create a limit order request.
    pub fn limit(
        symbol: impl Into<String>,
        direction: Direction,
        quantity: Decimal,
        limit_price: Decimal,
    ) -> Self {
        Self {
            limit_price: Some(limit_price),
            ..Self::market(symbol, direction, quantity)
        }
    }

    /// Create a stop order request.
    pub fn stop(
        symbol: impl Into<String>,
        direction: Direction,
        quantity: Decimal,
        stop_price: Decimal,
    ) -> Self {
        Self {
            stop_price: Some(stop_price),
            ..Self::market(symbol, direction, quantity)
        }
    }

    /// Attach a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// An order as produced by the order factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: String,
    pub direction: Direction,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub limit_price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub comment: String,
    /// Agent that created the order
    pub agent_id: AgentId,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create an order from a request on behalf of an agent.
    pub fn from_request(request: &OrderRequest, agent_id: AgentId) -> Self {
        Self {
            symbol: request.symbol.clone(),
            direction: request.direction,
            order_type: OrderType::from_prices(request.limit_price, request.stop_price),
            quantity: request.quantity,
            limit_price: request.limit_price,
            stop_price: request.stop_price,
            comment: request.comment.clone(),
            agent_id,
            created_at: Utc::now(),
        }
    }

    /// Check the order can be sent to a broker.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.symbol.trim().is_empty() {
            return Err(OrderError::MissingSymbol);
        }
        if self.quantity <= Decimal::ZERO {
            return Err(OrderError::NonPositiveQuantity(self.quantity));
        }
        if let Some(price) = self.limit_price.filter(|p| *p <= Decimal::ZERO) {
            return Err(OrderError::InvalidPrice { kind: "limit", price });
        }
        if let Some(price) = self.stop_price.filter(|p| *p <= Decimal::ZERO) {
            return Err(OrderError::InvalidPrice { kind: "stop", price });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Change the quantity. Used by money management.
    pub fn resize(&mut self, quantity: Decimal) {
        self.quantity = quantity;
    }
}

/// A mutable order proposal moving through risk and money management.
///
/// A pending order is either queued as a whole or discarded; it is never
/// partially submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    id: Uuid,
    pub order: Order,
    status: OrderStatus,
    cancelled: bool,
}

impl PendingOrder {
    pub fn new(order: Order) -> Self {
        Self {
            id: Uuid::new_v4(),
            order,
            status: OrderStatus::Pending,
            cancelled: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn agent_id(&self) -> AgentId {
        self.order.agent_id
    }

    pub fn symbol(&self) -> &str {
        &self.order.symbol
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Mark the order as cancelled. A cancelled order is never queued.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// An execution of (part of) an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    /// Pending order this trade fills
    pub order_id: Uuid,
    pub symbol: String,
    pub direction: Direction,
    pub quantity: Decimal,
    pub price: Decimal,
    pub commission: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    /// Create a trade filling `quantity` of `order` at `price`.
    pub fn fill(order: &PendingOrder, quantity: Decimal, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: order.id(),
            symbol: order.order.symbol.clone(),
            direction: order.order.direction,
            quantity,
            price,
            commission: Decimal::ZERO,
            timestamp: Utc::now(),
        }
    }

    pub fn with_commission(mut self, commission: Decimal) -> Self {
        self.commission = commission;
        self
    }

    /// Calculate the traded value.
    pub fn value(&self) -> Decimal {
        self.quantity * self.price
    }
}
