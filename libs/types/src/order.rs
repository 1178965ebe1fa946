//! Order lifecycle types
//!
//! An order moves New → (matched | Resting) → [Resting ⇄ PartiallyFilled]
//! → Filled | Cancelled. Filled and Cancelled are terminal.

use crate::errors::OrderError;
use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// How an order prices itself against the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Matches up to its limit price, remainder rests
    LIMIT,
    /// Matches at any price, remainder is dropped
    MARKET,
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted, not yet matched or rested
    New,
    /// On the book with no fills
    Resting,
    /// On the book (or being matched) with some quantity filled
    PartiallyFilled,
    /// Completely matched (terminal)
    Filled,
    /// Canceled by the caller (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

/// Complete order record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    /// Limit price; ignored for market orders
    pub price: Price,
    pub quantity: Quantity,
    pub filled_quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub status: OrderStatus,
    /// Arrival sequence used for time priority, assigned by the order store
    pub sequence: u64,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
}

impl Order {
    /// Create a new order
    pub fn new(
        order_id: OrderId,
        side: Side,
        order_type: OrderType,
        price: Price,
        quantity: Quantity,
        timestamp: i64,
    ) -> Self {
        Self {
            order_id,
            side,
            order_type,
            price,
            quantity,
            filled_quantity: Quantity::zero(),
            remaining_quantity: quantity,
            status: OrderStatus::New,
            sequence: 0,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Create a limit order
    pub fn limit(order_id: u64, side: Side, price: Price, quantity: u64) -> Self {
        Self::new(OrderId::new(order_id), side, OrderType::LIMIT, price, Quantity::new(quantity), 0)
    }

    /// Create a market order (price is unused)
    pub fn market(order_id: u64, side: Side, quantity: u64) -> Self {
        Self::new(
            OrderId::new(order_id),
            side,
            OrderType::MARKET,
            Price::ZERO,
            Quantity::new(quantity),
            0,
        )
    }

    pub fn is_market(&self) -> bool {
        self.order_type == OrderType::MARKET
    }

    /// Structural well-formedness: positive quantity, positive limit price
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.remaining_quantity.is_zero() {
            return Err(OrderError::InvalidQuantity(self.remaining_quantity.to_string()));
        }
        if self.order_type == OrderType::LIMIT && !self.price.is_positive() {
            return Err(OrderError::InvalidPrice(self.price.to_string()));
        }
        Ok(())
    }

    /// Check quantity invariant: filled + remaining = total
    pub fn check_invariant(&self) -> bool {
        self.filled_quantity.checked_add(self.remaining_quantity) == Some(self.quantity)
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Check if order has any fills
    pub fn has_fills(&self) -> bool {
        !self.filled_quantity.is_zero()
    }

    /// Record an execution of `fill_quantity`
    ///
    /// The fill is clamped to the remaining quantity.
    pub fn add_fill(&mut self, fill_quantity: Quantity, timestamp: i64) {
        debug_assert!(fill_quantity <= self.remaining_quantity, "Fill would exceed order quantity");
        let fill = fill_quantity.min(self.remaining_quantity);

        self.filled_quantity += fill;
        self.remaining_quantity = self.remaining_quantity.saturating_sub(fill);

        if self.is_filled() {
            self.status = OrderStatus::Filled;
        } else if self.has_fills() {
            self.status = OrderStatus::PartiallyFilled;
        }
        self.updated_at = timestamp;
    }

    /// Replace price and open quantity
    ///
    /// Already filled quantity is kept, so the total becomes
    /// `filled + new_quantity`. The order is untouched if that total does
    /// not fit in a `Quantity`.
    pub fn amend(
        &mut self,
        price: Price,
        new_quantity: Quantity,
        timestamp: i64,
    ) -> Result<(), OrderError> {
        let total = self
            .filled_quantity
            .checked_add(new_quantity)
            .ok_or_else(|| OrderError::InvalidQuantity(new_quantity.to_string()))?;

        self.price = price;
        self.remaining_quantity = new_quantity;
        self.quantity = total;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Mark the order as resting on the book
    pub fn rest(&mut self) {
        self.status = if self.has_fills() {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Resting
        };
    }

    /// Cancel the order
    pub fn cancel(&mut self, timestamp: i64) {
        self.status = OrderStatus::Cancelled;
        self.updated_at = timestamp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn limit_buy(qty: u64) -> Order {
        Order::limit(1, Side::BUY, Price::from_str("100.0").unwrap(), qty)
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::BUY.opposite(), Side::SELL);
        assert_eq!(Side::SELL.opposite(), Side::BUY);
    }

    #[test]
    fn test_order_creation() {
        let order = limit_buy(500);

        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.remaining_quantity, Quantity::new(500));
        assert!(order.check_invariant());
        assert!(!order.has_fills());
    }

    #[test]
    fn test_order_fill() {
        let mut order = limit_buy(500);

        order.add_fill(Quantity::new(200), 10);
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.remaining_quantity, Quantity::new(300));
        assert!(order.check_invariant());

        order.add_fill(Quantity::new(300), 20);
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(order.is_filled());
        assert!(order.check_invariant());
        assert_eq!(order.updated_at, 20);
    }

    #[test]
    fn test_order_amend_keeps_filled_quantity() {
        let mut order = limit_buy(500);
        order.add_fill(Quantity::new(100), 10);

        order.amend(Price::from_u64(101), Quantity::new(50), 20).unwrap();
        assert_eq!(order.price, Price::from_u64(101));
        assert_eq!(order.remaining_quantity, Quantity::new(50));
        assert_eq!(order.quantity, Quantity::new(150));
        assert!(order.check_invariant());
    }

    #[test]
    fn test_order_amend_rejects_total_overflow() {
        let mut order = limit_buy(500);
        order.add_fill(Quantity::new(100), 10);

        let err = order.amend(Price::from_u64(101), Quantity::new(u64::MAX), 20).unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity(_)));
        assert_eq!(order.price, Price::from_str("100.0").unwrap());
        assert_eq!(order.remaining_quantity, Quantity::new(400));
        assert_eq!(order.updated_at, 10);
        assert!(order.check_invariant());
    }

    #[test]
    fn test_order_invariant_rejects_wrapping_quantities() {
        let mut order = limit_buy(10);
        order.filled_quantity = Quantity::new(u64::MAX);
        order.remaining_quantity = Quantity::new(11);
        assert!(!order.check_invariant());
    }

    #[test]
    fn test_order_rest_status() {
        let mut order = limit_buy(500);
        order.rest();
        assert_eq!(order.status, OrderStatus::Resting);

        order.add_fill(Quantity::new(1), 1);
        order.rest();
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
    }

    #[test]
    fn test_order_cancel() {
        let mut order = limit_buy(500);
        order.cancel(5);
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.status.is_terminal());
    }

    #[test]
    fn test_validate() {
        assert!(limit_buy(1).validate().is_ok());
        assert!(matches!(limit_buy(0).validate(), Err(OrderError::InvalidQuantity(_))));

        let zero_price = Order::limit(2, Side::SELL, Price::ZERO, 10);
        assert!(matches!(zero_price.validate(), Err(OrderError::InvalidPrice(_))));

        // Market orders carry no meaningful price
        assert!(Order::market(3, Side::SELL, 10).validate().is_ok());
    }

    #[test]
    fn test_order_serialization() {
        let order = Order::limit(9, Side::SELL, Price::from_str("99.5").unwrap(), 100);

        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"side\":\"SELL\""));
        assert!(json.contains("\"order_type\":\"LIMIT\""));

        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
