//! Price level implementation with FIFO queue
//!
//! A price level contains all resting orders at one price on one side.
//! Order ids are kept in arrival order (oldest first) to enforce time
//! priority. The level only references orders by id; the order store owns
//! the records.

use std::collections::VecDeque;

use lob_types::errors::BookError;
use lob_types::ids::OrderId;
use lob_types::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// A price level containing order ids at a specific price
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    /// Queue of order ids at this price level (FIFO order)
    orders: VecDeque<OrderId>,
    /// Total remaining quantity across all orders at this level
    total_quantity: Quantity,
}

/// Read-only view of a level: price, aggregate quantity and order count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub price: Price,
    pub total_quantity: Quantity,
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Append an order at the back of the queue (time priority)
    ///
    /// Nothing is modified if the aggregate would overflow.
    pub fn push_back(&mut self, order_id: OrderId, quantity: Quantity) -> Result<(), BookError> {
        self.total_quantity = self
            .total_quantity
            .checked_add(quantity)
            .ok_or(BookError::QuantityOverflow { price: self.price })?;
        self.orders.push_back(order_id);
        Ok(())
    }

    /// Remove an order and its quantity contribution
    ///
    /// Nothing is modified when the order is absent or when `quantity`
    /// exceeds the level aggregate.
    pub fn remove(&mut self, order_id: OrderId, quantity: Quantity) -> Result<(), BookError> {
        let position = self
            .orders
            .iter()
            .position(|id| *id == order_id)
            .ok_or_else(|| {
                BookError::inconsistent(format!("order {} not queued at {}", order_id, self.price))
            })?;
        let total = self.total_quantity.checked_sub(quantity).ok_or_else(|| {
            BookError::inconsistent(format!(
                "removing {} from level {} holding {}",
                quantity, self.price, self.total_quantity
            ))
        })?;

        self.orders.remove(position);
        self.total_quantity = total;
        Ok(())
    }

    /// Decrease the aggregate after a partial fill of a queued order
    pub fn reduce(&mut self, quantity: Quantity) -> Result<(), BookError> {
        self.total_quantity = self.total_quantity.checked_sub(quantity).ok_or_else(|| {
            BookError::inconsistent(format!(
                "filling {} against level {} holding {}",
                quantity, self.price, self.total_quantity
            ))
        })?;
        Ok(())
    }

    /// Oldest order at this level
    pub fn front(&self) -> Option<OrderId> {
        self.orders.front().copied()
    }

    /// Position of an order in the queue (0 = next to match)
    pub fn position_of(&self, order_id: OrderId) -> Option<usize> {
        self.orders.iter().position(|id| *id == order_id)
    }

    pub(crate) fn order_ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.orders.iter().copied()
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total quantity at this price level
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            price: self.price,
            total_quantity: self.total_quantity,
            order_count: self.orders.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> PriceLevel {
        PriceLevel::new(Price::from_u64(100))
    }

    #[test]
    fn test_price_level_insert() {
        let mut level = level();
        level.push_back(OrderId::new(1), Quantity::new(150)).unwrap();

        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), Quantity::new(150));
        assert!(!level.is_empty());
    }

    #[test]
    fn test_price_level_fifo_order() {
        let mut level = level();
        level.push_back(OrderId::new(1), Quantity::new(10)).unwrap();
        level.push_back(OrderId::new(2), Quantity::new(20)).unwrap();
        level.push_back(OrderId::new(3), Quantity::new(30)).unwrap();

        assert_eq!(level.front(), Some(OrderId::new(1)));
        assert_eq!(level.position_of(OrderId::new(3)), Some(2));
        assert_eq!(level.total_quantity(), Quantity::new(60));
    }

    #[test]
    fn test_price_level_remove_middle() {
        let mut level = level();
        level.push_back(OrderId::new(1), Quantity::new(10)).unwrap();
        level.push_back(OrderId::new(2), Quantity::new(20)).unwrap();
        level.push_back(OrderId::new(3), Quantity::new(30)).unwrap();

        level.remove(OrderId::new(2), Quantity::new(20)).unwrap();
        let queued: Vec<_> = level.order_ids().collect();
        assert_eq!(queued, vec![OrderId::new(1), OrderId::new(3)]);
        assert_eq!(level.total_quantity(), Quantity::new(40));
    }

    #[test]
    fn test_price_level_remove_unknown_is_untouched() {
        let mut level = level();
        level.push_back(OrderId::new(1), Quantity::new(10)).unwrap();

        let err = level.remove(OrderId::new(9), Quantity::new(10)).unwrap_err();
        assert!(matches!(err, BookError::Inconsistent { .. }));
        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), Quantity::new(10));
    }

    #[test]
    fn test_price_level_over_removal_is_untouched() {
        let mut level = level();
        level.push_back(OrderId::new(1), Quantity::new(10)).unwrap();

        assert!(level.remove(OrderId::new(1), Quantity::new(11)).is_err());
        assert_eq!(level.front(), Some(OrderId::new(1)));
        assert!(level.reduce(Quantity::new(11)).is_err());
        assert_eq!(level.total_quantity(), Quantity::new(10));
    }

    #[test]
    fn test_price_level_partial_fill() {
        let mut level = level();
        level.push_back(OrderId::new(1), Quantity::new(50)).unwrap();

        level.reduce(Quantity::new(30)).unwrap();
        assert_eq!(level.total_quantity(), Quantity::new(20));
        assert_eq!(level.order_count(), 1);

        level.remove(OrderId::new(1), Quantity::new(20)).unwrap();
        assert!(level.is_empty());
        assert_eq!(level.total_quantity(), Quantity::zero());
    }

    #[test]
    fn test_price_level_overflow_is_untouched() {
        let mut level = level();
        level.push_back(OrderId::new(1), Quantity::new(u64::MAX - 5)).unwrap();

        let err = level.push_back(OrderId::new(2), Quantity::new(6)).unwrap_err();
        assert_eq!(err, BookError::QuantityOverflow { price: Price::from_u64(100) });
        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), Quantity::new(u64::MAX - 5));

        level.push_back(OrderId::new(3), Quantity::new(5)).unwrap();
        assert_eq!(level.total_quantity(), Quantity::new(u64::MAX));
    }

    #[test]
    fn test_price_level_summary() {
        let mut level = level();
        level.push_back(OrderId::new(1), Quantity::new(15)).unwrap();
        level.push_back(OrderId::new(2), Quantity::new(25)).unwrap();

        let summary = level.summary();
        assert_eq!(summary.price, Price::from_u64(100));
        assert_eq!(summary.total_quantity, Quantity::new(40));
        assert_eq!(summary.order_count, 2);
    }
}
