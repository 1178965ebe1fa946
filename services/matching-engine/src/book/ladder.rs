//! One side of the order book
//!
//! Price levels are kept in a BTreeMap for deterministic iteration and
//! walked in matching priority: bids from the highest price down, asks from
//! the lowest price up. Levels are never reordered by size and the ladder
//! never holds an empty level.

use std::collections::BTreeMap;

use lob_types::errors::BookError;
use lob_types::ids::OrderId;
use lob_types::numeric::{Price, Quantity};
use lob_types::order::Side;
use tracing::error;

use super::price_level::{LevelSummary, PriceLevel};

/// Price ladder for a single side
#[derive(Debug, Clone)]
pub struct Ladder {
    side: Side,
    /// BTreeMap iterates ascending; bids are read back to front
    levels: BTreeMap<Price, PriceLevel>,
}

impl Ladder {
    /// Create a new empty ladder for `side`
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Append an order to the tail of the level at `price`
    ///
    /// The level is created if this is the first order at that price.
    pub fn add(
        &mut self,
        order_id: OrderId,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), BookError> {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(order_id, quantity)
    }

    /// Check that `quantity` can join the level at `price`
    ///
    /// `leaving` is quantity that will be removed from that level first,
    /// such as an order being amended in place.
    pub fn check_capacity(
        &self,
        price: Price,
        quantity: Quantity,
        leaving: Quantity,
    ) -> Result<(), BookError> {
        let held = self
            .levels
            .get(&price)
            .map_or(Quantity::zero(), PriceLevel::total_quantity);
        held.saturating_sub(leaving)
            .checked_add(quantity)
            .map(|_| ())
            .ok_or(BookError::QuantityOverflow { price })
    }

    /// Remove an order and its `quantity` from the level at `price`
    ///
    /// The level is deleted once it holds no orders. A removal that would
    /// empty the queue without zeroing the aggregate, or the reverse, is
    /// refused and leaves the level as it was.
    pub fn remove(
        &mut self,
        order_id: OrderId,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), BookError> {
        let side = self.side;
        let level = self.levels.get_mut(&price).ok_or_else(|| {
            BookError::inconsistent(format!(
                "no {:?} level at {} for order {}",
                side, price, order_id
            ))
        })?;

        if level.position_of(order_id).is_some() {
            let drains = level.order_count() == 1;
            let zeroes = level.total_quantity() == quantity;
            if drains != zeroes {
                error!(
                    side = ?side,
                    %price,
                    %order_id,
                    drains,
                    zeroes,
                    "Level queue and aggregate diverged"
                );
                return Err(BookError::inconsistent(format!(
                    "{:?} level {} queue/aggregate mismatch",
                    side, price
                )));
            }
        }
        level.remove(order_id, quantity)?;

        if level.is_empty() {
            self.levels.remove(&price);
        }
        Ok(())
    }

    /// Account for a partial fill of an order queued at `price`
    pub fn reduce(&mut self, price: Price, quantity: Quantity) -> Result<(), BookError> {
        let side = self.side;
        self.levels
            .get_mut(&price)
            .ok_or_else(|| BookError::inconsistent(format!("no {:?} level at {}", side, price)))?
            .reduce(quantity)
    }

    /// Get the highest-priority level
    pub fn best(&self) -> Option<&PriceLevel> {
        let entry = match self.side {
            Side::BUY => self.levels.last_key_value(),
            Side::SELL => self.levels.first_key_value(),
        };
        entry.map(|(_, level)| level)
    }

    /// Get the best price (highest bid / lowest ask)
    pub fn best_price(&self) -> Option<Price> {
        self.best().map(PriceLevel::price)
    }

    /// Get the level at an exact price
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Iterate levels in priority order
    pub fn levels(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::BUY => Box::new(self.levels.values().rev()),
            Side::SELL => Box::new(self.levels.values()),
        }
    }

    /// Get the first `depth` levels in priority order
    pub fn levels_up_to_depth(&self, depth: usize) -> Vec<LevelSummary> {
        self.levels().take(depth).map(PriceLevel::summary).collect()
    }

    /// Largest aggregate quantity of any level on this side
    pub fn max_level_quantity(&self) -> Quantity {
        self.levels
            .values()
            .map(PriceLevel::total_quantity)
            .max()
            .unwrap_or_default()
    }

    /// Check if the ladder is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Get the total number of queued orders across all levels
    pub fn order_count(&self) -> usize {
        self.levels.values().map(PriceLevel::order_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn px(s: &str) -> Price {
        Price::from_str(s).unwrap()
    }

    fn bids() -> Ladder {
        let mut book = Ladder::new(Side::BUY);
        book.add(OrderId::new(1), px("100.0"), Quantity::new(100)).unwrap();
        book.add(OrderId::new(2), px("101.0"), Quantity::new(200)).unwrap();
        book.add(OrderId::new(3), px("99.0"), Quantity::new(150)).unwrap();
        book
    }

    #[test]
    fn test_bid_ladder_best_is_highest() {
        let book = bids();

        let best = book.best().unwrap();
        assert_eq!(best.price(), px("101.0"));
        assert_eq!(best.total_quantity(), Quantity::new(200));
    }

    #[test]
    fn test_ask_ladder_best_is_lowest() {
        let mut book = Ladder::new(Side::SELL);
        book.add(OrderId::new(1), px("100.5"), Quantity::new(100)).unwrap();
        book.add(OrderId::new(2), px("100.1"), Quantity::new(100)).unwrap();
        book.add(OrderId::new(3), px("101.0"), Quantity::new(100)).unwrap();

        assert_eq!(book.best_price(), Some(px("100.1")));
    }

    #[test]
    fn test_empty_ladder() {
        let book = Ladder::new(Side::SELL);
        assert!(book.best().is_none());
        assert!(book.levels_up_to_depth(5).is_empty());
        assert_eq!(book.max_level_quantity(), Quantity::zero());
    }

    #[test]
    fn test_depth_in_priority_order() {
        let book = bids();

        let depth = book.levels_up_to_depth(2);
        assert_eq!(depth.len(), 2);
        assert_eq!(depth[0].price, px("101.0"));
        assert_eq!(depth[1].price, px("100.0"));
    }

    #[test]
    fn test_same_price_shares_level() {
        let mut book = Ladder::new(Side::BUY);
        book.add(OrderId::new(1), px("100"), Quantity::new(100)).unwrap();
        book.add(OrderId::new(2), px("100.00"), Quantity::new(200)).unwrap();

        assert_eq!(book.level_count(), 1);
        let level = book.best().unwrap();
        assert_eq!(level.total_quantity(), Quantity::new(300));
        assert_eq!(level.order_count(), 2);
        assert_eq!(level.front(), Some(OrderId::new(1)));
    }

    #[test]
    fn test_remove_deletes_empty_level() {
        let mut book = bids();

        book.remove(OrderId::new(2), px("101.0"), Quantity::new(200)).unwrap();
        assert_eq!(book.level_count(), 2);
        assert_eq!(book.best_price(), Some(px("100.0")));
    }

    #[test]
    fn test_remove_from_missing_level() {
        let mut book = bids();

        let err = book.remove(OrderId::new(1), px("98.0"), Quantity::new(100)).unwrap_err();
        assert!(matches!(err, BookError::Inconsistent { .. }));
        assert_eq!(book.order_count(), 3);
    }

    #[test]
    fn test_remove_refuses_diverging_aggregate() {
        let mut book = bids();

        // Last order at 101.0 holds 200; removing only 150 would strand 50
        let err = book.remove(OrderId::new(2), px("101.0"), Quantity::new(150)).unwrap_err();
        assert!(matches!(err, BookError::Inconsistent { .. }));
        let level = book.level(px("101.0")).unwrap();
        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), Quantity::new(200));

        book.add(OrderId::new(4), px("100.0"), Quantity::new(50)).unwrap();
        // Zeroing the aggregate while order 4 is still queued
        let err = book.remove(OrderId::new(1), px("100.0"), Quantity::new(150)).unwrap_err();
        assert!(matches!(err, BookError::Inconsistent { .. }));
        assert_eq!(book.level(px("100.0")).unwrap().order_count(), 2);
        assert_eq!(book.order_count(), 4);
    }

    #[test]
    fn test_add_overflow_leaves_ladder_unchanged() {
        let mut book = Ladder::new(Side::SELL);
        book.add(OrderId::new(1), px("100"), Quantity::new(u64::MAX / 2 + 1)).unwrap();

        let err = book
            .add(OrderId::new(2), px("100"), Quantity::new(u64::MAX / 2 + 1))
            .unwrap_err();
        assert_eq!(err, BookError::QuantityOverflow { price: px("100") });
        assert_eq!(book.order_count(), 1);
        let resting = Quantity::new(u64::MAX / 2 + 1);
        let all = Quantity::new(u64::MAX);
        assert!(book.check_capacity(px("100"), all, resting).is_ok());
        assert!(book.check_capacity(px("100"), all, Quantity::zero()).is_err());
        assert!(book.check_capacity(px("101"), all, Quantity::zero()).is_ok());
    }

    #[test]
    fn test_reduce_keeps_level() {
        let mut book = bids();

        book.reduce(px("101.0"), Quantity::new(50)).unwrap();
        assert_eq!(book.best().unwrap().total_quantity(), Quantity::new(150));
        assert_eq!(book.max_level_quantity(), Quantity::new(150));
    }
}
