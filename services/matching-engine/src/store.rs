//! Authoritative record of every resting order, keyed by order id
//!
//! The store owns the `Order` records; price levels only hold ids. Keeping
//! the ladders consistent with the store is the engine's job.

use std::collections::HashMap;

use lob_types::errors::BookError;
use lob_types::ids::OrderId;
use lob_types::numeric::{Price, Quantity};
use lob_types::order::Order;

/// Order records plus the arrival sequence used for time priority
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: HashMap<OrderId, Order>,
    next_sequence: u64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an order, stamping its arrival sequence
    pub fn insert(&mut self, mut order: Order) -> Result<(), BookError> {
        if self.orders.contains_key(&order.order_id) {
            return Err(BookError::DuplicateId { order_id: order.order_id });
        }
        order.sequence = self.advance_sequence();
        self.orders.insert(order.order_id, order);
        Ok(())
    }

    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Delete a record; absent ids are a no-op
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        self.orders.remove(&order_id)
    }

    /// Set the remaining quantity of an order after a partial fill
    ///
    /// The difference is recorded as filled quantity. Returns false if the
    /// id is unknown.
    pub fn mutate_quantity(
        &mut self,
        order_id: OrderId,
        new_quantity: Quantity,
        timestamp: i64,
    ) -> bool {
        match self.orders.get_mut(&order_id) {
            Some(order) => {
                let filled = order.remaining_quantity.saturating_sub(new_quantity);
                order.add_fill(filled, timestamp);
                true
            }
            None => false,
        }
    }

    /// Replace price and quantity, resetting time priority
    ///
    /// Fails with `NotFound` for an unknown id, or with an order error if
    /// the amended total does not fit; the record is unchanged either way.
    pub fn mutate_price_quantity(
        &mut self,
        order_id: OrderId,
        price: Price,
        quantity: Quantity,
        timestamp: i64,
    ) -> Result<(), BookError> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(BookError::NotFound { order_id })?;
        order.amend(price, quantity, timestamp)?;
        order.sequence = self.next_sequence;
        self.next_sequence += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    fn advance_sequence(&mut self) -> u64 {
        let seq = self.next_sequence;
        self.next_sequence += 1;
        seq
    }
}
