//! Thread-safe handle to a matching engine
//!
//! A single add may touch both ladders and any number of resting orders,
//! so the whole engine is one critical section. Anything published from
//! the returned trades should happen after the lock is released.

use std::sync::{Arc, Mutex};

use lob_types::errors::BookError;
use lob_types::ids::OrderId;
use lob_types::numeric::{Price, Quantity};
use lob_types::order::Order;
use lob_types::trade::Trade;

use crate::engine::MatchingEngine;
use crate::snapshot::BookSnapshot;

/// Cloneable handle; all clones share one engine
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<MatchingEngine>>,
}

impl SharedEngine {
    pub fn new(engine: MatchingEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<R>(&self, f: impl FnOnce(&mut MatchingEngine) -> R) -> Result<R, BookError> {
        let mut engine = self.inner.lock().map_err(|_| BookError::LockPoisoned)?;
        Ok(f(&mut engine))
    }

    /// Submit an order; duplicates and malformed orders are errors here
    pub fn try_add_order(&self, order: Order) -> Result<Vec<Trade>, BookError> {
        self.with(|engine| engine.try_add_order(order))?
    }

    pub fn try_cancel_order(&self, order_id: OrderId) -> Result<Order, BookError> {
        self.with(|engine| engine.try_cancel_order(order_id))?
    }

    pub fn try_amend_order(
        &self,
        order_id: OrderId,
        price: Price,
        quantity: Quantity,
    ) -> Result<Vec<Trade>, BookError> {
        self.with(|engine| engine.try_amend_order(order_id, price, quantity))?
    }

    pub fn snapshot(&self, depth: usize) -> Result<BookSnapshot, BookError> {
        self.with(|engine| engine.snapshot(depth))
    }
}
