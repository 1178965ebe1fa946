//! Matching engine core
//!
//! Coordinates the order store and both price ladders. Incoming orders are
//! matched against the opposite ladder in price-time priority; limit
//! remainders rest on their own side, market remainders are dropped.
//!
//! All operations run to completion and the book invariants hold between
//! calls. Failed operations leave the book unchanged.

use std::sync::Arc;

use lob_types::errors::{BookError, OrderError};
use lob_types::ids::OrderId;
use lob_types::numeric::{Price, Quantity};
use lob_types::order::{Order, OrderStatus, OrderType, Side};
use lob_types::trade::Trade;
use tracing::{debug, info, warn};

use crate::book::{Ladder, LevelSummary};
use crate::clock::{Clock, SystemClock};
use crate::config::{AmendPolicy, EngineConfig};
use crate::events::QuoteRecord;
use crate::matching::{crossing, MatchExecutor};
use crate::snapshot::BookSnapshot;
use crate::store::OrderStore;

/// Single-instrument matching engine
#[derive(Debug)]
pub struct MatchingEngine {
    config: EngineConfig,
    store: OrderStore,
    bids: Ladder,
    asks: Ladder,
    /// Trade executor with sequence generation
    executor: MatchExecutor,
}

impl MatchingEngine {
    /// Create an engine with default configuration and the wall clock
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        info!(
            instrument = %config.instrument,
            amend_policy = ?config.amend_policy,
            starting_trade_sequence = config.starting_trade_sequence,
            "MatchingEngine initialized"
        );

        Self {
            executor: MatchExecutor::new(config.starting_trade_sequence, clock),
            config,
            store: OrderStore::new(),
            bids: Ladder::new(Side::BUY),
            asks: Ladder::new(Side::SELL),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Submit an order and return the trades it produced
    ///
    /// A duplicate id or a malformed order is ignored: no trades, no state
    /// change. Use [`MatchingEngine::try_add_order`] to see the reason.
    pub fn add_order(&mut self, order: Order) -> Vec<Trade> {
        let order_id = order.order_id;
        self.try_add_order(order).unwrap_or_else(|err| {
            warn!(%order_id, error = %err, "Order ignored");
            Vec::new()
        })
    }

    /// Submit an order, surfacing duplicate ids and malformed orders
    pub fn try_add_order(&mut self, mut order: Order) -> Result<Vec<Trade>, BookError> {
        if self.store.contains(order.order_id) {
            return Err(BookError::DuplicateId { order_id: order.order_id });
        }
        order.validate()?;
        if !order.check_invariant() || order.has_fills() {
            return Err(OrderError::InvalidQuantity(order.quantity.to_string()).into());
        }
        // Whatever is left after matching must fit on its own level
        if order.order_type == OrderType::LIMIT {
            self.ladder(order.side)
                .check_capacity(order.price, order.quantity, Quantity::zero())?;
        }

        let now = self.executor.now();
        order.status = OrderStatus::New;
        order.created_at = now;
        order.updated_at = now;

        debug!(
            order_id = %order.order_id,
            side = ?order.side,
            order_type = ?order.order_type,
            price = %order.price,
            quantity = %order.quantity,
            "Order accepted"
        );

        let trades = self.match_incoming(&mut order)?;

        if !order.is_filled() {
            match order.order_type {
                OrderType::LIMIT => self.rest(order)?,
                OrderType::MARKET => {
                    warn!(
                        order_id = %order.order_id,
                        side = ?order.side,
                        dropped = %order.remaining_quantity,
                        "Market order exhausted the book, remainder dropped"
                    );
                }
            }
        }

        Ok(trades)
    }

    /// Cancel a resting order; false if the id is unknown
    pub fn cancel_order(&mut self, order_id: OrderId) -> bool {
        match self.try_cancel_order(order_id) {
            Ok(_) => true,
            Err(err) => {
                warn!(%order_id, error = %err, "Cancel failed");
                false
            }
        }
    }

    /// Cancel a resting order and return its final record
    pub fn try_cancel_order(&mut self, order_id: OrderId) -> Result<Order, BookError> {
        let (side, price, remaining) = self.resting_position(order_id)?;

        self.ladder_mut(side).remove(order_id, price, remaining)?;
        let mut order = self
            .store
            .remove(order_id)
            .ok_or_else(|| {
                BookError::inconsistent(format!("order {} vanished during cancel", order_id))
            })?;
        order.cancel(self.executor.now());

        debug!(%order_id, %price, unfilled = %remaining, "Order cancelled");
        Ok(order)
    }

    /// Amend price and quantity of a resting order; false if unknown or invalid
    ///
    /// The order always loses time priority. Under [`AmendPolicy::Reenter`]
    /// an amendment may trade; use [`MatchingEngine::try_amend_order`] to
    /// receive those trades.
    pub fn amend_order(
        &mut self,
        order_id: OrderId,
        new_price: Price,
        new_quantity: Quantity,
    ) -> bool {
        match self.try_amend_order(order_id, new_price, new_quantity) {
            Ok(trades) => {
                if !trades.is_empty() {
                    debug!(%order_id, trades = trades.len(), "Amendment traded");
                }
                true
            }
            Err(err) => {
                warn!(%order_id, error = %err, "Amend failed");
                false
            }
        }
    }

    /// Amend a resting order and return any trades it produced
    ///
    /// The order leaves its queue entirely and rejoins at the tail of the
    /// level for `new_price` on the same side. With
    /// [`AmendPolicy::Reprice`] it never matches; with
    /// [`AmendPolicy::Reenter`] it first matches like a new limit order.
    pub fn try_amend_order(
        &mut self,
        order_id: OrderId,
        new_price: Price,
        new_quantity: Quantity,
    ) -> Result<Vec<Trade>, BookError> {
        let (side, price, remaining) = self.resting_position(order_id)?;
        if new_quantity.is_zero() {
            return Err(OrderError::InvalidQuantity(new_quantity.to_string()).into());
        }
        if !new_price.is_positive() {
            return Err(OrderError::InvalidPrice(new_price.to_string()).into());
        }
        let filled = self
            .store
            .get(order_id)
            .map_or(Quantity::zero(), |order| order.filled_quantity);
        if filled.checked_add(new_quantity).is_none() {
            return Err(OrderError::InvalidQuantity(new_quantity.to_string()).into());
        }
        let leaving = if new_price == price { remaining } else { Quantity::zero() };
        self.ladder(side).check_capacity(new_price, new_quantity, leaving)?;

        let now = self.executor.now();
        self.ladder_mut(side).remove(order_id, price, remaining)?;

        debug!(
            %order_id,
            old_price = %price,
            %new_price,
            %new_quantity,
            policy = ?self.config.amend_policy,
            "Order amended"
        );

        match self.config.amend_policy {
            AmendPolicy::Reprice => {
                self.store
                    .mutate_price_quantity(order_id, new_price, new_quantity, now)?;
                self.ladder_mut(side).add(order_id, new_price, new_quantity)?;
                Ok(Vec::new())
            }
            AmendPolicy::Reenter => {
                let mut order = self.store.remove(order_id).ok_or_else(|| {
                    BookError::inconsistent(format!("order {} vanished during amend", order_id))
                })?;
                order.amend(new_price, new_quantity, now)?;

                let trades = self.match_incoming(&mut order)?;
                if !order.is_filled() {
                    self.rest(order)?;
                }
                Ok(trades)
            }
        }
    }

    /// Check if an order is resting on the book
    pub fn order_exists(&self, order_id: OrderId) -> bool {
        self.store.contains(order_id)
    }

    /// Get a resting order by id
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.store.get(order_id)
    }

    /// Position of a resting order in its level's queue (0 = next to match)
    pub fn queue_position(&self, order_id: OrderId) -> Option<usize> {
        let order = self.store.get(order_id)?;
        self.ladder(order.side).level(order.price)?.position_of(order_id)
    }

    /// Highest bid price, `None` if there are no bids
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Lowest ask price, `None` if there are no asks
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Get the top `depth` levels per side with spread statistics
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot::capture(self.config.instrument.clone(), &self.bids, &self.asks, depth)
    }

    /// Snapshot at the configured default depth
    pub fn default_snapshot(&self) -> BookSnapshot {
        self.snapshot(self.config.default_depth)
    }

    /// Every level of both sides, in priority order
    pub fn price_levels(&self) -> (Vec<LevelSummary>, Vec<LevelSummary>) {
        (
            self.bids.levels_up_to_depth(usize::MAX),
            self.asks.levels_up_to_depth(usize::MAX),
        )
    }

    /// Current top-of-book quote for downstream publication
    pub fn quote(&self) -> QuoteRecord {
        QuoteRecord {
            instrument: self.config.instrument.clone(),
            bid: self.best_bid(),
            ask: self.best_ask(),
            timestamp_ns: self.executor.now(),
        }
    }

    /// Number of resting orders
    pub fn resting_order_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Verify the book invariants
    ///
    /// Every queued id exists in the store on the same side and price, level
    /// aggregates equal the sum of their orders, no level is empty, levels
    /// are strictly ordered by priority, queues are in arrival order, and
    /// nothing in the store is missing from the ladders.
    pub fn check_invariants(&self) -> Result<(), BookError> {
        let mut queued = 0usize;

        for ladder in [&self.bids, &self.asks] {
            let side = ladder.side();
            let mut previous: Option<Price> = None;

            for level in ladder.levels() {
                let price = level.price();
                if level.is_empty() || level.total_quantity().is_zero() {
                    return Err(BookError::inconsistent(format!(
                        "{:?} level {} is empty",
                        side, price
                    )));
                }
                if let Some(prev) = previous {
                    let ordered = match side {
                        Side::BUY => price < prev,
                        Side::SELL => price > prev,
                    };
                    if !ordered {
                        return Err(BookError::inconsistent(format!(
                            "{:?} level {} out of priority order after {}",
                            side, price, prev
                        )));
                    }
                }
                previous = Some(price);

                let mut sum = Quantity::zero();
                let mut last_sequence: Option<u64> = None;
                for order_id in level.order_ids() {
                    let order = self.store.get(order_id).ok_or_else(|| {
                        BookError::inconsistent(format!(
                            "queued order {} missing from store",
                            order_id
                        ))
                    })?;
                    if order.side != side || order.price != price {
                        return Err(BookError::inconsistent(format!(
                            "order {} queued at {:?} {} but records {:?} {}",
                            order_id, side, price, order.side, order.price
                        )));
                    }
                    if order.remaining_quantity.is_zero() || !order.check_invariant() {
                        return Err(BookError::inconsistent(format!(
                            "order {} has bad quantities",
                            order_id
                        )));
                    }
                    if last_sequence.is_some_and(|last| last >= order.sequence) {
                        return Err(BookError::inconsistent(format!(
                            "order {} queued out of arrival order at {}",
                            order_id, price
                        )));
                    }
                    last_sequence = Some(order.sequence);
                    sum = sum.checked_add(order.remaining_quantity).ok_or_else(|| {
                        BookError::inconsistent(format!("{:?} level {} sum overflows", side, price))
                    })?;
                    queued += 1;
                }

                if sum != level.total_quantity() {
                    return Err(BookError::inconsistent(format!(
                        "{:?} level {} aggregate {} != sum of orders {}",
                        side,
                        price,
                        level.total_quantity(),
                        sum
                    )));
                }
            }
        }

        if queued != self.store.len() {
            return Err(BookError::inconsistent(format!(
                "{} orders queued but {} in store",
                queued,
                self.store.len()
            )));
        }
        Ok(())
    }

    /// Match an incoming order against the opposite ladder
    ///
    /// Walks the best level's queue from the head, one resting order at a
    /// time, until the incoming order is exhausted or the best level no
    /// longer crosses.
    fn match_incoming(&mut self, order: &mut Order) -> Result<Vec<Trade>, BookError> {
        let mut trades = Vec::new();
        let opposite = match order.side {
            Side::BUY => &mut self.asks,
            Side::SELL => &mut self.bids,
        };

        while !order.remaining_quantity.is_zero() {
            let Some(level) = opposite.best() else {
                break;
            };
            let level_price = level.price();
            if !crossing::order_crosses(order, level_price) {
                break;
            }
            let maker_id = level
                .front()
                .ok_or_else(|| BookError::inconsistent(format!("empty level at {}", level_price)))?;
            let maker_remaining = self
                .store
                .get(maker_id)
                .map(|maker| maker.remaining_quantity)
                .ok_or_else(|| {
                    BookError::inconsistent(format!("queued order {} missing from store", maker_id))
                })?;

            let match_qty = order.remaining_quantity.min(maker_remaining);
            let trade = self
                .executor
                .execute_trade(order.order_id, maker_id, order.side, level_price, match_qty);
            order.add_fill(match_qty, trade.executed_at);

            let maker_left = maker_remaining.saturating_sub(match_qty);
            if maker_left.is_zero() {
                opposite.remove(maker_id, level_price, maker_remaining)?;
                self.store.remove(maker_id);
            } else {
                opposite.reduce(level_price, match_qty)?;
                self.store.mutate_quantity(maker_id, maker_left, trade.executed_at);
            }

            debug!(
                sequence = trade.sequence,
                buy_order_id = %trade.buy_order_id,
                sell_order_id = %trade.sell_order_id,
                price = %trade.price,
                quantity = %trade.quantity,
                maker_filled = maker_left.is_zero(),
                "Trade executed"
            );
            trades.push(trade);
        }

        Ok(trades)
    }

    /// Put a limit remainder on its own side of the book
    fn rest(&mut self, mut order: Order) -> Result<(), BookError> {
        order.rest();
        let (order_id, side, price) = (order.order_id, order.side, order.price);
        let quantity = order.remaining_quantity;

        self.ladder(side).check_capacity(price, quantity, Quantity::zero())?;
        self.store.insert(order)?;
        self.ladder_mut(side).add(order_id, price, quantity)?;

        debug!(%order_id, side = ?side, %price, %quantity, "Order resting");
        Ok(())
    }

    fn resting_position(&self, order_id: OrderId) -> Result<(Side, Price, Quantity), BookError> {
        self.store
            .get(order_id)
            .map(|order| (order.side, order.price, order.remaining_quantity))
            .ok_or(BookError::NotFound { order_id })
    }

    fn ladder(&self, side: Side) -> &Ladder {
        match side {
            Side::BUY => &self.bids,
            Side::SELL => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut Ladder {
        match side {
            Side::BUY => &mut self.bids,
            Side::SELL => &mut self.asks,
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
