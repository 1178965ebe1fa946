//! Trade execution logic
//!
//! Stamps each fill with a monotone sequence number and a timestamp.

use std::sync::Arc;

use lob_types::ids::OrderId;
use lob_types::numeric::{Price, Quantity};
use lob_types::order::Side;
use lob_types::trade::Trade;

use crate::clock::Clock;

/// Match executor for handling trade generation
pub struct MatchExecutor {
    sequence_counter: u64,
    clock: Arc<dyn Clock>,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            sequence_counter: starting_sequence,
            clock,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Current time from the engine clock
    pub fn now(&self) -> i64 {
        self.clock.now_nanos()
    }

    /// Sequence number the next trade will carry
    pub fn peek_sequence(&self) -> u64 {
        self.sequence_counter
    }

    /// Execute a trade between an incoming and a resting order
    ///
    /// `price` is the resting order's price.
    pub fn execute_trade(
        &mut self,
        taker_order_id: OrderId,
        maker_order_id: OrderId,
        taker_side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Trade {
        let sequence = self.next_sequence();
        Trade::new(
            sequence,
            taker_order_id,
            maker_order_id,
            taker_side,
            price,
            quantity,
            self.clock.now_nanos(),
        )
    }
}

impl std::fmt::Debug for MatchExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchExecutor")
            .field("sequence_counter", &self.sequence_counter)
            .finish_non_exhaustive()
    }
}
