//! Trade execution types

use crate::ids::{OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One matching event between an incoming and a resting order
///
/// The execution price is always the resting (maker) order's price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub sequence: u64, // Engine-wide monotonic sequence

    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,

    /// Side of the incoming (taker) order
    pub aggressor_side: Side,
    pub price: Price,
    pub quantity: Quantity,

    pub executed_at: i64, // Unix nanos
}

impl Trade {
    /// Create a trade from the taker's point of view
    pub fn new(
        sequence: u64,
        taker_order_id: OrderId,
        maker_order_id: OrderId,
        aggressor_side: Side,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Self {
        let (buy_order_id, sell_order_id) = match aggressor_side {
            Side::BUY => (taker_order_id, maker_order_id),
            Side::SELL => (maker_order_id, taker_order_id),
        };

        Self {
            trade_id: TradeId::new(),
            sequence,
            buy_order_id,
            sell_order_id,
            aggressor_side,
            price,
            quantity,
            executed_at,
        }
    }

    pub fn taker_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::BUY => self.buy_order_id,
            Side::SELL => self.sell_order_id,
        }
    }

    pub fn maker_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::BUY => self.sell_order_id,
            Side::SELL => self.buy_order_id,
        }
    }

    /// Calculate trade value (price × quantity)
    pub fn notional(&self) -> Decimal {
        self.price.as_decimal() * self.quantity.as_decimal()
    }
}
