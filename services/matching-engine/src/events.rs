//! Records published to downstream market-data consumers
//!
//! The engine does not transport these; it only produces them.

use serde::{Deserialize, Serialize};
use lob_types::ids::{InstrumentId, OrderId, TradeId};
use lob_types::numeric::{Price, Quantity};
use lob_types::order::{Order, Side};
use lob_types::trade::Trade;

/// Top-of-book quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub instrument: InstrumentId,
    pub bid: Option<Price>,
    pub ask: Option<Price>,
    pub timestamp_ns: i64,
}

/// Trade executed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExecutedEvent {
    pub trade_id: TradeId,
    pub sequence: u64,
    pub instrument: InstrumentId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub aggressor_side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub executed_at: i64,
}

impl TradeExecutedEvent {
    pub fn new(instrument: InstrumentId, trade: &Trade) -> Self {
        Self {
            trade_id: trade.trade_id,
            sequence: trade.sequence,
            instrument,
            buy_order_id: trade.buy_order_id,
            sell_order_id: trade.sell_order_id,
            aggressor_side: trade.aggressor_side,
            price: trade.price,
            quantity: trade.quantity,
            executed_at: trade.executed_at,
        }
    }
}

/// Order canceled event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCanceledEvent {
    pub instrument: InstrumentId,
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    pub filled_quantity: Quantity,
    pub unfilled_quantity: Quantity,
    pub canceled_at: i64,
}

impl OrderCanceledEvent {
    pub fn new(instrument: InstrumentId, order: &Order) -> Self {
        Self {
            instrument,
            order_id: order.order_id,
            side: order.side,
            price: order.price,
            filled_quantity: order.filled_quantity,
            unfilled_quantity: order.remaining_quantity,
            canceled_at: order.updated_at,
        }
    }
}
