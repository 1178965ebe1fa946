//! Crossing detection logic
//!
//! Determines when an incoming order may trade against a resting level.

use lob_types::numeric::Price;
use lob_types::order::{Order, OrderType, Side};

/// Check if a bid and ask can match at given prices
///
/// For a buy order to match with a sell order the buy price must be
/// >= the sell price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming limit price crosses a resting level price
pub fn incoming_can_match(
    incoming_side: Side,
    incoming_price: Price,
    resting_price: Price,
) -> bool {
    match incoming_side {
        Side::BUY => can_match(incoming_price, resting_price),
        Side::SELL => can_match(resting_price, incoming_price),
    }
}

/// Check if `order` may trade against the opposite level at `resting_price`
///
/// Market orders cross every level.
pub fn order_crosses(order: &Order, resting_price: Price) -> bool {
    match order.order_type {
        OrderType::MARKET => true,
        OrderType::LIMIT => incoming_can_match(order.side, order.price, resting_price),
    }
}
