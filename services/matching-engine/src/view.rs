//! Text rendering of snapshots and trades
//!
//! Asks are printed worst to best so the two sides meet at the spread.

use std::fmt::Write;

use lob_types::numeric::Quantity;
use lob_types::trade::Trade;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::book::LevelSummary;
use crate::snapshot::{depth_ratio, BookSnapshot};

/// Width of the depth bar for a level holding the side maximum
pub const BAR_WIDTH: usize = 30;

const RULE: &str = "------------------------------------------------------------------------";
const HEADER: &str = "   PRICE       QUANTITY      ORDERS     DEPTH %           DEPTH CHART";

/// Render the depth chart for a snapshot
pub fn render_book(snapshot: &BookSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n======================== ORDER BOOK {} (Depth: {}) ========================",
        snapshot.instrument, snapshot.depth
    );

    let _ = writeln!(
        out,
        "\n------------------------------ ASKS (SELL) ------------------------------"
    );
    let _ = writeln!(out, "{HEADER}\n{RULE}");
    if snapshot.asks.is_empty() {
        let _ = writeln!(out, "                        No asks in the book");
    }
    for level in snapshot.asks.iter().rev() {
        write_level(&mut out, level, snapshot.max_ask_quantity);
    }

    let top = (snapshot.best_bid, snapshot.best_ask, snapshot.spread);
    if let (Some(bid), Some(ask), Some(spread)) = top {
        let percent = snapshot.spread_percent.unwrap_or_default();
        let _ = writeln!(
            out,
            "\n--------------------------- SPREAD INFORMATION ---------------------------"
        );
        let _ = writeln!(
            out,
            "  Best Bid: {:>10.2}  Best Ask: {:>10.2}  Spread: {:>8.2} ({:.2}%)",
            to_display(bid.as_decimal()),
            to_display(ask.as_decimal()),
            to_display(spread),
            to_display(percent)
        );
        let _ = writeln!(out, "{RULE}");
    }

    let _ = writeln!(
        out,
        "\n------------------------------- BIDS (BUY) -------------------------------"
    );
    let _ = writeln!(out, "{HEADER}\n{RULE}");
    if snapshot.bids.is_empty() {
        let _ = writeln!(out, "                        No bids in the book");
    }
    for level in &snapshot.bids {
        write_level(&mut out, level, snapshot.max_bid_quantity);
    }

    out
}

/// Render a trade banner; empty input renders nothing
pub fn render_trades(trades: &[Trade]) -> String {
    let mut out = String::new();
    if trades.is_empty() {
        return out;
    }

    let _ = writeln!(out, "*************** TRADES EXECUTED ***************");
    for trade in trades {
        let _ = writeln!(
            out,
            "* BUY: {:>6} SELL: {:>6} PRICE: {:>8.2} QTY: {:>6} *",
            trade.buy_order_id,
            trade.sell_order_id,
            to_display(trade.price.as_decimal()),
            trade.quantity
        );
    }
    let _ = writeln!(out, "***********************************************");
    out
}

/// Number of bar characters for a level, truncated like the depth percent
pub fn bar_length(level: &LevelSummary, side_max: Quantity) -> usize {
    (depth_ratio(level, side_max) * Decimal::from(BAR_WIDTH))
        .trunc()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH)
}

fn to_display(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn write_level(out: &mut String, level: &LevelSummary, side_max: Quantity) {
    let percent = depth_ratio(level, side_max) * Decimal::ONE_HUNDRED;
    let bars = bar_length(level, side_max);
    let _ = writeln!(
        out,
        "  {:>8.2}    {:>10}      {:>4}      {:>5.1}%      {}{}",
        to_display(level.price.as_decimal()),
        level.total_quantity,
        level.order_count,
        to_display(percent),
        "|".repeat(bars),
        " ".repeat(BAR_WIDTH - bars)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MatchingEngine;
    use lob_types::numeric::Price;
    use lob_types::order::{Order, Side};
    use std::str::FromStr;

    fn px(s: &str) -> Price {
        Price::from_str(s).unwrap()
    }

    fn book() -> MatchingEngine {
        let mut engine = MatchingEngine::new();
        engine.add_order(Order::limit(1, Side::BUY, px("100.0"), 1000));
        engine.add_order(Order::limit(2, Side::BUY, px("99.9"), 250));
        engine.add_order(Order::limit(3, Side::SELL, px("100.1"), 200));
        engine.add_order(Order::limit(4, Side::SELL, px("100.2"), 450));
        engine
    }

    #[test]
    fn test_bar_length_scales_to_side_max() {
        let full = LevelSummary {
            price: px("1"),
            total_quantity: Quantity::new(1000),
            order_count: 1,
        };
        let quarter = LevelSummary {
            total_quantity: Quantity::new(250),
            ..full
        };

        assert_eq!(bar_length(&full, Quantity::new(1000)), BAR_WIDTH);
        assert_eq!(bar_length(&quarter, Quantity::new(1000)), 7);
        assert_eq!(bar_length(&quarter, Quantity::zero()), 0);
    }

    #[test]
    fn test_render_book_orders_sides_around_spread() {
        let text = render_book(&book().snapshot(10));

        let worst_ask = text.find("100.20").unwrap();
        let best_ask = text.find("100.10").unwrap();
        let spread = text.find("SPREAD INFORMATION").unwrap();
        let best_bid = text.find("100.00").unwrap();
        let second_bid = text.find("99.90").unwrap();

        assert!(worst_ask < best_ask);
        assert!(best_ask < spread);
        assert!(spread < best_bid);
        assert!(best_bid < second_bid);
        assert!(text.contains("100.0%"));
        assert!(text.contains("Spread:     0.10"));
    }

    #[test]
    fn test_render_empty_book() {
        let text = render_book(&MatchingEngine::new().snapshot(5));
        assert!(text.contains("No asks in the book"));
        assert!(text.contains("No bids in the book"));
        assert!(!text.contains("SPREAD INFORMATION"));
    }

    #[test]
    fn test_render_trades() {
        let mut engine = book();
        let trades = engine.add_order(Order::market(5, Side::BUY, 300));

        let text = render_trades(&trades);
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("* BUY:      5 SELL:      3 PRICE:   100.10 QTY:    200 *"));
        assert!(render_trades(&[]).is_empty());
    }
}
