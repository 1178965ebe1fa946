//! Depth-limited, read-only projection of the book
//!
//! Built from the ladders' level summaries; never exposes queue contents
//! and never mutates the book.

use lob_types::ids::InstrumentId;
use lob_types::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::book::{Ladder, LevelSummary};

/// Top `depth` levels of each side plus top-of-book statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub instrument: InstrumentId,
    pub depth: usize,
    /// Bid levels, best (highest) first
    pub bids: Vec<LevelSummary>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<LevelSummary>,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    /// best_ask - best_bid, when both sides are non-empty
    pub spread: Option<Decimal>,
    /// spread / best_bid × 100, when both sides are non-empty
    pub spread_percent: Option<Decimal>,
    /// Largest level quantity over the whole bid side, not just the window
    pub max_bid_quantity: Quantity,
    /// Largest level quantity over the whole ask side, not just the window
    pub max_ask_quantity: Quantity,
}

impl BookSnapshot {
    pub fn capture(instrument: InstrumentId, bids: &Ladder, asks: &Ladder, depth: usize) -> Self {
        let best_bid = bids.best_price();
        let best_ask = asks.best_price();

        let (spread, spread_percent) = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => {
                let spread = ask.as_decimal() - bid.as_decimal();
                let percent = spread
                    .checked_div(bid.as_decimal())
                    .map(|ratio| ratio * Decimal::ONE_HUNDRED);
                (Some(spread), percent)
            }
            _ => (None, None),
        };

        Self {
            instrument,
            depth,
            bids: bids.levels_up_to_depth(depth),
            asks: asks.levels_up_to_depth(depth),
            best_bid,
            best_ask,
            spread,
            spread_percent,
            max_bid_quantity: bids.max_level_quantity(),
            max_ask_quantity: asks.max_level_quantity(),
        }
    }

    /// Midpoint of best bid and best ask
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some((bid.as_decimal() + ask.as_decimal()) / Decimal::TWO),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Level quantity as a fraction of the side maximum, in [0, 1]
pub fn depth_ratio(level: &LevelSummary, side_max: Quantity) -> Decimal {
    if side_max.is_zero() {
        return Decimal::ZERO;
    }
    level.total_quantity.as_decimal() / side_max.as_decimal()
}
