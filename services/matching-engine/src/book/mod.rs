//! Order book infrastructure module
//!
//! Contains price levels and the per-side price ladder.

pub mod price_level;
pub mod ladder;

pub use price_level::{LevelSummary, PriceLevel};
pub use ladder::Ladder;
