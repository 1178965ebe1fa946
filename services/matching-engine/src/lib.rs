//! Limit Order Book Matching Engine
//!
//! Single-instrument order book implementing price-time priority matching.
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced
//! - Deterministic matching (same inputs → same outputs)
//! - Execution at the resting order's price
//! - Level aggregates equal the sum of their resting orders
//! - No empty price levels

pub mod book;
pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod matching;
pub mod shared;
pub mod snapshot;
pub mod store;
pub mod view;

pub use config::{AmendPolicy, EngineConfig};
pub use engine::MatchingEngine;
pub use shared::SharedEngine;
pub use snapshot::BookSnapshot;
