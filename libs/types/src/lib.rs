//! Types library for the limit order book
//!
//! This library provides the core type definitions shared by the matching
//! engine and anything that consumes its output.
//!
//! # Modules
//! - `ids`: Identifiers (OrderId, TradeId, InstrumentId)
//! - `numeric`: Fixed-point decimal price and unsigned quantity
//! - `order`: Order lifecycle types
//! - `trade`: Trade execution types
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::errors::*;
}
