//! Error types for the order book
//!
//! Error taxonomy using thiserror. None of these are fatal: every failure
//! is reported to the caller and leaves the book unchanged.

use thiserror::Error;

use crate::ids::OrderId;
use crate::numeric::Price;

/// Book-level error returned by the engine's explicit (`try_*`) surface
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookError {
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Duplicate order id: {order_id}")]
    DuplicateId { order_id: OrderId },

    #[error("Order not found: {order_id}")]
    NotFound { order_id: OrderId },

    /// Resting the order would push a level aggregate past `u64::MAX`
    #[error("Level quantity overflow at {price}")]
    QuantityOverflow { price: Price },

    #[error("Book inconsistency: {reason}")]
    Inconsistent { reason: String },

    #[error("Engine lock poisoned")]
    LockPoisoned,
}

impl BookError {
    pub fn inconsistent(reason: impl Into<String>) -> Self {
        BookError::Inconsistent { reason: reason.into() }
    }
}

/// Structural validation errors for a single order
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}
