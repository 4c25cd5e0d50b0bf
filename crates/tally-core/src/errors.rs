//! Domain errors shared by every tally crate. Storage and config errors wrap
//! these in their own crates; the CLI folds everything into `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{entity_type} '{id}' not found")]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} '{id}' cannot move from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// A checkout or void would take stock below zero.
    #[error("not enough stock for {item}: requested {requested}, on hand {available}")]
    InsufficientStock {
        item: String,
        requested: i64,
        available: i64,
    },

    /// Bad input: empty carts, non-positive quantities, duplicate SKUs.
    #[error("{0}")]
    Validation(String),
}
