//! Stock derivation from the transaction ledger.
//!
//! The latest physical count is the baseline; ledger entries recorded after
//! that count are replayed on top of it. Without a count, the whole ledger is
//! replayed from zero.

use chrono::{DateTime, Utc};

use crate::enums::TransactionType;

/// One ledger entry, as needed for replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockEvent {
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Derive the quantity on hand.
///
/// `latest_count` is the most recent `(counted_at, counted_quantity)` for the
/// item, if any. Adjustment entries are never replayed: they mirror counts.
#[must_use]
pub fn derive_quantity(events: &[StockEvent], latest_count: Option<(DateTime<Utc>, i64)>) -> i64 {
    let (baseline, since) = match latest_count {
        Some((at, qty)) => (qty, Some(at)),
        None => (0, None),
    };

    events
        .iter()
        .filter(|e| since.is_none_or(|at| e.created_at > at))
        .filter_map(|e| e.transaction_type.stock_sign().map(|sign| sign * e.quantity))
        .fold(baseline, |acc, delta| acc + delta)
}
