//! Repository modules implementing operations for all Tally entities.
//!
//! Each module adds methods to `TallyService` via `impl TallyService` blocks.

pub mod audit;
pub mod cart;
pub mod checkout;
pub mod item;
pub mod project;
pub mod receive;
pub mod reconcile;
pub mod report;
pub mod tool;
pub mod transaction;
