//! Derived reports computed in memory over fetched rows.
//!
//! The database layer loads rows, these modules aggregate them. Keeping the
//! arithmetic here lets it be tested without a database.

pub mod dashboard;
pub mod reorder;
pub mod stock;
pub mod usage;

pub use dashboard::DashboardStats;
pub use reorder::{ReorderLine, ReorderSheet};
pub use stock::{StockEvent, derive_quantity};
pub use usage::{DateRange, ItemUsage, MonthlyUsage, ProjectExpense, UsageRecord, UsageReport};
