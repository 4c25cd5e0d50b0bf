//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::StockChanged` and `AuditAction::Reconciled` on items.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StockChangedDetail {
    pub from: i64,
    pub to: i64,
    /// Transaction or reconciliation that caused the change.
    pub source_id: Option<String>,
}

/// Detail for `AuditAction::Moved`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MovedDetail {
    pub from_location: String,
    pub to_location: String,
    pub movement_id: String,
}
