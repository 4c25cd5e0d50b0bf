use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TransactionType;

/// A ledger row recording stock leaving or entering the shop.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InventoryTransaction {
    pub id: String,
    pub item_id: String,
    pub project_id: Option<String>,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub notes: Option<String>,
    /// Set on `adjustment` rows written by a reconciliation.
    pub reconciliation_id: Option<String>,
    /// Set on rows written by `tly checkout` or `tly receive`.
    pub cart_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}
