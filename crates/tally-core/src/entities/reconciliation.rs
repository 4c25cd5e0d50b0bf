use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A physical count session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Reconciliation {
    pub id: String,
    pub reconciled_by: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The counted quantity of one item within a reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReconciliationLine {
    pub reconciliation_id: String,
    pub item_id: String,
    pub item_name: String,
    pub recorded_quantity: i64,
    pub counted_quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl ReconciliationLine {
    /// Counted minus recorded.
    #[must_use]
    pub const fn difference(&self) -> i64 {
        self.counted_quantity - self.recorded_quantity
    }
}
