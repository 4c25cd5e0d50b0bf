use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CartKind;

/// Header for one checkout or delivery. Its lines are the ledger rows that
/// carry this cart's id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Cart {
    pub id: String,
    pub kind: CartKind,
    /// Only checkout carts have a project.
    pub project_id: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
