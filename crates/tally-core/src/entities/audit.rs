use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, EntityType};

/// One row of the audit trail. Appended after every mutation, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: String,
    /// Operator that made the change.
    pub actor: Option<String>,
    pub entity_type: EntityType,
    /// Id of the item, tool, project, transaction or count that changed.
    pub entity_id: String,
    pub action: AuditAction,
    /// Action-specific payload, see `audit_detail`.
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
