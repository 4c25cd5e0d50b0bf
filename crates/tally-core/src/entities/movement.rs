use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::MovementType;

/// One relocation of a tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ToolMovement {
    pub id: String,
    pub tool_id: String,
    pub project_id: Option<String>,
    pub from_location: String,
    pub to_location: String,
    pub movement_type: MovementType,
    pub notes: Option<String>,
    pub moved_by: String,
    pub moved_at: DateTime<Utc>,
}
