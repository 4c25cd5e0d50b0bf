use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ToolStatus;

/// A durable tool tracked by location (the shop or a project site).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub tool_type: Option<String>,
    pub location: String,
    pub status: ToolStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tool {
    /// Case-insensitive substring match over name, SKU and description.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        let contains = |s: Option<&str>| s.is_some_and(|s| s.to_lowercase().contains(&term));
        self.name.to_lowercase().contains(&term)
            || contains(self.sku.as_deref())
            || contains(self.description.as_deref())
    }
}
