use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::InventoryItem;

/// Headline counts shown by `tly dashboard`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_items: u64,
    pub low_stock_items: u64,
    pub total_tools: u64,
    pub active_projects: u64,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(items: &[InventoryItem], total_tools: u64, active_projects: u64) -> Self {
        Self {
            total_items: items.len() as u64,
            low_stock_items: items.iter().filter(|i| i.is_low_stock()).count() as u64,
            total_tools,
            active_projects,
        }
    }
}
