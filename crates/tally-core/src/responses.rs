//! CLI response types returned as JSON by `tly` commands.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    Cart, InventoryItem, InventoryTransaction, Project, Reconciliation, ReconciliationLine, Tool,
    ToolMovement,
};
use crate::enums::ProjectStatus;

/// Response from `tly checkout`, `tly receive` and `tly cart get|update`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CartResponse {
    pub cart: Cart,
    pub transactions: Vec<InventoryTransaction>,
    pub total_cost: Decimal,
}

/// Response from `tly item receive`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ItemReceiveResponse {
    pub item: InventoryItem,
    pub transaction: InventoryTransaction,
}

/// Response from `tly tool move`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ToolMoveResponse {
    pub tool: Tool,
    pub movement: ToolMovement,
}

/// One checkout line shown on a project's expense list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectExpenseLine {
    pub transaction_id: String,
    pub item_name: String,
    pub item_sku: String,
    pub quantity: i64,
    pub total_cost: Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Response from `tly project expenses`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectExpensesResponse {
    pub project_id: String,
    pub lines: Vec<ProjectExpenseLine>,
    pub total_cost: Decimal,
}

/// Response from `tly project get`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectDetail {
    pub project: Project,
    pub current_tools: Vec<Tool>,
    pub tool_movements: Vec<ToolMovement>,
    pub expenses: ProjectExpensesResponse,
}

/// Response from `tly project counts`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct ProjectStatusCounts {
    pub all: u64,
    pub active: u64,
    pub completed: u64,
    pub archived: u64,
}

impl ProjectStatusCounts {
    pub fn add(&mut self, status: ProjectStatus) {
        self.all += 1;
        match status {
            ProjectStatus::Active => self.active += 1,
            ProjectStatus::Completed => self.completed += 1,
            ProjectStatus::Archived => self.archived += 1,
        }
    }
}

/// One row of `tly reconcile sheet`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReconcileSheetRow {
    pub item_id: String,
    pub name: String,
    pub stored_quantity: i64,
    pub derived_quantity: i64,
}

/// Response from `tly reconcile get` and `tly reconcile count`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReconciliationDetail {
    pub reconciliation: Reconciliation,
    pub lines: Vec<ReconciliationLine>,
    pub summary: String,
}

impl ReconciliationDetail {
    /// Build the detail with a `"name: recorded → counted, ..."` summary.
    #[must_use]
    pub fn new(reconciliation: Reconciliation, lines: Vec<ReconciliationLine>) -> Self {
        let summary = lines
            .iter()
            .map(|l| format!("{}: {} → {}", l.item_name, l.recorded_quantity, l.counted_quantity))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            reconciliation,
            lines,
            summary,
        }
    }
}

/// Response from `tly pricing`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PricingResponse {
    pub cost: Decimal,
    pub retail: Decimal,
    pub markup_percentage: Decimal,
}
