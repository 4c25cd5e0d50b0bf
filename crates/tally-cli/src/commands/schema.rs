use schemars::{Schema, schema_for};
use tally_core::entities::{
    AuditEntry, InventoryItem, InventoryTransaction, Project, Reconciliation, Tool, ToolMovement,
};
use tally_core::reports::{DashboardStats, ReorderSheet, UsageReport};
use tally_core::responses::{
    CartResponse, PricingResponse, ProjectDetail, ProjectExpensesResponse, ProjectStatusCounts,
    ReconcileSheetRow, ReconciliationDetail, ToolMoveResponse,
};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

const TYPE_NAMES: &[&str] = &[
    "item",
    "tool",
    "project",
    "transaction",
    "movement",
    "reconciliation",
    "audit-entry",
    "cart",
    "tool-move",
    "project-detail",
    "project-expenses",
    "project-counts",
    "reconcile-sheet-row",
    "reconciliation-detail",
    "pricing",
    "reorder-sheet",
    "usage-report",
    "dashboard",
];

/// Handle `tly schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = lookup(&args.type_name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown schema type '{}'; expected one of: {}",
            args.type_name,
            TYPE_NAMES.join(", ")
        )
    })?;
    output(&schema, flags.format)
}

fn lookup(type_name: &str) -> Option<Schema> {
    let schema = match type_name.replace('_', "-").as_str() {
        "item" => schema_for!(InventoryItem),
        "tool" => schema_for!(Tool),
        "project" => schema_for!(Project),
        "transaction" => schema_for!(InventoryTransaction),
        "movement" => schema_for!(ToolMovement),
        "reconciliation" => schema_for!(Reconciliation),
        "audit-entry" => schema_for!(AuditEntry),
        "cart" => schema_for!(CartResponse),
        "tool-move" => schema_for!(ToolMoveResponse),
        "project-detail" => schema_for!(ProjectDetail),
        "project-expenses" => schema_for!(ProjectExpensesResponse),
        "project-counts" => schema_for!(ProjectStatusCounts),
        "reconcile-sheet-row" => schema_for!(ReconcileSheetRow),
        "reconciliation-detail" => schema_for!(ReconciliationDetail),
        "pricing" => schema_for!(PricingResponse),
        "reorder-sheet" => schema_for!(ReorderSheet),
        "usage-report" => schema_for!(UsageReport),
        "dashboard" => schema_for!(DashboardStats),
        _ => return None,
    };
    Some(schema)
}
