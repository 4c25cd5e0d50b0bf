use anyhow::Context;
use tally_core::entities::{InventoryItem, Project};

use crate::context::AppContext;

/// Resolve an item id or SKU typed on the command line.
pub async fn item(ctx: &AppContext, id_or_sku: &str) -> anyhow::Result<InventoryItem> {
    ctx.service
        .resolve_item(id_or_sku)
        .await
        .with_context(|| format!("unknown item '{id_or_sku}'"))
}

/// Resolve a project id or exact name typed on the command line.
pub async fn project(ctx: &AppContext, id_or_name: &str) -> anyhow::Result<Project> {
    ctx.service
        .resolve_project(id_or_name)
        .await
        .with_context(|| format!("unknown project '{id_or_name}'"))
}

/// Resolve the item column of parsed `(item, qty)` lines to item ids.
pub async fn item_lines(
    ctx: &AppContext,
    lines: Vec<(String, i64)>,
) -> anyhow::Result<Vec<(String, i64)>> {
    let mut resolved = Vec::with_capacity(lines.len());
    for (raw, qty) in lines {
        resolved.push((item(ctx, &raw).await?.id, qty));
    }
    Ok(resolved)
}
