use std::path::Path;

use chrono::Utc;
use tally_db::repos::item::ItemFilter;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::export;
use crate::output::output;

/// Write every item, ignoring `--limit`.
pub async fn run(out: Option<&Path>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let items = ctx.service.list_items(&ItemFilter::default()).await?;
    let contents = export::csv::items(&items)?;

    let name = format!("inventory-{}.csv", Utc::now().date_naive());
    let path = export::target_path(out, &ctx.export_dir(), &name);
    let response = export::write_file(&path, &contents, items.len())?;
    output(&response, flags.format)
}
