use tally_db::repos::item::ItemFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    search: Option<&str>,
    category: Option<&str>,
    low_stock_only: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = ItemFilter {
        search: search.map(String::from),
        category: category.map(String::from),
        low_stock_only,
        limit: Some(effective_limit(
            None,
            flags.limit,
            ctx.config.general.default_limit,
        )),
    };
    let items = ctx.service.list_items(&filter).await?;
    output(&items, flags.format)
}
