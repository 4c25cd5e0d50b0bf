use crate::cli::GlobalFlags;
use crate::commands::shared::lookup;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let item = lookup::item(ctx, id).await?;
    output(&item, flags.format)
}
