use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::lookup;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse {
    id: String,
    sku: String,
    deleted: bool,
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let item = lookup::item(ctx, id).await?;
    let actor = resolve_actor(flags, &ctx.config);
    ctx.service.delete_item(&item.id, &actor).await?;
    output(
        &DeleteResponse {
            id: item.id,
            sku: item.sku,
            deleted: true,
        },
        flags.format,
    )
}
