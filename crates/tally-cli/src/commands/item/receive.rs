use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::lookup;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    quantity: i64,
    notes: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let item = lookup::item(ctx, id).await?;
    let actor = resolve_actor(flags, &ctx.config);
    let response = ctx
        .service
        .receive_item(&item.id, quantity, notes, &actor)
        .await?;
    output(&response, flags.format)
}
