use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct LocationsResponse<'a> {
    shop: &'a str,
    locations: Vec<String>,
}

/// Handle `tly tool move`.
pub async fn move_tool(
    id: &str,
    to: &str,
    notes: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = resolve_actor(flags, &ctx.config);
    let response = ctx.service.move_tool(id, to, notes, &actor).await?;
    output(&response, flags.format)
}

/// Handle `tly tool history`.
pub async fn history(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let movements = ctx.service.tool_history(id).await?;
    output(&movements, flags.format)
}

/// Handle `tly tool locations`.
pub async fn locations(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let locations = ctx.service.location_options().await?;
    output(
        &LocationsResponse {
            shop: ctx.service.shop_location(),
            locations,
        },
        flags.format,
    )
}
