use tally_core::enums::ToolStatus;
use tally_db::updates::tool::{ToolUpdate, ToolUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::parse::{nullable, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub struct UpdateParams<'a> {
    pub name: Option<&'a str>,
    pub sku: Option<&'a String>,
    pub description: Option<&'a String>,
    pub tool_type: Option<&'a String>,
    pub status: Option<&'a str>,
}

fn build_update(params: &UpdateParams<'_>) -> anyhow::Result<ToolUpdate> {
    let mut builder = ToolUpdateBuilder::new();
    if let Some(name) = params.name {
        builder = builder.name(name);
    }
    if let Some(sku) = nullable(params.sku) {
        builder = builder.sku(sku);
    }
    if let Some(description) = nullable(params.description) {
        builder = builder.description(description);
    }
    if let Some(tool_type) = nullable(params.tool_type) {
        builder = builder.tool_type(tool_type);
    }
    if let Some(status) = params.status {
        builder = builder.status(parse_enum::<ToolStatus>(status, "status")?);
    }
    Ok(builder.build())
}

pub async fn run(
    id: &str,
    params: &UpdateParams<'_>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let update = build_update(params)?;
    if update.is_empty() {
        anyhow::bail!("nothing to update: pass at least one field flag");
    }

    let actor = resolve_actor(flags, &ctx.config);
    let tool = ctx.service.update_tool(id, update, &actor).await?;
    output(&tool, flags.format)
}
