use tally_core::enums::ToolStatus;
use tally_db::repos::tool::NewTool;

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    sku: Option<&str>,
    description: Option<&str>,
    tool_type: Option<&str>,
    status: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let new = NewTool {
        name: name.to_string(),
        sku: sku.map(String::from),
        description: description.map(String::from),
        tool_type: tool_type.map(String::from),
        status: status
            .map(|value| parse_enum::<ToolStatus>(value, "status"))
            .transpose()?
            .unwrap_or(ToolStatus::Available),
    };

    let actor = resolve_actor(flags, &ctx.config);
    let tool = ctx.service.create_tool(&new, &actor).await?;
    output(&tool, flags.format)
}
