mod create;
mod list;
mod movement;
mod update;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ToolCommands;
use crate::commands::shared::actor::resolve_actor;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse {
    id: String,
    deleted: bool,
}

/// Handle `tly tool`.
pub async fn handle(
    action: &ToolCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ToolCommands::Create {
            name,
            sku,
            description,
            tool_type,
            status,
        } => {
            create::run(
                name,
                sku.as_deref(),
                description.as_deref(),
                tool_type.as_deref(),
                status.as_deref(),
                ctx,
                flags,
            )
            .await
        }
        ToolCommands::Get { id } => {
            let tool = ctx.service.get_tool(id).await?;
            output(&tool, flags.format)
        }
        ToolCommands::List {
            search,
            location,
            status,
            tool_type,
        } => {
            let filter = list::ToolListArgs {
                search: search.as_deref(),
                location: location.as_deref(),
                status: status.as_deref(),
                tool_type: tool_type.as_deref(),
            };
            list::run(&filter, ctx, flags).await
        }
        ToolCommands::Update {
            id,
            name,
            sku,
            description,
            tool_type,
            status,
        } => {
            let params = update::UpdateParams {
                name: name.as_deref(),
                sku: sku.as_ref(),
                description: description.as_ref(),
                tool_type: tool_type.as_ref(),
                status: status.as_deref(),
            };
            update::run(id, &params, ctx, flags).await
        }
        ToolCommands::Delete { id } => {
            let actor = resolve_actor(flags, &ctx.config);
            ctx.service.delete_tool(id, &actor).await?;
            output(
                &DeleteResponse {
                    id: id.clone(),
                    deleted: true,
                },
                flags.format,
            )
        }
        ToolCommands::Move { id, to, notes } => {
            movement::move_tool(id, to, notes.as_deref(), ctx, flags).await
        }
        ToolCommands::History { id } => movement::history(id, ctx, flags).await,
        ToolCommands::Locations => movement::locations(ctx, flags).await,
    }
}
