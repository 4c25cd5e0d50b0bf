mod create;
mod update;

use serde::Serialize;
use tally_core::enums::ProjectStatus;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse {
    id: String,
    name: String,
    deleted: bool,
}

/// Handle `tly project`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::Create {
            name,
            description,
            start,
            end,
        } => {
            create::run(
                name,
                description.as_deref(),
                start.as_deref(),
                end.as_deref(),
                ctx,
                flags,
            )
            .await
        }
        ProjectCommands::Get { id } => {
            let project = lookup::project(ctx, id).await?;
            let detail = ctx.service.project_detail(&project.id).await?;
            output(&detail, flags.format)
        }
        ProjectCommands::List { status } => {
            let status = status
                .as_deref()
                .map(|value| parse_enum::<ProjectStatus>(value, "status"))
                .transpose()?;
            let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);
            let projects = ctx.service.list_projects(status, Some(limit)).await?;
            output(&projects, flags.format)
        }
        ProjectCommands::Update {
            id,
            name,
            description,
            start,
            end,
        } => {
            let params = update::UpdateParams {
                name: name.as_deref(),
                description: description.as_ref(),
                start: start.as_ref(),
                end: end.as_ref(),
            };
            update::run(id, &params, ctx, flags).await
        }
        ProjectCommands::Delete { id } => {
            let project = lookup::project(ctx, id).await?;
            let actor = resolve_actor(flags, &ctx.config);
            ctx.service.delete_project(&project.id, &actor).await?;
            output(
                &DeleteResponse {
                    id: project.id,
                    name: project.name,
                    deleted: true,
                },
                flags.format,
            )
        }
        ProjectCommands::Status { id, status } => {
            let next = parse_enum::<ProjectStatus>(status, "status")?;
            let project = lookup::project(ctx, id).await?;
            let actor = resolve_actor(flags, &ctx.config);
            let project = ctx
                .service
                .transition_project(&project.id, next, &actor)
                .await?;
            output(&project, flags.format)
        }
        ProjectCommands::Expenses { id } => {
            let project = lookup::project(ctx, id).await?;
            let expenses = ctx.service.project_expenses(&project.id).await?;
            output(&expenses, flags.format)
        }
        ProjectCommands::Counts => {
            let counts = ctx.service.project_status_counts().await?;
            output(&counts, flags.format)
        }
    }
}
