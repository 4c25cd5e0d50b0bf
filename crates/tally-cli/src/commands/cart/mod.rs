mod update;

use serde::Serialize;
use tally_core::enums::CartKind;
use tally_db::repos::cart::CartFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CartCommands;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse {
    id: String,
    deleted: bool,
}

/// Handle `tly cart`.
pub async fn handle(
    action: &CartCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CartCommands::List { kind, job } => {
            let kind = kind
                .as_deref()
                .map(|raw| parse_enum::<CartKind>(raw, "kind"))
                .transpose()?;
            let project_id = match job.as_deref() {
                Some(raw) => Some(lookup::project(ctx, raw).await?.id),
                None => None,
            };
            let filter = CartFilter {
                kind,
                project_id,
                limit: Some(effective_limit(None, flags.limit, ctx.config.general.default_limit)),
            };
            let carts = ctx.service.list_carts(&filter).await?;
            output(&carts, flags.format)
        }
        CartCommands::Get { id } => {
            let cart = ctx.service.get_cart(id).await?;
            output(&cart, flags.format)
        }
        CartCommands::Update {
            id,
            to,
            notes,
            lines,
        } => update::run(id, to.as_deref(), notes.as_ref(), lines, ctx, flags).await,
        CartCommands::Delete { id } => {
            let actor = resolve_actor(flags, &ctx.config);
            ctx.service.delete_cart(id, &actor).await?;
            output(
                &DeleteResponse {
                    id: id.clone(),
                    deleted: true,
                },
                flags.format,
            )
        }
    }
}
