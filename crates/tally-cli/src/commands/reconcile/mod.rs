mod update;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReconcileCommands;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::parse_count_line;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse {
    id: String,
    deleted: bool,
}

/// Handle `tly reconcile`.
pub async fn handle(
    action: &ReconcileCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ReconcileCommands::Sheet => {
            let sheet = ctx.service.reconciliation_sheet().await?;
            output(&sheet, flags.format)
        }
        ReconcileCommands::Count { counts, by, notes } => {
            let parsed = counts
                .iter()
                .map(String::as_str)
                .map(parse_count_line)
                .collect::<anyhow::Result<Vec<_>>>()?;
            let counts = lookup::item_lines(ctx, parsed).await?;
            let counted_by = by
                .clone()
                .unwrap_or_else(|| resolve_actor(flags, &ctx.config));

            let detail = ctx
                .service
                .reconcile(&counts, &counted_by, notes.as_deref())
                .await?;
            output(&detail, flags.format)
        }
        ReconcileCommands::List => {
            let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);
            let reconciliations = ctx.service.list_reconciliations(Some(limit)).await?;
            output(&reconciliations, flags.format)
        }
        ReconcileCommands::Get { id } => {
            let detail = ctx.service.get_reconciliation(id).await?;
            output(&detail, flags.format)
        }
        ReconcileCommands::Update {
            id,
            by,
            notes,
            counts,
        } => update::run(id, by.as_deref(), notes.as_ref(), counts, ctx, flags).await,
        ReconcileCommands::Delete { id } => {
            let actor = resolve_actor(flags, &ctx.config);
            ctx.service.delete_reconciliation(id, &actor).await?;
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
