use tally_db::repos::receive::ReceiveLine;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReceiveArgs;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::parse_receive_line;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tly receive`.
pub async fn run(args: &ReceiveArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut lines = Vec::with_capacity(args.lines.len());
    for raw in &args.lines {
        let (item, quantity, unit_cost) = parse_receive_line(raw)?;
        let item = lookup::item(ctx, &item).await?;
        lines.push(ReceiveLine::new(item.id, quantity, unit_cost));
    }

    let actor = resolve_actor(flags, &ctx.config);
    let response = ctx
        .service
        .receive(&lines, args.notes.as_deref(), &actor)
        .await?;
    output(&response, flags.format)
}
