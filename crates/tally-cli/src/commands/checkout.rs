use crate::cli::GlobalFlags;
use crate::cli::root_commands::CheckoutArgs;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::parse_cart_line;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tly checkout`.
pub async fn run(args: &CheckoutArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let parsed = args
        .lines
        .iter()
        .map(String::as_str)
        .map(parse_cart_line)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let lines = lookup::item_lines(ctx, parsed).await?;
    let project = lookup::project(ctx, &args.to).await?;

    let actor = resolve_actor(flags, &ctx.config);
    let response = ctx
        .service
        .checkout(&project.id, &lines, args.notes.as_deref(), &actor)
        .await?;
    output(&response, flags.format)
}
