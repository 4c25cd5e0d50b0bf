use crate::cli::{Commands, GlobalFlags};
use crate::commands;
use crate::context::AppContext;

/// Route a parsed command to its handler.
///
/// `init`, `schema` and `pricing` run before a project context exists and
/// are handled in `main`.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Item { action } => commands::item::handle(&action, ctx, flags).await,
        Commands::Checkout(args) => commands::checkout::run(&args, ctx, flags).await,
        Commands::Receive(args) => commands::receive::run(&args, ctx, flags).await,
        Commands::Cart { action } => commands::cart::handle(&action, ctx, flags).await,
        Commands::Reorder(args) => commands::reorder::run(&args, ctx, flags).await,
        Commands::Report { action } => commands::report::handle(&action, ctx, flags).await,
        Commands::Reconcile { action } => commands::reconcile::handle(&action, ctx, flags).await,
        Commands::Tool { action } => commands::tool::handle(&action, ctx, flags).await,
        Commands::Project { action } => commands::project::handle(&action, ctx, flags).await,
        Commands::Txn { action } => commands::txn::handle(&action, ctx, flags).await,
        Commands::Dashboard => commands::dashboard::run(ctx, flags).await,
        Commands::Audit(args) => commands::audit::run(&args, ctx, flags).await,
        Commands::Sync => commands::sync::run(ctx, flags).await,
        Commands::Init(_) | Commands::Schema(_) | Commands::Pricing { .. } => {
            unreachable!("handled before AppContext initialization")
        }
    }
}
