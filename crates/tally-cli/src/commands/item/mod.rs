mod categories;
mod create;
mod delete;
mod export;
mod get;
mod list;
mod receive;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ItemCommands;
use crate::context::AppContext;

/// Handle `tly item`.
pub async fn handle(
    action: &ItemCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ItemCommands::Create {
            name,
            sku,
            description,
            stock,
            minimum,
            cost,
            unit,
            supplier,
            category,
        } => {
            let params = create::CreateParams {
                name,
                sku,
                description: description.as_deref(),
                stock: *stock,
                minimum: *minimum,
                cost,
                unit,
                supplier: supplier.as_deref(),
                category: category.as_deref(),
            };
            create::run(&params, ctx, flags).await
        }
        ItemCommands::Get { id } => get::run(id, ctx, flags).await,
        ItemCommands::List {
            search,
            category,
            low_stock,
        } => list::run(search.as_deref(), category.as_deref(), *low_stock, ctx, flags).await,
        ItemCommands::Update {
            id,
            name,
            sku,
            description,
            minimum,
            cost,
            unit,
            supplier,
            category,
        } => {
            let params = update::UpdateParams {
                name: name.as_ref(),
                sku: sku.as_ref(),
                description: description.as_ref(),
                minimum: *minimum,
                cost: cost.as_ref(),
                unit: unit.as_ref(),
                supplier: supplier.as_ref(),
                category: category.as_ref(),
            };
            update::run(id, &params, ctx, flags).await
        }
        ItemCommands::Delete { id } => delete::run(id, ctx, flags).await,
        ItemCommands::Receive { id, qty, notes } => {
            receive::run(id, *qty, notes.as_deref(), ctx, flags).await
        }
        ItemCommands::Categories => categories::run(ctx, flags).await,
        ItemCommands::LowStock => list::run(None, None, true, ctx, flags).await,
        ItemCommands::Export { out } => export::run(out.as_deref(), ctx, flags).await,
    }
}
