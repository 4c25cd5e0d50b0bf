use tally_core::reports::{ReorderLine, ReorderSheet};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReorderArgs;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::parse_count_line;
use crate::context::AppContext;
use crate::export;
use crate::output::output;

#[derive(Debug, serde::Serialize)]
struct SupplierGroup<'a> {
    supplier: String,
    lines: Vec<&'a ReorderLine>,
}

/// Handle `tly reorder`.
pub async fn run(args: &ReorderArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let multiplier = args
        .multiplier
        .unwrap_or(ctx.config.reorder.target_multiplier);
    let mut sheet = ctx.service.reorder_sheet(multiplier).await?;
    apply_overrides(&mut sheet, &args.overrides, ctx).await?;

    if args.csv || args.html {
        let (ext, contents) = if args.csv {
            ("csv", export::csv::reorder_sheet(&sheet)?)
        } else {
            ("html", export::print::reorder_sheet(&sheet))
        };
        let name = export::reorder_file_name(sheet.generated_at.date_naive(), ext);
        let path = export::target_path(args.out.as_deref(), &ctx.export_dir(), &name);
        let response = export::write_file(&path, &contents, sheet.lines.len())?;
        return output(&response, flags.format);
    }

    if args.by_supplier {
        let groups = sheet
            .by_supplier()
            .into_iter()
            .map(|(supplier, lines)| SupplierGroup { supplier, lines })
            .collect::<Vec<_>>();
        return output(&groups, flags.format);
    }

    output(&sheet, flags.format)
}

async fn apply_overrides(
    sheet: &mut ReorderSheet,
    overrides: &[String],
    ctx: &AppContext,
) -> anyhow::Result<()> {
    for raw in overrides {
        let (item, quantity) = parse_count_line(raw)?;
        let item = lookup::item(ctx, &item).await?;
        if !sheet.override_quantity(&item.id, quantity) {
            anyhow::bail!("{} ({}) is not on the reorder sheet", item.name, item.sku);
        }
    }
    Ok(())
}
