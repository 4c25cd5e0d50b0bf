use chrono::{NaiveDate, Utc};
use tally_core::enums::TransactionType;
use tally_core::reports::DateRange;
use tally_db::repos::transaction::TransactionFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TxnCommands;
use crate::commands::shared::actor::resolve_actor;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::{parse_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

const DEFAULT_LEDGER_LIMIT: u32 = 100;

/// Handle `tly txn`.
pub async fn handle(
    action: &TxnCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TxnCommands::List {
            item,
            job,
            cart,
            kind,
            from,
            to,
        } => {
            let item_id = match item.as_deref() {
                Some(raw) => Some(lookup::item(ctx, raw).await?.id),
                None => None,
            };
            let project_id = match job.as_deref() {
                Some(raw) => Some(lookup::project(ctx, raw).await?.id),
                None => None,
            };
            let transaction_type = kind
                .as_deref()
                .map(|raw| parse_enum::<TransactionType>(raw, "type"))
                .transpose()?;
            let range = ledger_range(
                from.as_deref(),
                to.as_deref(),
                Utc::now().date_naive(),
            )?;

            let filter = TransactionFilter {
                item_id,
                project_id,
                cart_id: cart.clone(),
                transaction_type,
                range,
                limit: Some(effective_limit(None, flags.limit, DEFAULT_LEDGER_LIMIT)),
            };
            let transactions = ctx.service.list_transactions(&filter).await?;
            output(&transactions, flags.format)
        }
        TxnCommands::Get { id } => {
            let transaction = ctx.service.get_transaction(id).await?;
            output(&transaction, flags.format)
        }
        TxnCommands::Void { id } => {
            let actor = resolve_actor(flags, &ctx.config);
            let voided = ctx.service.void_transaction(id, &actor).await?;
            output(&voided, flags.format)
        }
    }
}

/// No range unless one bound is given. An open start reaches back to the
/// epoch; an open end stops at `today`.
fn ledger_range(
    from: Option<&str>,
    to: Option<&str>,
    today: NaiveDate,
) -> anyhow::Result<Option<DateRange>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let start = from
        .map(|raw| parse_date(raw, "--from"))
        .transpose()?
        .unwrap_or_default();
    let end = to
        .map(|raw| parse_date(raw, "--to"))
        .transpose()?
        .unwrap_or(today);
    Ok(Some(DateRange::new(start, end)?))
}
