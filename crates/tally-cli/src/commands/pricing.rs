use tally_core::pricing::{markup_percentage, retail_price, round_money};
use tally_core::responses::PricingResponse;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PricingCommands;
use crate::commands::shared::parse::parse_money;
use crate::output::output;

/// Handle `tly pricing`.
pub fn handle(action: &PricingCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = compute(action)?;
    output(&response, flags.format)
}

fn compute(action: &PricingCommands) -> anyhow::Result<PricingResponse> {
    match action {
        PricingCommands::Retail { cost, markup } => {
            let cost = parse_money(cost, "cost")?;
            let markup = parse_money(markup, "markup")?;
            Ok(PricingResponse {
                cost,
                retail: round_money(retail_price(cost, markup)),
                markup_percentage: markup,
            })
        }
        PricingCommands::Markup { cost, retail } => {
            let cost = parse_money(cost, "cost")?;
            let retail = parse_money(retail, "retail")?;
            Ok(PricingResponse {
                cost,
                retail,
                markup_percentage: round_money(markup_percentage(cost, retail)?),
            })
        }
    }
}
