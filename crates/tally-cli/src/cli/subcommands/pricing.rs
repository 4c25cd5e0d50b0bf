use clap::Subcommand;

/// Pricing calculations. These never touch the database.
#[derive(Clone, Debug, Subcommand)]
pub enum PricingCommands {
    /// Retail price from a cost and a markup percentage
    Retail {
        #[arg(long)]
        cost: String,

        #[arg(long)]
        markup: String,
    },
    /// Markup percentage from a cost and a retail price
    Markup {
        #[arg(long)]
        cost: String,

        #[arg(long)]
        retail: String,
    },
}
