use clap::Subcommand;

/// Transaction ledger subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum TxnCommands {
    /// List ledger rows, newest first
    List {
        /// Item id or SKU
        #[arg(long)]
        item: Option<String>,

        /// Project id or name
        #[arg(long = "job")]
        job: Option<String>,

        /// Only lines of this cart
        #[arg(long)]
        cart: Option<String>,

        /// checkout, restock, receive, withdraw or adjustment
        #[arg(long = "type")]
        kind: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
    },
    /// Get a ledger row by id
    Get { id: String },
    /// Delete a ledger row and reverse its stock effect
    Void { id: String },
}
