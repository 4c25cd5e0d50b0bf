use clap::Subcommand;

/// Reconciliation subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReconcileCommands {
    /// Stored against derived quantity for every item
    Sheet,
    /// Record a physical count as ITEM=QTY lines
    Count {
        #[arg(required = true, value_name = "ITEM=QTY")]
        counts: Vec<String>,

        /// Who counted (defaults to the acting operator)
        #[arg(long)]
        by: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// List counts, newest first
    List,
    /// A count with its lines and summary
    Get { id: String },
    /// Change who counted, the notes, or replace the counted lines
    Update {
        id: String,

        #[arg(long)]
        by: Option<String>,

        /// Pass an empty string to clear
        #[arg(long)]
        notes: Option<String>,

        /// Replacement count lines as ITEM=QTY
        #[arg(long = "count", value_name = "ITEM=QTY")]
        counts: Vec<String>,
    },
    /// Delete a count and re-derive stock for its items
    Delete { id: String },
}
