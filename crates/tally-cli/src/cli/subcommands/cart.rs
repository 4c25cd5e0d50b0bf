use clap::Subcommand;

/// Cart subcommands. A cart is one `tly checkout` or `tly receive`.
#[derive(Clone, Debug, Subcommand)]
pub enum CartCommands {
    /// List carts, newest first
    List {
        /// checkout or receive
        #[arg(long = "kind")]
        kind: Option<String>,

        /// Project id or name
        #[arg(long = "job")]
        job: Option<String>,
    },
    /// A cart with its lines and total
    Get { id: String },
    /// Move a checkout to another project, change notes, or replace the lines
    Update {
        id: String,

        /// Active project id or name (checkout carts only)
        #[arg(long)]
        to: Option<String>,

        /// Pass an empty string to clear
        #[arg(long)]
        notes: Option<String>,

        /// Replacement lines as ITEM:QTY; stock moves by the difference
        #[arg(long = "line", value_name = "ITEM:QTY")]
        lines: Vec<String>,
    },
    /// Delete a cart and reverse every line
    Delete { id: String },
}
