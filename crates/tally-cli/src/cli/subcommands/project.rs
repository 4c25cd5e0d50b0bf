use clap::Subcommand;

/// Project subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// Create an active project
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,
    },
    /// Project detail: tools on site, movements and expenses
    Get { id: String },
    /// List projects, newest first
    List {
        /// active, completed or archived
        #[arg(long)]
        status: Option<String>,
    },
    /// Update project fields. Pass an empty string to clear an optional field.
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,
    },
    /// Delete a project. Its ledger rows are kept without the link.
    Delete { id: String },
    /// Move a project to another status
    Status {
        id: String,

        /// active, completed or archived
        status: String,
    },
    /// Checkout lines charged to the project
    Expenses { id: String },
    /// Number of projects per status
    Counts,
}
