use clap::Subcommand;

/// Tool subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ToolCommands {
    /// Register a tool at the shop
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        sku: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "type")]
        tool_type: Option<String>,

        /// available, in-use or maintenance
        #[arg(long)]
        status: Option<String>,
    },
    /// Get a tool by id
    Get { id: String },
    /// List tools by name
    List {
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long = "type")]
        tool_type: Option<String>,
    },
    /// Update tool fields. Pass an empty string to clear an optional field.
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        sku: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "type")]
        tool_type: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a tool and its movement history
    Delete { id: String },
    /// Move a tool to the shop or a project location
    Move {
        id: String,

        /// Destination location
        to: String,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Movement history, newest first
    History { id: String },
    /// Locations a tool can be moved to
    Locations,
}
