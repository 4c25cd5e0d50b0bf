use std::path::PathBuf;

use clap::{Args, Subcommand};

use super::subcommands::{
    CartCommands, ItemCommands, PricingCommands, ProjectCommands, ReconcileCommands,
    ReportCommands, ToolCommands, TxnCommands,
};

/// Top-level command tree for `tly`.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create a .tally directory and database in the current (or --project) directory
    Init(InitArgs),
    /// Consumable inventory items
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },
    /// Check a cart of items out to an active project
    Checkout(CheckoutArgs),
    /// Receive a supplier order into stock
    Receive(ReceiveArgs),
    /// Past checkouts and deliveries, edited or reversed as whole orders
    Cart {
        #[command(subcommand)]
        action: CartCommands,
    },
    /// Build the reorder sheet for low-stock items
    Reorder(ReorderArgs),
    /// Usage and expense reports over a date range
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Physical counts that correct stored stock
    Reconcile {
        #[command(subcommand)]
        action: ReconcileCommands,
    },
    /// Tools and their locations
    Tool {
        #[command(subcommand)]
        action: ToolCommands,
    },
    /// Job projects
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// The inventory transaction ledger
    Txn {
        #[command(subcommand)]
        action: TxnCommands,
    },
    /// Markup and retail price calculations
    Pricing {
        #[command(subcommand)]
        action: PricingCommands,
    },
    /// Headline counts
    Dashboard,
    /// Query the audit trail
    Audit(AuditArgs),
    /// Print the JSON Schema for a response type
    Schema(SchemaArgs),
    /// Pull remote changes into the embedded replica
    Sync,
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Default operator name written to .tally/config.toml
    #[arg(long)]
    pub operator: Option<String>,

    /// Location name tools return to
    #[arg(long)]
    pub shop_location: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct CheckoutArgs {
    /// Active project id or name receiving the items
    #[arg(long)]
    pub to: String,

    /// Cart lines as ITEM:QTY, where ITEM is an item id or SKU
    #[arg(required = true, value_name = "ITEM:QTY")]
    pub lines: Vec<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ReceiveArgs {
    /// Order lines as ITEM:QTY or ITEM:QTY@COST
    #[arg(required = true, value_name = "ITEM:QTY[@COST]")]
    pub lines: Vec<String>,

    /// Supplier reference or other notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ReorderArgs {
    /// Restock target as a multiple of minimum stock (defaults to config)
    #[arg(long)]
    pub multiplier: Option<i64>,

    /// Override a recommended quantity as ITEM=QTY
    #[arg(long = "set", value_name = "ITEM=QTY")]
    pub overrides: Vec<String>,

    /// Group lines by supplier
    #[arg(long)]
    pub by_supplier: bool,

    /// Write the sheet as CSV
    #[arg(long, conflicts_with = "html")]
    pub csv: bool,

    /// Write the sheet as printable HTML
    #[arg(long)]
    pub html: bool,

    /// Output file (defaults to the export directory)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,

    #[arg(long)]
    pub entity_id: Option<String>,

    #[arg(long)]
    pub action: Option<String>,

    /// Only entries recorded by this actor
    #[arg(long)]
    pub by: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name, e.g. item, tool, project, reorder-sheet
    pub type_name: String,
}
