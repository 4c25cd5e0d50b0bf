use std::path::PathBuf;

use clap::Subcommand;

/// Item subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ItemCommands {
    /// Create an item. Opening stock is logged as a receipt.
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        sku: String,

        #[arg(long)]
        description: Option<String>,

        /// Opening stock
        #[arg(long, default_value_t = 0)]
        stock: i64,

        /// Reorder threshold
        #[arg(long, default_value_t = 0)]
        minimum: i64,

        /// Unit cost, e.g. 32.50
        #[arg(long, default_value = "0")]
        cost: String,

        #[arg(long, default_value = "each")]
        unit: String,

        #[arg(long)]
        supplier: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },
    /// Get an item by id or SKU
    Get { id: String },
    /// List items by name
    List {
        /// Case-insensitive match on name, SKU or description
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Only items at or below their minimum
        #[arg(long)]
        low_stock: bool,
    },
    /// Update item fields. Pass an empty string to clear an optional field.
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        sku: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        minimum: Option<i64>,

        #[arg(long)]
        cost: Option<String>,

        #[arg(long)]
        unit: Option<String>,

        #[arg(long)]
        supplier: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },
    /// Delete an item
    Delete { id: String },
    /// Receive stock for a single item at its current cost
    Receive {
        id: String,

        #[arg(long)]
        qty: i64,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Distinct item categories
    Categories,
    /// Items at or below their minimum stock
    LowStock,
    /// Write the item list as CSV
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
