use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Inclusive date range shared by the report commands.
#[derive(Clone, Debug, Args)]
pub struct RangeArgs {
    /// First day, YYYY-MM-DD (defaults to the first of the month three months back)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub to: Option<String>,
}

/// Report subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// All three usage reports
    Usage {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Items ranked by checkout cost
    MostUsed {
        #[command(flatten)]
        range: RangeArgs,

        /// Rows to keep (defaults to config)
        #[arg(long)]
        top: Option<usize>,

        #[arg(long)]
        csv: bool,

        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Spend per project
    ProjectExpenses {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(long)]
        csv: bool,

        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Spend per calendar month
    Monthly {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(long)]
        csv: bool,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}
