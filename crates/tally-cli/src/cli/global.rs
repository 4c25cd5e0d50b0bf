use clap::ValueEnum;

/// How command results are printed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Aligned columns, money right-aligned
    Table,
    /// Single-line JSON
    Raw,
}

/// Flags shared by every subcommand, copied out of [`super::Cli`].
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub limit: Option<u32>,
    pub quiet: bool,
    pub verbose: bool,
    /// Directory holding `.tally/`, or the `.tally/` directory itself.
    pub project: Option<String>,
    /// Overrides the configured operator on ledger rows and audit entries.
    pub actor: Option<String>,
}

impl GlobalFlags {
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.format == OutputFormat::Table
    }
}
