use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `tly` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tly",
    version,
    about = "Tally - inventory, tools and projects for the shop"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .tally)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Name recorded on transactions, movements and audit entries
    #[arg(long = "as", global = true, value_name = "NAME")]
    pub actor: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
            actor: self.actor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{CartCommands, ItemCommands, ReconcileCommands, ToolCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "tly",
            "--format",
            "table",
            "--limit",
            "10",
            "--verbose",
            "dashboard",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Dashboard));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["tly", "dashboard", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Dashboard));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["tly", "--format", "xml", "dashboard"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["tly", "--project", "/tmp/shop", "--as", "dana", "dashboard"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/shop"));
        assert_eq!(flags.actor.as_deref(), Some("dana"));
    }

    #[test]
    fn checkout_takes_project_and_cart_lines() {
        let cli = Cli::try_parse_from([
            "tly", "checkout", "--to", "Smith Deck", "PNT-01:3", "TAPE:2", "--notes", "stain day",
        ])
        .expect("cli should parse");

        let Commands::Checkout(args) = cli.command else {
            panic!("expected checkout");
        };
        assert_eq!(args.to, "Smith Deck");
        assert_eq!(args.lines, vec!["PNT-01:3", "TAPE:2"]);
        assert_eq!(args.notes.as_deref(), Some("stain day"));
    }

    #[test]
    fn checkout_requires_at_least_one_line() {
        let parsed = Cli::try_parse_from(["tly", "checkout", "--to", "Smith Deck"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn reorder_collects_overrides() {
        let cli = Cli::try_parse_from([
            "tly", "reorder", "--set", "PNT-01=4", "--set", "TAPE=0", "--csv",
        ])
        .expect("cli should parse");

        let Commands::Reorder(args) = cli.command else {
            panic!("expected reorder");
        };
        assert_eq!(args.overrides, vec!["PNT-01=4", "TAPE=0"]);
        assert!(args.csv);
        assert!(!args.html);
    }

    #[test]
    fn reorder_rejects_csv_and_html_together() {
        let parsed = Cli::try_parse_from(["tly", "reorder", "--csv", "--html"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn item_list_flags_parse() {
        let cli = Cli::try_parse_from([
            "tly", "item", "list", "--search", "paint", "--category", "Finish", "--low-stock",
        ])
        .expect("cli should parse");

        let Commands::Item {
            action:
                ItemCommands::List {
                    search,
                    category,
                    low_stock,
                },
        } = cli.command
        else {
            panic!("expected item list");
        };
        assert_eq!(search.as_deref(), Some("paint"));
        assert_eq!(category.as_deref(), Some("Finish"));
        assert!(low_stock);
    }

    #[test]
    fn tool_move_takes_destination() {
        let cli = Cli::try_parse_from(["tly", "tool", "move", "tol-1a2b", "Smith Deck"])
            .expect("cli should parse");

        let Commands::Tool {
            action: ToolCommands::Move { id, to, notes },
        } = cli.command
        else {
            panic!("expected tool move");
        };
        assert_eq!(id, "tol-1a2b");
        assert_eq!(to, "Smith Deck");
        assert!(notes.is_none());
    }

    #[test]
    fn reconcile_count_collects_counts() {
        let cli = Cli::try_parse_from([
            "tly", "reconcile", "count", "PNT-01=3", "TAPE=12", "--by", "dana",
        ])
        .expect("cli should parse");

        let Commands::Reconcile {
            action: ReconcileCommands::Count { counts, by, notes },
        } = cli.command
        else {
            panic!("expected reconcile count");
        };
        assert_eq!(counts, vec!["PNT-01=3", "TAPE=12"]);
        assert_eq!(by.as_deref(), Some("dana"));
        assert!(notes.is_none());
    }

    #[test]
    fn cart_update_collects_repeated_lines() {
        let cli = Cli::try_parse_from([
            "tly",
            "cart",
            "update",
            "crt-1a2b3c4d",
            "--line",
            "PNT-01:3",
            "--line",
            "TAPE:2",
            "--notes",
            "",
        ])
        .expect("cli should parse");

        let Commands::Cart {
            action: CartCommands::Update { id, to, notes, lines },
        } = cli.command
        else {
            panic!("expected cart update");
        };
        assert_eq!(id, "crt-1a2b3c4d");
        assert!(to.is_none());
        assert_eq!(notes.as_deref(), Some(""));
        assert_eq!(lines, vec!["PNT-01:3", "TAPE:2"]);
    }
}
