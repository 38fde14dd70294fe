//! Command-line interface for libris.
//!
//! This module provides the CLI structure and output rendering for the
//! `libris` binary.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    AddCommand, ClearField, ConfigCommand, DeleteCommand, EditCommand, GroupByArg, ListCommand,
    OutputFormat, RecommendCommand, ShowCommand, StatusCommand,
};

/// libris - Keep track of the books you own and what to read next
///
/// A catalog of books with a grouped listing and a recommendation drawn from
/// your best-rated older books.
#[derive(Debug, Parser)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List books, grouped
    List(ListCommand),

    /// Show one book
    Show(ShowCommand),

    /// Add a book
    Add(AddCommand),

    /// Edit a book
    Edit(EditCommand),

    /// Delete a book
    Delete(DeleteCommand),

    /// Show the recommended book
    Recommend(RecommendCommand),

    /// Show catalog and database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "libris");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["libris", "list"]).unwrap();
        let Command::List(cmd) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(cmd.group_by, None);
        assert_eq!(cmd.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_list_group_by_alias() {
        let cli =
            Cli::try_parse_from(["libris", "list", "--group-by", "authors", "-f", "json"]).unwrap();
        let Command::List(cmd) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(cmd.group_by, Some(GroupByArg::Author));
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "libris",
            "add",
            "--title",
            "Dune",
            "--authors",
            "Frank Herbert",
            "--year",
            "1965",
        ])
        .unwrap();
        let Command::Add(cmd) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(cmd.title, "Dune");
        assert_eq!(cmd.year.as_deref(), Some("1965"));
        assert!(cmd.rating.is_none());
    }

    #[test]
    fn test_parse_add_requires_title_and_authors() {
        assert!(Cli::try_parse_from(["libris", "add", "--title", "Dune"]).is_err());
        assert!(Cli::try_parse_from(["libris", "add", "--authors", "A"]).is_err());
    }

    #[test]
    fn test_parse_edit_with_clears() {
        let cli = Cli::try_parse_from([
            "libris", "edit", "abc", "--rating", "7", "--clear", "year", "--clear", "isbn",
        ])
        .unwrap();
        let Command::Edit(cmd) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(cmd.id, "abc");
        assert_eq!(cmd.clear, vec![ClearField::Year, ClearField::Isbn]);
    }

    #[test]
    fn test_parse_edit_rejects_clearing_title() {
        assert!(Cli::try_parse_from(["libris", "edit", "abc", "--clear", "title"]).is_err());
    }

    #[test]
    fn test_parse_recommend_seed() {
        let cli = Cli::try_parse_from(["libris", "recommend", "--seed", "42"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Recommend(RecommendCommand { seed: Some(42), .. })
        ));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["libris", "config", "validate", "-f", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_config_command_keeps_config_path() {
        let cli =
            Cli::try_parse_from(["libris", "config", "show", "-c", "/custom/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: false })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["libris", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["libris", "status", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["libris", "list", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
