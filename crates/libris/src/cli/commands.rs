//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::catalog::SortKey;
use crate::form::FormField;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Group books by this field (defaults to the configured grouping)
    #[arg(short, long, value_enum)]
    pub group_by: Option<GroupByArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the book to show
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Book title
    #[arg(short, long)]
    pub title: String,

    /// Comma-separated author names
    #[arg(short, long)]
    pub authors: String,

    /// Publication year
    #[arg(short, long)]
    pub year: Option<String>,

    /// Rating from 0 to 10
    #[arg(short, long)]
    pub rating: Option<String>,

    /// ISBN-10 or ISBN-13, separators allowed
    #[arg(short, long)]
    pub isbn: Option<String>,
}

/// Edit command arguments.
///
/// Only the given fields change; `--clear` removes optional fields.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the book to edit
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New comma-separated author names
    #[arg(short, long)]
    pub authors: Option<String>,

    /// New publication year
    #[arg(short, long)]
    pub year: Option<String>,

    /// New rating
    #[arg(short, long)]
    pub rating: Option<String>,

    /// New ISBN
    #[arg(short, long)]
    pub isbn: Option<String>,

    /// Remove an optional field (repeatable)
    #[arg(long, value_enum)]
    pub clear: Vec<ClearField>,
}

impl EditCommand {
    /// Form inputs this command changes, in field order.
    ///
    /// A cleared field maps to an empty input and overrides a new value
    /// given for the same field.
    #[must_use]
    pub fn changes(&self) -> Vec<(FormField, String)> {
        let given = [
            (FormField::Title, &self.title),
            (FormField::Authors, &self.authors),
            (FormField::Year, &self.year),
            (FormField::Rating, &self.rating),
            (FormField::Isbn, &self.isbn),
        ];

        given
            .into_iter()
            .filter_map(|(field, value)| {
                if self.clear.iter().any(|c| FormField::from(*c) == field) {
                    Some((field, String::new()))
                } else {
                    value.clone().map(|v| (field, v))
                }
            })
            .collect()
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the book to delete
    pub id: String,
}

/// Recommend command arguments.
#[derive(Debug, Args)]
pub struct RecommendCommand {
    /// Seed for tie-breaking, for repeatable picks
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Grouping argument for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupByArg {
    /// Publication year, newest first
    Year,
    /// Rating, highest first
    Rating,
    /// First author, A to Z
    #[value(alias = "authors")]
    Author,
}

impl From<GroupByArg> for SortKey {
    fn from(arg: GroupByArg) -> Self {
        match arg {
            GroupByArg::Year => Self::Year,
            GroupByArg::Rating => Self::Rating,
            GroupByArg::Author => Self::Author,
        }
    }
}

/// Optional field that `edit --clear` can remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClearField {
    /// Publication year
    Year,
    /// Rating
    Rating,
    /// ISBN
    Isbn,
}

impl From<ClearField> for FormField {
    fn from(field: ClearField) -> Self {
        match field {
            ClearField::Year => Self::Year,
            ClearField::Rating => Self::Rating,
            ClearField::Isbn => Self::Isbn,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
