//! `libris` - CLI for the libris book catalog
//!
//! This binary wires the command line to a [`Catalog`] over the configured
//! `SQLite` document store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;

use libris::catalog::{Catalog, Submitted};
use libris::cli::output::{render_book, render_groups, render_recommendation};
use libris::cli::{
    AddCommand, Cli, Command, ConfigCommand, EditCommand, ListCommand, OutputFormat,
    RecommendCommand, ShowCommand, StatusCommand,
};
use libris::form::FormField;
use libris::{init_logging, BookId, Config, SqliteBookStore};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let config_path = cli.config;
    match cli.command {
        // Config commands must work even when the configuration is broken
        Command::Config(cmd) => handle_config(config_path, cmd),
        Command::List(cmd) => handle_list(&load_config(config_path)?, &cmd).await,
        Command::Show(cmd) => handle_show(&load_config(config_path)?, &cmd).await,
        Command::Add(cmd) => handle_add(&load_config(config_path)?, cmd).await,
        Command::Edit(cmd) => handle_edit(&load_config(config_path)?, &cmd).await,
        Command::Delete(cmd) => handle_delete(&load_config(config_path)?, &cmd.id).await,
        Command::Recommend(cmd) => handle_recommend(&load_config(config_path)?, &cmd).await,
        Command::Status(cmd) => handle_status(&load_config(config_path)?, &cmd).await,
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    Config::load_from(path).context("failed to load configuration")
}

fn open_store(config: &Config) -> Result<SqliteBookStore> {
    let path = config.database_path();
    debug!("Using collection '{}'", config.storage.collection);
    SqliteBookStore::open(&path, config.storage.collection.clone())
        .with_context(|| format!("failed to open catalog at {}", path.display()))
}

async fn open_catalog(config: &Config) -> Result<Catalog<SqliteBookStore>> {
    let catalog = Catalog::load(open_store(config)?)
        .await
        .context("failed to load books")?
        .with_min_age_years(config.catalog.recommendation_min_age_years)
        .with_sort_key(config.catalog.default_group_by);
    Ok(catalog)
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> Result<()> {
    let mut catalog = open_catalog(config).await?;
    if let Some(group_by) = cmd.group_by {
        catalog.set_sort_key(group_by.into());
    }

    if catalog.books().is_empty() && cmd.format != OutputFormat::Json {
        println!("The catalog is empty. Add a book with `libris add`.");
        return Ok(());
    }
    print!("{}", render_groups(catalog.groups(), cmd.format)?);
    Ok(())
}

async fn handle_show(config: &Config, cmd: &ShowCommand) -> Result<()> {
    let catalog = open_catalog(config).await?;
    let id = BookId::new(cmd.id.as_str());
    let Some(book) = catalog.book(&id) else {
        bail!("no book with id '{id}'");
    };
    print!("{}", render_book(book, cmd.format)?);
    Ok(())
}

async fn handle_add(config: &Config, cmd: AddCommand) -> Result<()> {
    let mut catalog = open_catalog(config).await?;

    catalog.set_field(FormField::Title, cmd.title);
    catalog.set_field(FormField::Authors, cmd.authors);
    catalog.set_field(FormField::Year, cmd.year.unwrap_or_default());
    catalog.set_field(FormField::Rating, cmd.rating.unwrap_or_default());
    catalog.set_field(FormField::Isbn, cmd.isbn.unwrap_or_default());

    let outcome = catalog.submit().await?;
    println!("Added book {}", outcome.id());
    Ok(())
}

async fn handle_edit(config: &Config, cmd: &EditCommand) -> Result<()> {
    let changes = cmd.changes();
    if changes.is_empty() {
        bail!("nothing to change; pass at least one field or --clear");
    }

    let mut catalog = open_catalog(config).await?;
    catalog.begin_edit(&BookId::new(cmd.id.as_str()))?;
    for (field, value) in changes {
        catalog.set_field(field, value);
    }

    match catalog.submit().await? {
        Submitted::Updated(id) => println!("Updated book {id}"),
        Submitted::Unchanged(id) => println!("Book {id} already matches; nothing changed"),
        Submitted::Created(id) => println!("Added book {id}"),
    }
    Ok(())
}

async fn handle_delete(config: &Config, id: &str) -> Result<()> {
    // Books skipped as undecodable on fetch are still deletable by id
    let mut catalog = open_catalog(config).await?;
    let id = BookId::new(id);
    catalog.delete(&id).await?;
    println!("Deleted book {id}");
    Ok(())
}

async fn handle_recommend(config: &Config, cmd: &RecommendCommand) -> Result<()> {
    let mut catalog = open_catalog(config).await?;
    if let Some(seed) = cmd.seed {
        catalog = catalog.with_seed(seed);
    }
    print!(
        "{}",
        render_recommendation(catalog.recommended(), cmd.format)?
    );
    Ok(())
}

async fn handle_status(config: &Config, cmd: &StatusCommand) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats().await?;
    let database_path = config.database_path();

    if cmd.json {
        let status = serde_json::json!({
            "database_path": database_path,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("libris status");
        println!("-------------");
        println!("Database:      {}", database_path.display());
        println!("Collection:    {}", stats.collection);
        println!("Books:         {}", stats.total_documents);
        if let Some(oldest) = stats.oldest_document {
            println!("First added:   {}", oldest.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        if let Some(last) = stats.last_write {
            println!("Last change:   {}", last.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Collection:         {}", config.storage.collection);
                println!();
                println!("[Catalog]");
                println!(
                    "  Recommend after:    {} years",
                    config.catalog.recommendation_min_age_years
                );
                println!("  Default grouping:   {}", config.catalog.default_group_by);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
