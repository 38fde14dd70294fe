//! Text rendering of books for the `libris` binary.

use std::fmt::Write;

use crate::book::Book;
use crate::catalog::BookGroup;
use crate::error::Result;

use super::OutputFormat;

const TABLE_TITLE_WIDTH: usize = 32;
const TABLE_AUTHORS_WIDTH: usize = 24;

/// Render a grouped listing.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_groups(groups: &[BookGroup], format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => return Ok(serde_json::to_string_pretty(groups)?),
        OutputFormat::Plain => {
            for (i, group) in groups.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                let _ = writeln!(out, "{} ({})", group.label, group.books.len());
                for book in &group.books {
                    let _ = writeln!(out, "  {}", plain_line(book));
                }
            }
        }
        OutputFormat::Table => {
            out.push_str(&table_header());
            for group in groups {
                let _ = writeln!(out, "-- {} --", group.label);
                for book in &group.books {
                    out.push_str(&table_row(book));
                }
            }
        }
    }
    Ok(out)
}

/// Render one book.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_book(book: &Book, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(book)?,
        OutputFormat::Table => format!("{}{}", table_header(), table_row(book)),
        OutputFormat::Plain => {
            let mut out = String::new();
            let _ = writeln!(out, "ID:      {}", book.id);
            let _ = writeln!(out, "Title:   {}", book.title);
            let _ = writeln!(out, "Authors: {}", book.authors_display());
            let _ = writeln!(out, "Year:    {}", optional(book.year));
            let _ = writeln!(out, "Rating:  {}", optional(book.rating));
            let _ = writeln!(out, "ISBN:    {}", optional(book.isbn.as_deref()));
            out
        }
    })
}

/// Render the recommended book, or a notice that none qualifies.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_recommendation(book: Option<&Book>, format: OutputFormat) -> Result<String> {
    match (book, format) {
        (_, OutputFormat::Json) => Ok(serde_json::to_string_pretty(&book)?),
        (None, _) => Ok("No book qualifies for a recommendation yet.\n".to_string()),
        (Some(book), OutputFormat::Plain) => Ok(format!("Recommended: {}\n", plain_line(book))),
        (Some(book), OutputFormat::Table) => render_book(book, OutputFormat::Table),
    }
}

fn plain_line(book: &Book) -> String {
    let mut line = book.to_string();
    if let Some(rating) = book.rating {
        let _ = write!(line, " [{rating}/10]");
    }
    let _ = write!(line, " <{}>", book.id);
    line
}

fn table_header() -> String {
    format!(
        "{:<32}  {:<title$}  {:<authors$}  {:>4}  {:>6}  {}\n",
        "ID",
        "TITLE",
        "AUTHORS",
        "YEAR",
        "RATING",
        "ISBN",
        title = TABLE_TITLE_WIDTH,
        authors = TABLE_AUTHORS_WIDTH,
    )
}

fn table_row(book: &Book) -> String {
    format!(
        "{:<32}  {:<title$}  {:<authors$}  {:>4}  {:>6}  {}\n",
        book.id.as_str(),
        truncate(&book.title, TABLE_TITLE_WIDTH),
        truncate(&book.authors_display(), TABLE_AUTHORS_WIDTH),
        optional(book.year),
        optional(book.rating),
        optional(book.isbn.as_deref()),
        title = TABLE_TITLE_WIDTH,
        authors = TABLE_AUTHORS_WIDTH,
    )
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
