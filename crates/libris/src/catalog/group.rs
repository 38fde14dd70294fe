//! Grouped, sorted views of the catalog.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::book::{normalize_rating, Book};

/// Field used to sort and bucket the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Publication year, newest first.
    #[default]
    Year,
    /// Rating, highest first.
    Rating,
    /// First author, alphabetical.
    Author,
}

impl SortKey {
    /// Label of the bucket collecting books without this field.
    #[must_use]
    pub fn fallback_label(self) -> &'static str {
        match self {
            Self::Year => "No Year",
            Self::Rating => "No Rating",
            Self::Author => "No Author",
        }
    }

    /// Bucket label for `book`, or `None` if the field is absent.
    #[must_use]
    pub fn label_for(self, book: &Book) -> Option<String> {
        match self {
            Self::Year => book.year.map(|year| year.to_string()),
            Self::Rating => book.rating.map(|rating| normalize_rating(rating).to_string()),
            Self::Author => book.first_author().map(String::from),
        }
    }

    /// Compare two books on this key alone. Absent values sort last.
    #[must_use]
    pub fn compare(self, a: &Book, b: &Book) -> Ordering {
        match self {
            Self::Year => absent_last(a.year, b.year, |x, y| y.cmp(&x)),
            Self::Rating => absent_last(
                a.rating.map(normalize_rating),
                b.rating.map(normalize_rating),
                |x, y| y.total_cmp(&x),
            ),
            Self::Author => absent_last(
                a.first_author().map(str::to_lowercase),
                b.first_author().map(str::to_lowercase),
                |x, y| x.cmp(&y),
            ),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Rating => "rating",
            Self::Author => "author",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "rating" => Ok(Self::Rating),
            "author" | "authors" => Ok(Self::Author),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

fn absent_last<T>(a: Option<T>, b: Option<T>, present: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => present(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Books sharing one value of the sort key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookGroup {
    /// The shared value, or the fallback label.
    pub label: String,
    /// Whether this is the bucket for books without the field.
    pub is_fallback: bool,
    /// Members in display order.
    pub books: Vec<Book>,
}

/// Sort a copy of `books` by `key`, then by title and id.
#[must_use]
pub fn sort_books(books: &[Book], key: SortKey) -> Vec<Book> {
    let mut sorted = books.to_vec();
    sorted.sort_by(|a, b| {
        key.compare(a, b)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted
}

/// Sort `books` by `key` and bucket them by that field's value.
///
/// Groups come back in sort order; books without the field share a single
/// fallback group placed last. Every book lands in exactly one group.
#[must_use]
pub fn group_and_sort(books: &[Book], key: SortKey) -> Vec<BookGroup> {
    let mut groups: Vec<BookGroup> = Vec::new();
    let mut index: HashMap<Option<String>, usize> = HashMap::new();

    for book in sort_books(books, key) {
        let label = key.label_for(&book);
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            groups.push(BookGroup {
                is_fallback: label.is_none(),
                label: label
                    .clone()
                    .unwrap_or_else(|| key.fallback_label().to_string()),
                books: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].books.push(book);
    }

    groups
}
