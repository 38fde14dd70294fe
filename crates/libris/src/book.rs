//! Core book types for libris.
//!
//! A [`Book`] is one document in the catalog collection. [`NewBook`] is the
//! body written on create and [`BookPatch`] the partial body written on
//! update.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Store-assigned identifier of a book document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Wrap a raw document id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw document id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A catalog record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    /// Identifier assigned by the store.
    pub id: BookId,
    /// Book title.
    pub title: String,
    /// Author names, in the order entered.
    pub authors: Vec<String>,
    /// Publication year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Rating between 0 and 10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// ISBN as entered (separators preserved).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl Book {
    /// Build a book from a stored document body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be decoded, e.g. it has no title.
    pub fn from_document(id: impl Into<BookId>, data: Value) -> Result<Self> {
        let body: NewBook = serde_json::from_value(data)?;
        Ok(Self::with_id(id.into(), body))
    }

    /// Attach an id to a document body.
    #[must_use]
    pub fn with_id(id: BookId, body: NewBook) -> Self {
        Self {
            id,
            title: body.title,
            authors: body.authors,
            year: body.year,
            rating: body.rating,
            isbn: body.isbn,
        }
    }

    /// The first listed author, if any.
    #[must_use]
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Authors joined for display.
    #[must_use]
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }

    /// Years elapsed since publication, if the year is known.
    ///
    /// Widened to `i64` so any stored year yields an age.
    #[must_use]
    pub fn age_in(&self, current_year: i32) -> Option<i64> {
        self.year.map(|year| i64::from(current_year) - i64::from(year))
    }
}

/// Fold negative zero into zero so equal ratings label and group alike.
#[must_use]
pub fn normalize_rating(rating: f64) -> f64 {
    // -0.0 + 0.0 is +0.0; every other value is unchanged
    rating + 0.0
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if !self.authors.is_empty() {
            write!(f, " by {}", self.authors_display())?;
        }
        if let Some(year) = self.year {
            write!(f, " ({year})")?;
        }
        Ok(())
    }
}

/// Split comma-separated author input into trimmed, non-empty names.
#[must_use]
pub fn split_authors(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Document body of a book.
///
/// Decoding is lenient about shapes written by older form-based clients:
/// `year` and `rating` may be numeric strings or empty strings, `authors`
/// may be a single comma-separated string, and a blank `isbn` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    /// Book title.
    pub title: String,
    /// Author names.
    #[serde(default, deserialize_with = "lenient::authors")]
    pub authors: Vec<String>,
    /// Publication year.
    #[serde(
        default,
        deserialize_with = "lenient::year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i32>,
    /// Rating between 0 and 10.
    #[serde(
        default,
        deserialize_with = "lenient::rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    /// ISBN as entered.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<String>,
}

impl NewBook {
    /// Encode as a document body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_document(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// A partial update to a stored book.
///
/// Outer `None` leaves a field untouched. For optional fields, `Some(None)`
/// encodes as JSON `null`, which clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New author list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    /// New or cleared year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<Option<i32>>,
    /// New or cleared rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Option<f64>>,
    /// New or cleared ISBN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<Option<String>>,
}

impl BookPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_none()
            && self.year.is_none()
            && self.rating.is_none()
            && self.isbn.is_none()
    }

    /// Encode as a merge document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_document(&self) -> Result<Value> {
        let value = serde_json::to_value(self)?;
        if value.is_object() {
            Ok(value)
        } else {
            Err(Error::internal("book patch did not encode as an object"))
        }
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};

    use super::{normalize_rating, split_authors};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Int(i64),
        Float(f64),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Authors {
        List(Vec<String>),
        Text(String),
    }

    pub fn authors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Authors>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(Authors::Text(text)) => split_authors(&text),
            Some(Authors::List(list)) => list
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect(),
        })
    }

    pub fn year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Scalar::Int(n)) => i32::try_from(n)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("year {n} out of range"))),
            #[allow(clippy::cast_possible_truncation)]
            Some(Scalar::Float(f)) if f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) => {
                Ok(Some(f as i32))
            }
            Some(Scalar::Float(f)) => Err(D::Error::custom(format!("year {f} is not whole"))),
            Some(Scalar::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse()
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("year '{text}' is not a number")))
            }
        }
    }

    pub fn rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            #[allow(clippy::cast_precision_loss)]
            Some(Scalar::Int(n)) => Ok(Some(n as f64)),
            Some(Scalar::Float(f)) => Ok(Some(normalize_rating(f))),
            Some(Scalar::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                match text.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(Some(normalize_rating(value))),
                    _ => Err(D::Error::custom(format!(
                        "rating '{text}' is not a number"
                    ))),
                }
            }
        }
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_book() -> Book {
        Book {
            id: BookId::new("b1"),
            title: "Good Omens".to_string(),
            authors: vec!["Terry Pratchett".to_string(), "Neil Gaiman".to_string()],
            year: Some(1990),
            rating: Some(9.0),
            isbn: Some("0-575-04800-X".to_string()),
        }
    }

    #[test]
    fn test_split_authors() {
        assert_eq!(
            split_authors("Terry Pratchett, Neil Gaiman"),
            vec!["Terry Pratchett", "Neil Gaiman"]
        );
        assert_eq!(split_authors(" A ,, B , "), vec!["A", "B"]);
        assert!(split_authors("").is_empty());
        assert!(split_authors(" , ").is_empty());
    }

    #[test]
    fn test_first_author() {
        assert_eq!(sample_book().first_author(), Some("Terry Pratchett"));

        let mut book = sample_book();
        book.authors.clear();
        assert_eq!(book.first_author(), None);
    }

    #[test]
    fn test_age_in() {
        let book = sample_book();
        assert_eq!(book.age_in(2000), Some(10));

        let mut undated = sample_book();
        undated.year = None;
        assert_eq!(undated.age_in(2000), None);
    }

    #[test]
    fn test_age_in_extreme_years() {
        let mut book = sample_book();
        book.year = Some(i32::MIN);
        assert_eq!(book.age_in(2024), Some(2024 - i64::from(i32::MIN)));

        book.year = Some(i32::MAX);
        assert_eq!(book.age_in(i32::MIN), Some(i64::from(i32::MIN) - i64::from(i32::MAX)));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample_book().to_string(),
            "Good Omens by Terry Pratchett, Neil Gaiman (1990)"
        );
    }

    #[test]
    fn test_from_document_clean_shape() {
        let data = json!({
            "title": "Dune",
            "authors": ["Frank Herbert"],
            "year": 1965,
            "rating": 8.5,
            "isbn": "9780441013593"
        });
        let book = Book::from_document("d1", data).unwrap();
        assert_eq!(book.id.as_str(), "d1");
        assert_eq!(book.title, "Dune");
        assert_eq!(book.authors, vec!["Frank Herbert"]);
        assert_eq!(book.year, Some(1965));
        assert_eq!(book.rating, Some(8.5));
        assert_eq!(book.isbn.as_deref(), Some("9780441013593"));
    }

    #[test]
    fn test_from_document_form_strings() {
        let data = json!({
            "title": "Dune",
            "authors": "Frank Herbert, Brian Herbert",
            "year": "1965",
            "rating": "",
            "isbn": ""
        });
        let book = Book::from_document("d2", data).unwrap();
        assert_eq!(book.authors, vec!["Frank Herbert", "Brian Herbert"]);
        assert_eq!(book.year, Some(1965));
        assert_eq!(book.rating, None);
        assert_eq!(book.isbn, None);
    }

    #[test]
    fn test_from_document_missing_optionals() {
        let book = Book::from_document("d3", json!({"title": "Untitled draft"})).unwrap();
        assert!(book.authors.is_empty());
        assert!(book.year.is_none());
        assert!(book.rating.is_none());
        assert!(book.isbn.is_none());
    }

    #[test]
    fn test_from_document_integer_rating_and_whole_float_year() {
        let book =
            Book::from_document("d4", json!({"title": "T", "rating": 7, "year": 2001.0})).unwrap();
        assert_eq!(book.rating, Some(7.0));
        assert_eq!(book.year, Some(2001));
    }

    #[test]
    fn test_from_document_negative_zero_rating() {
        let book = Book::from_document("d7", json!({"title": "T", "rating": -0.0})).unwrap();
        assert!(book.rating.is_some_and(f64::is_sign_positive));

        let book = Book::from_document("d8", json!({"title": "T", "rating": "-0"})).unwrap();
        assert!(book.rating.is_some_and(f64::is_sign_positive));
    }

    #[test]
    fn test_from_document_rejects_missing_title() {
        let result = Book::from_document("d5", json!({"authors": ["A"]}));
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_from_document_rejects_garbage_year() {
        let result = Book::from_document("d6", json!({"title": "T", "year": "soon"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_book_document_omits_absent_fields() {
        let body = NewBook {
            title: "T".to_string(),
            authors: vec!["A".to_string()],
            year: None,
            rating: Some(5.0),
            isbn: None,
        };
        let doc = body.to_document().unwrap();
        assert_eq!(doc, json!({"title": "T", "authors": ["A"], "rating": 5.0}));
    }

    #[test]
    fn test_patch_encodes_clears_as_null() {
        let patch = BookPatch {
            title: Some("New".to_string()),
            year: Some(None),
            ..BookPatch::default()
        };
        let doc = patch.to_document().unwrap();
        assert_eq!(doc, json!({"title": "New", "year": null}));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(BookPatch::default().is_empty());
        let patch = BookPatch {
            rating: Some(Some(3.0)),
            ..BookPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_book_id_conversions() {
        let id: BookId = "abc".into();
        assert_eq!(id.to_string(), "abc");
        assert_eq!(BookId::from("abc".to_string()), id);
    }
}
