//! Editable book form state.
//!
//! [`BookForm`] holds raw text for each input, exactly as typed. Text is only
//! parsed when the form is submitted: [`BookForm::to_new_book`] for creation
//! (fully validated) and [`BookForm::to_patch`] for edits (parsed only).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::book::{normalize_rating, split_authors, Book, BookPatch, NewBook};
use crate::validation::{
    validate_authors, validate_isbn, validate_rating, validate_title, validate_year,
    ValidationError,
};

/// One input of the book form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    /// Title text.
    Title,
    /// Comma-separated authors.
    Authors,
    /// Publication year.
    Year,
    /// Rating, 0 to 10.
    Rating,
    /// ISBN.
    Isbn,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Authors,
        Self::Year,
        Self::Rating,
        Self::Isbn,
    ];

    /// Field name as used in documents and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Authors => "authors",
            Self::Year => "year",
            Self::Rating => "rating",
            Self::Isbn => "isbn",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown form field: {s}"))
    }
}

/// Raw text state of the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookForm {
    /// Title input.
    pub title: String,
    /// Authors input, comma-separated.
    pub authors: String,
    /// Year input.
    pub year: String,
    /// Rating input.
    pub rating: String,
    /// ISBN input.
    pub isbn: String,
}

impl BookForm {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill a form from an existing book, for editing.
    #[must_use]
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            authors: book.authors_display(),
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
            rating: book.rating.map(|r| r.to_string()).unwrap_or_default(),
            isbn: book.isbn.clone().unwrap_or_default(),
        }
    }

    /// Replace the text of one input.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// Current text of one input.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Authors => &self.authors,
            FormField::Year => &self.year,
            FormField::Rating => &self.rating,
            FormField::Isbn => &self.isbn,
        }
    }

    /// Clear every input.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether every input is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        FormField::ALL
            .into_iter()
            .all(|field| self.get(field).trim().is_empty())
    }

    /// Parse and validate the form into a new book body.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking title, authors,
    /// year, rating and ISBN in that order.
    pub fn to_new_book(&self) -> Result<NewBook, ValidationError> {
        let title = self.title.trim();
        validate_title(title)?;

        let authors = split_authors(&self.authors);
        validate_authors(&authors)?;

        let year = parse_year(&self.year)?;
        if let Some(year) = year {
            validate_year(year)?;
        }

        let rating = parse_rating(&self.rating)?;
        if let Some(rating) = rating {
            validate_rating(rating)?;
        }

        let isbn = non_blank(&self.isbn);
        if let Some(isbn) = &isbn {
            validate_isbn(isbn)?;
        }

        Ok(NewBook {
            title: title.to_string(),
            authors,
            year,
            rating,
            isbn,
        })
    }

    /// Diff the form against `original`, producing a patch of changed fields.
    ///
    /// Only year and rating need to parse; title, author and ISBN checks are
    /// not repeated for edits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidYear`] or
    /// [`ValidationError::InvalidRating`] for unparseable numbers.
    pub fn to_patch(&self, original: &Book) -> Result<BookPatch, ValidationError> {
        let mut patch = BookPatch::default();

        let title = self.title.trim();
        if title != original.title {
            patch.title = Some(title.to_string());
        }

        let authors = split_authors(&self.authors);
        if authors != original.authors {
            patch.authors = Some(authors);
        }

        let year = parse_year(&self.year)?;
        if year != original.year {
            patch.year = Some(year);
        }

        let rating = parse_rating(&self.rating)?;
        if rating != original.rating {
            patch.rating = Some(rating);
        }

        let isbn = non_blank(&self.isbn);
        if isbn != original.isbn {
            patch.isbn = Some(isbn);
        }

        Ok(patch)
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Authors => &mut self.authors,
            FormField::Year => &mut self.year,
            FormField::Rating => &mut self.rating,
            FormField::Isbn => &mut self.isbn,
        }
    }
}

fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse year input; blank means absent.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidYear`] for non-integers.
pub fn parse_year(input: &str) -> Result<Option<i32>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::InvalidYear(input.to_string()))
}

/// Parse rating input; blank means absent.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidRating`] for non-numbers, including
/// `NaN` and infinities.
pub fn parse_rating(input: &str) -> Result<Option<f64>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(normalize_rating(value))),
        _ => Err(ValidationError::InvalidRating(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookId;

    fn filled_form() -> BookForm {
        BookForm {
            title: "  The Hobbit ".to_string(),
            authors: "J. R. R. Tolkien".to_string(),
            year: "1937".to_string(),
            rating: "9.5".to_string(),
            isbn: "978-0-261-10221-7".to_string(),
        }
    }

    fn stored_book() -> Book {
        Book {
            id: BookId::new("h1"),
            title: "The Hobbit".to_string(),
            authors: vec!["J. R. R. Tolkien".to_string()],
            year: Some(1937),
            rating: Some(9.5),
            isbn: Some("978-0-261-10221-7".to_string()),
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut form = BookForm::new();
        form.set(FormField::Title, "Dune");
        form.set(FormField::Rating, "8");
        assert_eq!(form.get(FormField::Title), "Dune");
        assert_eq!(form.get(FormField::Rating), "8");
        assert_eq!(form.get(FormField::Isbn), "");
    }

    #[test]
    fn test_reset_and_is_blank() {
        let mut form = filled_form();
        assert!(!form.is_blank());
        form.reset();
        assert!(form.is_blank());
        assert_eq!(form, BookForm::default());
    }

    #[test]
    fn test_to_new_book() {
        let book = filled_form().to_new_book().unwrap();
        assert_eq!(book.title, "The Hobbit");
        assert_eq!(book.authors, vec!["J. R. R. Tolkien"]);
        assert_eq!(book.year, Some(1937));
        assert_eq!(book.rating, Some(9.5));
        assert_eq!(book.isbn.as_deref(), Some("978-0-261-10221-7"));
    }

    #[test]
    fn test_to_new_book_optional_fields_blank() {
        let mut form = filled_form();
        form.year.clear();
        form.rating = "  ".to_string();
        form.isbn.clear();
        let book = form.to_new_book().unwrap();
        assert_eq!(book.year, None);
        assert_eq!(book.rating, None);
        assert_eq!(book.isbn, None);
    }

    #[test]
    fn test_to_new_book_requires_title_and_author() {
        let mut form = filled_form();
        form.title = "   ".to_string();
        assert_eq!(form.to_new_book(), Err(ValidationError::EmptyTitle));

        let mut form = filled_form();
        form.authors = " , ".to_string();
        assert_eq!(form.to_new_book(), Err(ValidationError::NoAuthors));
    }

    #[test]
    fn test_to_new_book_rejects_bad_isbn() {
        let mut form = filled_form();
        form.isbn = "123-456".to_string();
        assert_eq!(
            form.to_new_book(),
            Err(ValidationError::InvalidIsbn("123-456".to_string()))
        );
    }

    #[test]
    fn test_to_new_book_rejects_bad_numbers() {
        let mut form = filled_form();
        form.year = "nineteen".to_string();
        assert!(matches!(
            form.to_new_book(),
            Err(ValidationError::InvalidYear(_))
        ));

        let mut form = filled_form();
        form.year = "1700".to_string();
        assert!(matches!(
            form.to_new_book(),
            Err(ValidationError::YearTooEarly { year: 1700, .. })
        ));

        let mut form = filled_form();
        form.rating = "11".to_string();
        assert!(matches!(
            form.to_new_book(),
            Err(ValidationError::RatingOutOfRange(_))
        ));

        let mut form = filled_form();
        form.rating = "NaN".to_string();
        assert!(matches!(
            form.to_new_book(),
            Err(ValidationError::InvalidRating(_))
        ));
    }

    #[test]
    fn test_from_book_round_trips_to_empty_patch() {
        let book = stored_book();
        let form = BookForm::from_book(&book);
        assert_eq!(form.authors, "J. R. R. Tolkien");
        assert_eq!(form.year, "1937");
        assert!(form.to_patch(&book).unwrap().is_empty());
    }

    #[test]
    fn test_to_patch_only_changed_fields() {
        let book = stored_book();
        let mut form = BookForm::from_book(&book);
        form.set(FormField::Rating, "10");
        form.set(FormField::Year, "");

        let patch = form.to_patch(&book).unwrap();
        assert_eq!(patch.rating, Some(Some(10.0)));
        assert_eq!(patch.year, Some(None));
        assert!(patch.title.is_none());
        assert!(patch.authors.is_none());
        assert!(patch.isbn.is_none());
    }

    #[test]
    fn test_to_patch_skips_isbn_and_title_checks() {
        let book = stored_book();
        let mut form = BookForm::from_book(&book);
        form.set(FormField::Isbn, "42");
        form.set(FormField::Title, "");

        let patch = form.to_patch(&book).unwrap();
        assert_eq!(patch.isbn, Some(Some("42".to_string())));
        assert_eq!(patch.title, Some(String::new()));
    }

    #[test]
    fn test_to_patch_still_parses_numbers() {
        let book = stored_book();
        let mut form = BookForm::from_book(&book);
        form.set(FormField::Year, "soon");
        assert!(matches!(
            form.to_patch(&book),
            Err(ValidationError::InvalidYear(_))
        ));
    }

    #[test]
    fn test_form_field_from_str() {
        assert_eq!("title".parse::<FormField>(), Ok(FormField::Title));
        assert_eq!("ISBN".parse::<FormField>(), Ok(FormField::Isbn));
        assert!("publisher".parse::<FormField>().is_err());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_year(""), Ok(None));
        assert_eq!(parse_year(" 2001 "), Ok(Some(2001)));
        assert_eq!(parse_rating("7.25"), Ok(Some(7.25)));
        assert!(parse_rating("inf").is_err());
    }

    #[test]
    fn test_parse_rating_folds_negative_zero() {
        let rating = parse_rating("-0").unwrap().unwrap();
        assert_eq!(rating, 0.0);
        assert!(rating.is_sign_positive());
    }
}
