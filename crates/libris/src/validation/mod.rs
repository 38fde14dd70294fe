//! Client-side validation for book input.
//!
//! Validation is deliberately shallow:
//!
//! - **Title**: must be non-empty after trimming.
//! - **Authors**: at least one non-empty entry.
//! - **ISBN**: optional; when present its digits (separators ignored) must
//!   number exactly 10 or 13.
//! - **Year / rating**: must parse; rating must lie in `0..=10` and year may
//!   not precede [`MIN_YEAR`].
//!
//! # Example
//!
//! ```
//! use libris::validation::{is_valid_isbn, normalize_isbn};
//!
//! assert!(is_valid_isbn("978-0-306-40615-7"));
//! assert_eq!(normalize_isbn("0-306-40615-2"), "0306406152");
//! assert!(!is_valid_isbn("12345"));
//! ```

mod isbn;

use thiserror::Error;

pub use isbn::{is_valid_isbn, normalize_isbn, validate_isbn};

/// Earliest publication year accepted from the form.
pub const MIN_YEAR: i32 = 1800;

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 0.0;

/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;

/// Why a book form was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The title is empty or whitespace.
    #[error("title must not be empty")]
    EmptyTitle,

    /// No author names were given.
    #[error("at least one author is required")]
    NoAuthors,

    /// The ISBN does not carry 10 or 13 digits.
    #[error("ISBN '{0}' must contain exactly 10 or 13 digits")]
    InvalidIsbn(String),

    /// The year is not a whole number.
    #[error("year '{0}' is not a whole number")]
    InvalidYear(String),

    /// The year precedes [`MIN_YEAR`].
    #[error("year {year} is before {min}")]
    YearTooEarly {
        /// The rejected year.
        year: i32,
        /// The earliest accepted year.
        min: i32,
    },

    /// The rating is not a number.
    #[error("rating '{0}' is not a number")]
    InvalidRating(String),

    /// The rating lies outside `0..=10`.
    #[error("rating {0} must be between 0 and 10")]
    RatingOutOfRange(f64),
}

/// Check that a title is present.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyTitle`] for blank titles.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

/// Check that at least one author is listed.
///
/// # Errors
///
/// Returns [`ValidationError::NoAuthors`] for an empty list.
pub fn validate_authors(authors: &[String]) -> Result<(), ValidationError> {
    if authors.iter().all(|a| a.trim().is_empty()) {
        return Err(ValidationError::NoAuthors);
    }
    Ok(())
}

/// Check a parsed year against [`MIN_YEAR`].
///
/// # Errors
///
/// Returns [`ValidationError::YearTooEarly`] when out of range.
pub fn validate_year(year: i32) -> Result<(), ValidationError> {
    if year < MIN_YEAR {
        return Err(ValidationError::YearTooEarly {
            year,
            min: MIN_YEAR,
        });
    }
    Ok(())
}

/// Check a parsed rating lies in `0..=10`.
///
/// # Errors
///
/// Returns [`ValidationError::RatingOutOfRange`] for out-of-range or
/// non-finite ratings.
pub fn validate_rating(rating: f64) -> Result<(), ValidationError> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange(rating));
    }
    Ok(())
}
