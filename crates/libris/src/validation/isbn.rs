//! ISBN digit-count check.
//!
//! Only the number of digits is checked. Hyphens, spaces and any other
//! non-digit characters are discarded first; check digits are not verified.

use std::sync::LazyLock;

use regex::Regex;

use super::ValidationError;

// ASCII classes only: `\d` would also admit non-ASCII digits.
static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]+").expect("Invalid regex pattern"));

static ISBN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]{10}|[0-9]{13})$").expect("Invalid regex pattern"));

/// Strip every non-digit character from `input`.
#[must_use]
pub fn normalize_isbn(input: &str) -> String {
    NON_DIGITS.replace_all(input, "").into_owned()
}

/// Whether `input` carries exactly 10 or 13 digits.
#[must_use]
pub fn is_valid_isbn(input: &str) -> bool {
    ISBN_DIGITS.is_match(&normalize_isbn(input))
}

/// Validate an ISBN string.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidIsbn`] carrying the original input.
pub fn validate_isbn(input: &str) -> Result<(), ValidationError> {
    if is_valid_isbn(input) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIsbn(input.to_string()))
    }
}
