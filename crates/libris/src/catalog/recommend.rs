//! Recommended-book selection.
//!
//! A book is eligible once it is at least `min_age` years old and carries a
//! rating. The highest rating wins; ties are broken uniformly at random.

use rand_chacha::rand_core::RngCore;

use crate::book::Book;

/// Minimum age in years before a book may be recommended.
pub const DEFAULT_MIN_AGE_YEARS: i32 = 3;

/// All books sharing the highest rating among eligible books.
///
/// Eligible means: year present, `current_year - year >= min_age`, and a
/// rating present. Returns an empty list when nothing qualifies.
#[must_use]
pub fn recommendation_candidates(books: &[Book], current_year: i32, min_age: i32) -> Vec<&Book> {
    let eligible: Vec<&Book> = books
        .iter()
        .filter(|book| {
            book.age_in(current_year)
                .is_some_and(|age| age >= i64::from(min_age))
        })
        .filter(|book| book.rating.is_some())
        .collect();

    let Some(best) = eligible
        .iter()
        .filter_map(|book| book.rating)
        .max_by(f64::total_cmp)
    else {
        return Vec::new();
    };

    eligible
        .into_iter()
        .filter(|book| book.rating == Some(best))
        .collect()
}

/// Pick the recommended book, breaking ties with `rng`.
#[must_use]
pub fn recommend<'a, R>(
    books: &'a [Book],
    current_year: i32,
    min_age: i32,
    rng: &mut R,
) -> Option<&'a Book>
where
    R: RngCore + ?Sized,
{
    let candidates = recommendation_candidates(books, current_year, min_age);
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[pick_index(rng, candidates.len())])
}

/// Uniform index in `0..len` by rejection sampling. `len` must be non-zero.
#[allow(clippy::cast_possible_truncation)]
fn pick_index<R>(rng: &mut R, len: usize) -> usize
where
    R: RngCore + ?Sized,
{
    let len = len as u64;
    let limit = u64::MAX - u64::MAX % len;
    loop {
        let value = rng.next_u64();
        if value < limit {
            return (value % len) as usize;
        }
    }
}
