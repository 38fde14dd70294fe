//! The catalog component.
//!
//! A [`Catalog`] owns the in-memory book list, the add/edit form, and the
//! derived views (grouping and recommendation). Every mutation is sent to the
//! [`BookStore`] and followed by a full re-fetch; there is no optimistic
//! update and no rollback.

mod group;
mod recommend;

use std::fmt;

use chrono::{Datelike, Utc};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};

use crate::book::{Book, BookId};
use crate::error::{Error, Result};
use crate::form::{BookForm, FormField};
use crate::store::BookStore;

pub use group::{group_and_sort, sort_books, BookGroup, SortKey};
pub use recommend::{recommend, recommendation_candidates, DEFAULT_MIN_AGE_YEARS};

/// Outcome of a successful [`Catalog::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    /// A new book was created with this id.
    Created(BookId),
    /// The book being edited was updated.
    Updated(BookId),
    /// The form matched the edited book; nothing was sent.
    Unchanged(BookId),
}

impl Submitted {
    /// The book affected.
    #[must_use]
    pub fn id(&self) -> &BookId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Unchanged(id) => id,
        }
    }
}

/// Catalog state bound to a book store.
pub struct Catalog<S> {
    store: S,
    books: Vec<Book>,
    form: BookForm,
    editing: Option<BookId>,
    sort_key: SortKey,
    groups: Vec<BookGroup>,
    recommended: Option<BookId>,
    min_age_years: i32,
    rng: ChaCha8Rng,
    current_year: Option<i32>,
}

impl<S> fmt::Debug for Catalog<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("books", &self.books.len())
            .field("editing", &self.editing)
            .field("sort_key", &self.sort_key)
            .field("recommended", &self.recommended)
            .field("min_age_years", &self.min_age_years)
            .finish_non_exhaustive()
    }
}

impl<S: BookStore> Catalog<S> {
    /// Create an empty catalog. Call [`Catalog::refresh`] to populate it.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            books: Vec::new(),
            form: BookForm::new(),
            editing: None,
            sort_key: SortKey::default(),
            groups: Vec::new(),
            recommended: None,
            min_age_years: DEFAULT_MIN_AGE_YEARS,
            rng: ChaCha8Rng::from_os_rng(),
            current_year: None,
        }
    }

    /// Create a catalog and fetch its books.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial fetch fails.
    pub async fn load(store: S) -> Result<Self> {
        let mut catalog = Self::new(store);
        catalog.refresh().await?;
        Ok(catalog)
    }

    /// Set the initial sort key.
    #[must_use]
    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.set_sort_key(key);
        self
    }

    /// Set the minimum age for recommendation.
    #[must_use]
    pub fn with_min_age_years(mut self, years: u32) -> Self {
        self.min_age_years = i32::try_from(years).unwrap_or(i32::MAX);
        self.recompute_recommendation();
        self
    }

    /// Seed the tie-breaking random source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.recompute_recommendation();
        self
    }

    /// Pin the year used for age calculations.
    #[must_use]
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self.recompute_recommendation();
        self
    }

    /// Fetch every book from the store and rebuild the derived views.
    ///
    /// On failure the previous list is kept.
    ///
    /// # Errors
    ///
    /// Returns the store error after logging it.
    pub async fn refresh(&mut self) -> Result<()> {
        let books = self.store.fetch_all().await.map_err(|e| {
            error!("Failed to fetch books: {}", e);
            e
        })?;

        debug!("Loaded {} books", books.len());
        self.books = books;
        self.groups = group_and_sort(&self.books, self.sort_key);
        self.recompute_recommendation();
        Ok(())
    }

    /// All loaded books, in store order.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Look up a loaded book.
    #[must_use]
    pub fn book(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| &book.id == id)
    }

    /// The grouped view under the current sort key.
    #[must_use]
    pub fn groups(&self) -> &[BookGroup] {
        &self.groups
    }

    /// The current sort key.
    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// The recommended book, if any qualifies.
    #[must_use]
    pub fn recommended(&self) -> Option<&Book> {
        self.recommended.as_ref().and_then(|id| self.book(id))
    }

    /// The form being edited.
    #[must_use]
    pub fn form(&self) -> &BookForm {
        &self.form
    }

    /// Mutable access to the form.
    pub fn form_mut(&mut self) -> &mut BookForm {
        &mut self.form
    }

    /// Replace the text of one form input.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// The id of the book being edited, if in edit mode.
    #[must_use]
    pub fn editing(&self) -> Option<&BookId> {
        self.editing.as_ref()
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The year used for age calculations.
    #[must_use]
    pub fn current_year(&self) -> i32 {
        self.current_year.unwrap_or_else(|| Utc::now().year())
    }

    /// Copy a loaded book into the form and switch to edit mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownBook`] if the book is not loaded.
    pub fn begin_edit(&mut self, id: &BookId) -> Result<()> {
        let book = self
            .book(id)
            .ok_or_else(|| Error::UnknownBook(id.to_string()))?;
        self.form = BookForm::from_book(book);
        self.editing = Some(id.clone());
        Ok(())
    }

    /// Leave edit mode and clear the form.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.reset();
    }

    /// Submit the form.
    ///
    /// In create mode the form is validated and a new book created. In edit
    /// mode the form is parsed into a patch of changed fields and applied.
    /// On success the form is reset and the catalog re-fetched. Invalid input
    /// never reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for rejected input, or the store error
    /// after logging it. The form is kept on failure.
    pub async fn submit(&mut self) -> Result<Submitted> {
        let outcome = match self.editing.clone() {
            None => {
                let body = self.form.to_new_book().map_err(|e| {
                    warn!("Rejected new book: {}", e);
                    e
                })?;
                let id = self.store.create(&body).await.map_err(|e| {
                    error!("Failed to add book: {}", e);
                    e
                })?;
                info!("Added book {}", id);
                Submitted::Created(id)
            }
            Some(id) => {
                let original = self
                    .book(&id)
                    .ok_or_else(|| Error::UnknownBook(id.to_string()))?;
                let patch = self.form.to_patch(original).map_err(|e| {
                    warn!("Rejected edit of {}: {}", id, e);
                    e
                })?;
                if patch.is_empty() {
                    debug!("Edit of {} changed nothing", id);
                    self.cancel_edit();
                    return Ok(Submitted::Unchanged(id));
                }
                self.store.update(&id, &patch).await.map_err(|e| {
                    error!("Failed to update book {}: {}", id, e);
                    e
                })?;
                info!("Updated book {}", id);
                Submitted::Updated(id)
            }
        };

        self.cancel_edit();
        self.refresh_after_mutation().await;
        Ok(outcome)
    }

    /// Delete a book and re-fetch.
    ///
    /// # Errors
    ///
    /// Returns the store error after logging it.
    pub async fn delete(&mut self, id: &BookId) -> Result<()> {
        self.store.delete(id).await.map_err(|e| {
            error!("Failed to delete book {}: {}", id, e);
            e
        })?;
        info!("Deleted book {}", id);

        if self.editing.as_ref() == Some(id) {
            self.cancel_edit();
        }
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Change the sort key and regroup.
    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.groups = group_and_sort(&self.books, key);
    }

    /// The mutation already succeeded, so a failed re-fetch is only logged.
    async fn refresh_after_mutation(&mut self) {
        // refresh() has logged the failure
        let _ = self.refresh().await;
    }

    fn recompute_recommendation(&mut self) {
        let current_year = self.current_year();
        self.recommended = recommend(&self.books, current_year, self.min_age_years, &mut self.rng)
            .map(|book| book.id.clone());
    }
}
