//! Remote book store.
//!
//! [`BookStore`] is the async boundary between the catalog and wherever the
//! book documents live. [`SqliteBookStore`] keeps them in a local
//! [`Storage`] database, running each call on the blocking thread pool.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::book::{Book, BookId, BookPatch, NewBook};
use crate::error::{Error, Result};
use crate::storage::{Storage, StorageStats};

/// Default collection holding book documents.
pub const DEFAULT_COLLECTION: &str = "books";

/// A document store holding one collection of books.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Fetch every book in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn fetch_all(&self) -> Result<Vec<Book>>;

    /// Create a book, returning the id the store assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn create(&self, book: &NewBook) -> Result<BookId>;

    /// Merge `patch` into an existing book.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentNotFound`] if no such book exists, or an
    /// error if the write fails.
    async fn update(&self, id: &BookId, patch: &BookPatch) -> Result<()>;

    /// Delete a book. Deleting a missing book succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn delete(&self, id: &BookId) -> Result<()>;
}

/// [`BookStore`] backed by a `SQLite` document database.
#[derive(Debug, Clone)]
pub struct SqliteBookStore {
    storage: Arc<Mutex<Storage>>,
    collection: String,
}

impl SqliteBookStore {
    /// Wrap an open storage handle.
    #[must_use]
    pub fn new(storage: Storage, collection: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            collection: collection.into(),
        }
    }

    /// Open the database at `path` and use `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>, collection: impl Into<String>) -> Result<Self> {
        Ok(Self::new(Storage::open(path)?, collection))
    }

    /// A store over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Storage::open_in_memory()?, DEFAULT_COLLECTION))
    }

    /// The collection this store reads and writes.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Statistics for the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be read.
    pub async fn stats(&self) -> Result<StorageStats> {
        self.with_storage(|storage, collection| storage.stats(collection))
            .await
    }

    /// Run `f` against the locked storage on the blocking pool.
    async fn with_storage<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Storage, &str) -> Result<T> + Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let collection = self.collection.clone();
        tokio::task::spawn_blocking(move || {
            let guard = storage
                .lock()
                .map_err(|_| Error::internal("storage lock poisoned"))?;
            f(&guard, &collection)
        })
        .await?
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn fetch_all(&self) -> Result<Vec<Book>> {
        let documents = self
            .with_storage(|storage, collection| storage.list(collection))
            .await?;

        let total = documents.len();
        let books: Vec<Book> = documents
            .into_iter()
            .filter_map(|doc| match Book::from_document(doc.id.as_str(), doc.data) {
                Ok(book) => Some(book),
                Err(e) => {
                    warn!("Skipping undecodable book {}: {}", doc.id, e);
                    None
                }
            })
            .collect();

        debug!("Fetched {} of {} book documents", books.len(), total);
        Ok(books)
    }

    async fn create(&self, book: &NewBook) -> Result<BookId> {
        let data = book.to_document()?;
        let id = self
            .with_storage(move |storage, collection| storage.insert(collection, &data))
            .await?;
        Ok(BookId::from(id))
    }

    async fn update(&self, id: &BookId, patch: &BookPatch) -> Result<()> {
        let data = patch.to_document()?;
        let id = id.to_string();
        self.with_storage(move |storage, collection| {
            if storage.merge(collection, &id, &data)? {
                Ok(())
            } else {
                Err(Error::document_not_found(collection, id))
            }
        })
        .await
    }

    async fn delete(&self, id: &BookId) -> Result<()> {
        let id = id.to_string();
        self.with_storage(move |storage, collection| {
            if !storage.delete(collection, &id)? {
                debug!("Delete of missing book {}/{} ignored", collection, id);
            }
            Ok(())
        })
        .await
    }
}
