//! Storage layer for libris.
//!
//! This module provides `SQLite`-based persistent storage for JSON documents
//! grouped into named collections. It is synchronous; the async
//! [`crate::store`] layer wraps it.

pub mod document;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use document::{merge_fields, new_document_id, Document};

const SELECT_COLUMNS: &str = "SELECT id, data, created_at, updated_at FROM documents";

/// Document storage engine.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Insertion with store-assigned ids
/// - Listing a collection in insertion order
/// - Field-level merge updates
/// - Deletion and statistics
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then migrates the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a new document, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is not a JSON object or the insert fails.
    pub fn insert(&self, collection: &str, data: &Value) -> Result<String> {
        let id = new_document_id();
        document::as_object(&id, data)?;

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            r"
            INSERT INTO documents (collection, id, data, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ",
            params![collection, id, serde_json::to_string(data)?, now],
        )?;

        debug!("Inserted document {}/{}", collection, id);
        Ok(id)
    }

    /// Get a document by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let result = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE collection = ?1 AND id = ?2"),
                [collection, id],
                Self::row_to_document,
            )
            .optional()?;
        Ok(result)
    }

    /// List every document in a collection, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE collection = ?1 ORDER BY created_at ASC, rowid ASC"
        ))?;

        let documents = stmt
            .query_map([collection], Self::row_to_document)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(documents)
    }

    /// Merge `patch` into an existing document.
    ///
    /// Returns `false` if no such document exists. See
    /// [`document::merge_fields`] for merge semantics.
    ///
    /// # Errors
    ///
    /// Returns an error if `patch` is not a JSON object, the stored body is
    /// malformed, or the database operation fails.
    pub fn merge(&self, collection: &str, id: &str, patch: &Value) -> Result<bool> {
        let patch = document::as_object(id, patch)?;

        let tx = self.conn.unchecked_transaction()?;
        let existing: Option<String> = tx
            .query_row(
                "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                [collection, id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(existing) = existing else {
            return Ok(false);
        };

        let mut data: Value = serde_json::from_str(&existing)?;
        let Some(fields) = data.as_object_mut() else {
            return Err(Error::malformed_document(
                id,
                "stored body is not a JSON object",
            ));
        };
        merge_fields(fields, patch);

        tx.execute(
            "UPDATE documents SET data = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
            params![
                serde_json::to_string(&data)?,
                Utc::now().to_rfc3339(),
                collection,
                id
            ],
        )?;
        tx.commit()?;

        debug!("Updated document {}/{}", collection, id);
        Ok(true)
    }

    /// Delete a document by id.
    ///
    /// Returns `true` if a document was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            [collection, id],
        )?;
        Ok(affected > 0)
    }

    /// Count documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self, collection: &str) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            [collection],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get statistics for a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self, collection: &str) -> Result<StorageStats> {
        let total_documents = self.count(collection)?;

        let (oldest, newest): (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(created_at), MAX(updated_at) FROM documents WHERE collection = ?1",
            [collection],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            collection: collection.to_string(),
            total_documents,
            oldest_document: oldest.as_deref().and_then(parse_timestamp),
            last_write: newest.as_deref().and_then(parse_timestamp),
            db_size_bytes,
        })
    }

    fn row_to_document(row: &rusqlite::Row) -> rusqlite::Result<Document> {
        let id: String = row.get(0)?;
        let data_str: String = row.get(1)?;
        let created_str: String = row.get(2)?;
        let updated_str: String = row.get(3)?;

        let data = serde_json::from_str(&data_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

        Ok(Document {
            id,
            data,
            created_at: parse_timestamp(&created_str).unwrap_or_else(Utc::now),
            updated_at: parse_timestamp(&updated_str).unwrap_or_else(Utc::now),
        })
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Statistics about one collection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// The collection described.
    pub collection: String,
    /// Number of documents in the collection.
    pub total_documents: i64,
    /// Creation time of the oldest document.
    pub oldest_document: Option<DateTime<Utc>>,
    /// Most recent create or update.
    pub last_write: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
