//! `SQLite` schema definitions for libris.
//!
//! Documents are stored as JSON text, one row per (collection, id) pair.

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// SQL statement to create the documents table.
pub const CREATE_DOCUMENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (collection, id)
)
";

/// SQL statement to create an index for listing a collection in insertion order.
pub const CREATE_CREATED_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(collection, created_at)
";

/// Statements of schema version 1, in order.
pub const V1_STATEMENTS: &[&str] = &[CREATE_DOCUMENTS_TABLE, CREATE_CREATED_INDEX];
