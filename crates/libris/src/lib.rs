//! `libris` - A book catalog with grouped listings and recommendations
//!
//! This library provides the catalog component, its document store, and the
//! pure grouping and recommendation functions behind the `libris` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod book;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod storage;
pub mod store;
pub mod validation;

pub use book::{Book, BookId, BookPatch, NewBook};
pub use catalog::{group_and_sort, recommend, BookGroup, Catalog, SortKey, Submitted};
pub use config::Config;
pub use error::{Error, Result};
pub use form::{BookForm, FormField};
pub use logging::init_logging;
pub use storage::{Storage, StorageStats};
pub use store::{BookStore, SqliteBookStore};
pub use validation::{is_valid_isbn, ValidationError};
