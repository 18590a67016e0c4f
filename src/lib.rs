//! Core library surface for the Library Catalog manager.
//!
//! The catalog state and query engine live here so the terminal front end,
//! tests and any other tooling share the same rules. The binary only wires a
//! blob store, logging and the UI together.
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod ui;
pub mod validation;

/// Persistence entry points used by `main.rs` and the tests.
pub use db::{ensure_schema, open_in_memory, BlobStore, MemoryBlobStore, SqliteBlobStore};

/// The catalog and sign-in services.
pub use auth::{AcceptAnyCredentials, AuthService, CredentialVerifier};
pub use catalog::{can_edit, CatalogStore};

/// Domain types that other layers manipulate.
pub use error::{AuthError, CatalogError, StorageError};
pub use models::{BookFormData, BookPatch, BookRecord, GenreCount, Role, UserIdentity};
pub use query::{filter_books, CatalogQuery, GenreFilter};
pub use validation::{BookField, ValidationErrors};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
