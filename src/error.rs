//! Error types shared by the catalog core. Expected outcomes (bad input, a
//! missing record, a non-owner trying to edit) are ordinary variants so the
//! front end can match on them; only storage problems come from outside.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Failures raised by a [`crate::db::BlobStore`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a rejected catalog operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Book {0} not found")]
    NotFound(String),

    #[error("Book {id} can only be changed by its creator (requested by {requester})")]
    NotOwner { id: String, requester: String },

    #[error("failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to persist catalog: {0}")]
    Storage(#[from] StorageError),
}

impl CatalogError {
    /// Field-keyed messages when the failure came from validation.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            CatalogError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// True for the two "silently refuse" outcomes: unknown id or wrong owner.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            CatalogError::NotFound(_) | CatalogError::NotOwner { .. }
        )
    }
}

/// Failures raised by [`crate::auth::AuthService`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter both username and password")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("failed to encode identity: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to persist identity: {0}")]
    Storage(#[from] StorageError),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
