//! Repository Module
//!
//! Single-purpose queries as free functions over `&SqlitePool`. Functions that
//! take a `&mut SqliteConnection` are meant to run inside a caller's
//! transaction (`&mut *tx`).

pub mod crates;
pub mod customer;
pub mod order;
pub mod pallet;
pub mod report;
pub mod shelf;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// `?, ?, ?` for a dynamic `IN (...)` list
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}
