//! Server lifecycle errors (startup, bind, serve)

use thiserror::Error;

use crate::utils::AppError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database unavailable: {0}")]
    Database(#[from] AppError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
