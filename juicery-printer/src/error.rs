//! Error types for the printer adapter

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error while talking to the printer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout connecting to the printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Printer answered a command with something other than ACK
    #[error("Printer rejected `{command}`: {reply}")]
    Rejected { command: String, reply: String },

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl PrintError {
    /// True when the printer could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, PrintError::Connection(_) | PrintError::Timeout(_))
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
