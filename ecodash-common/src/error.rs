//! Common error types for ecodash

use thiserror::Error;

/// Common result type for ecodash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across ecodash crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collection endpoint read failure (non-fatal; callers keep prior data)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
