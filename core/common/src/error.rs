//! Common error types for drivectl.

use thiserror::Error;

/// Top-level error type for drivectl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Client identity or token cache file is missing or malformed.
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Interactive grant or authorization-code exchange failed.
    #[error("Grant error: {0}")]
    Grant(String),

    /// Remote upload call failed.
    #[error("Upload error: {0}")]
    Upload(String),

    /// Remote listing call failed.
    #[error("List error: {0}")]
    List(String),

    /// Bearer token rejected by the remote API.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network or remote API failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
