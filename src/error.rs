//! Error types for the shield.

use thiserror::Error;

/// The main error type for shield operations.
///
/// Lookups on absent roles or permissions never fail; they resolve to
/// `false`, `None` or a no-op. Errors are reserved for operations that need
/// an established identity and for collaborator failures.
#[derive(Error, Debug)]
pub enum Error {
    /// An operation needing a current user ran before one was established.
    #[error("No authenticated user: {0}")]
    Unauthenticated(String),

    /// The user provider has no user with the given identifier.
    #[error("User '{0}' not found")]
    UserNotFound(String),

    /// Invalid resource format.
    #[error("Invalid resource format: {0}")]
    InvalidResource(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The user provider failed to load a user.
    #[error("User provider failed: {0}")]
    Provider(String),

    /// Serialization error.
    #[cfg(feature = "persistence")]
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for shield operations.
pub type Result<T> = std::result::Result<T, Error>;
