//! Error types for ephemail.

use thiserror::Error;

/// Common error type for ephemail.
#[derive(Error, Debug)]
pub enum EphemailError {
    /// Database error.
    ///
    /// Generic database error wrapping failures reported by sqlx.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// Unique-constraint violation on insert.
    ///
    /// Raised when a domain name or a (local part, domain) pair is
    /// persisted twice. This is the only error class that administrative
    /// callers are expected to handle explicitly.
    #[error("already exists: {0}")]
    Duplicate(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for administrative input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Inbound message could not be parsed.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// A mapping has no owning user, so the message cannot be forwarded.
    #[error("mapping {0} has no owning user")]
    MissingOwner(i64),

    /// SMTP transport failure (connect, protocol or timeout).
    #[error("transport error: {0}")]
    Transport(String),
}

// Unique-constraint violations keep their identity so administrative
// callers can distinguish them from infrastructure failures.
impl From<sqlx::Error> for EphemailError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return EphemailError::Duplicate(db_err.to_string());
            }
        }
        EphemailError::Database(e.to_string())
    }
}

/// Result type alias for ephemail operations.
pub type Result<T> = std::result::Result<T, EphemailError>;
