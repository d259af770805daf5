//! Error types for sift-db.

use miette::Diagnostic;
use sift_config::ConfigError;
use thiserror::Error;

/// Database error type for sift-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    #[diagnostic(
        code(sift_db::connection),
        help("Check if the database file exists and is accessible")
    )]
    ConnectionError(String),

    #[error("Database query failed: {0}")]
    #[diagnostic(code(sift_db::query))]
    QueryError(String),

    #[error("Statement expects {expected} parameters but {bound} were bound")]
    #[diagnostic(
        code(sift_db::parameter_mismatch),
        help("Placeholders in raw SQL must line up with the clause values")
    )]
    ParameterMismatch { expected: usize, bound: usize },

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(sift_db::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Database connection lock was poisoned")]
    #[diagnostic(code(sift_db::lock_poisoned))]
    LockPoisoned,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(message)) => DbError::QueryError(message),
            other => DbError::QueryError(other.to_string()),
        }
    }
}

/// Result type alias for sift-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
