//! Storage error types shared by the services

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while opening the pool
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while applying schema migrations
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Invalid database settings
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Whether the underlying driver reported a `UNIQUE` constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Query(SqlxError::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
