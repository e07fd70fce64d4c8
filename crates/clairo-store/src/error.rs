//! Error types for the store module.

use clairo_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// None of these are caller errors: a duplicate media hash is reported
/// through [`CommitOutcome::Duplicate`](crate::CommitOutcome), not here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored record failed to decode or verify.
    #[error("corrupt record: {0}")]
    Corrupt(#[from] CoreError),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// A blocking storage task failed to complete.
    #[error("storage task failed: {0}")]
    Task(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
