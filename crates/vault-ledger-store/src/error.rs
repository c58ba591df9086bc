//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The appended record's declared predecessor does not match the
    /// current tip. This is the store-level backstop against interleaved
    /// admissions: it means the engine's critical section was bypassed
    /// or contended.
    #[error("tip mismatch: declared prev {declared}, current tip {current}")]
    TipMismatch { declared: String, current: String },

    /// Invalid data in storage (e.g. a digest column that is not 64 hex).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The blocking task running a database operation failed.
    #[error("blocking task failed: {0}")]
    Blocking(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
