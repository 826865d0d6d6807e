//! Error types for StateDb.
//!
//! Missing or invalid stored data is never an error; it is repaired by the
//! initializer. What remains are failures of the store itself.

use statedb_store::StoreError;
use thiserror::Error;

/// Errors that can occur during StateDb operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// The underlying store failed to read, write or commit.
    #[error("store I/O error: {0}")]
    StoreIo(#[from] StoreError),

    /// A blocking task running a database call panicked or was cancelled.
    #[error("database task failed: {0}")]
    Task(String),
}

/// Result type for StateDb operations.
pub type Result<T> = std::result::Result<T, DbError>;
