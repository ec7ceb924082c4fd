//! Storage error types and their conversion into the core error.

use daystreak_core::errors::{DatabaseError, Error};
use thiserror::Error;

/// Errors raised inside the SQLite storage crate.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A query or statement failed
    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Pool(inner) => Error::Database(DatabaseError::Pool(inner.to_string())),
            StorageError::Query(inner) => Error::Database(DatabaseError::Query(inner.to_string())),
        }
    }
}
