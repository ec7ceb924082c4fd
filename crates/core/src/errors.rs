//! Shared error types across the daystreak crates.

use thiserror::Error;

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Local storage failures, reported by the storage crate.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection pool exhausted or unavailable
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// A query or statement failed
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed at store initialization
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Writer task or other storage-internal failure
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Errors that can occur inside the challenge engine.
///
/// Nothing here is ever surfaced to the end user; callers log at the
/// boundary and degrade (empty reads, writes that simply do not appear
/// in the next re-read).
#[derive(Debug, Error)]
pub enum Error {
    /// Local store failure
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Cloud repository failure (network, auth, or API error)
    #[error("Cloud sync error: {0}")]
    Cloud(String),
}
