//! SQLite storage for the daystreak challenge engine.
//!
//! One `challenges` table partitioned by an optional `owner_id`, plus the
//! one-time migration away from the deprecated flat-file payload.

pub mod challenges;
pub mod db;
pub mod errors;
pub mod schema;

use std::path::Path;
use std::sync::Arc;

use daystreak_core::Result;

pub use challenges::{migrate_legacy_challenges, ChallengeRepository};
pub use db::{create_pool, run_migrations, DbPool, WriteHandle};
pub use errors::StorageError;

/// Opens the store end to end: pool, schema migrations, then the one-time
/// legacy flat-file migration before any other component reads the store.
pub fn open_store(database_url: &str, legacy_path: Option<&Path>) -> Result<ChallengeRepository> {
    let pool = db::create_pool(database_url)?;
    db::run_migrations(&pool)?;
    if let Some(path) = legacy_path {
        let mut conn = db::get_connection(&pool)?;
        challenges::migrate_legacy_challenges(&mut conn, path)?;
    }
    let writer = WriteHandle::new(Arc::clone(&pool));
    Ok(ChallengeRepository::new(pool, writer))
}
