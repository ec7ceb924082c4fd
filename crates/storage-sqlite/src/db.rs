//! Connection pool and write serialization for the SQLite store.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::sync::Mutex;

use daystreak_core::errors::{DatabaseError, Result};

use crate::errors::StorageError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Builds the read pool for the given database URL.
pub fn create_pool(database_url: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|err| DatabaseError::Pool(err.to_string()))?;
    Ok(Arc::new(pool))
}

pub fn get_connection(pool: &Arc<DbPool>) -> Result<DbConnection> {
    pool.get()
        .map_err(|err| DatabaseError::Pool(err.to_string()).into())
}

/// Applies pragmas and any pending embedded migrations.
pub fn run_migrations(pool: &Arc<DbPool>) -> Result<()> {
    let mut conn = get_connection(pool)?;
    conn.batch_execute("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
        .map_err(StorageError::from)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| DatabaseError::Migration(err.to_string()))?;
    Ok(())
}

/// Serializes writes through a single logical writer and runs them on the
/// blocking thread pool, keeping disk I/O off the caller's task.
#[derive(Clone)]
pub struct WriteHandle {
    pool: Arc<DbPool>,
    write_lock: Arc<Mutex<()>>,
}

impl WriteHandle {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Runs `job` with a pooled connection while holding the writer lock.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let mut conn = get_connection(&pool)?;
            job(&mut conn)
        })
        .await
        .map_err(|err| DatabaseError::Internal(err.to_string()))?
    }
}
