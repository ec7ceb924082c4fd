//! Repository contracts implemented by the storage and cloud crates.

use async_trait::async_trait;

use crate::errors::Result;

use super::model::Challenge;

/// On-device challenge storage, partitioned by owner scope.
///
/// `owner` is the partition key: a signed-in account id, or `None` for
/// legacy/anonymous records. Reads are synchronous (the store is local
/// and fast); writes run through the storage crate's writer off the
/// caller's thread.
#[async_trait]
pub trait ChallengeRepositoryTrait: Send + Sync {
    /// All records in the scope, ordered by start date ascending.
    fn list(&self, owner: Option<&str>) -> Result<Vec<Challenge>>;

    /// Persists a new record tagged with `owner`. The caller pre-checks
    /// the per-scope record cap.
    async fn insert(&self, owner: Option<&str>, challenge: Challenge) -> Result<()>;

    /// Overwrites the record matching id and owner; no-op without a match.
    async fn update(&self, owner: Option<&str>, challenge: Challenge) -> Result<()>;

    /// Removes the record matching id and owner; no-op without a match.
    async fn delete(&self, owner: Option<&str>, challenge_id: &str) -> Result<()>;

    /// Atomically deletes every record in the scope and inserts the given
    /// set in its place. Only the sync pass's remote-authoritative branch
    /// uses this.
    async fn replace_all_in_scope(
        &self,
        owner: Option<&str>,
        challenges: Vec<Challenge>,
    ) -> Result<()>;
}

/// Per-account cloud document collection for challenges.
///
/// Every operation is a no-op success when no account session exists;
/// "not signed in" is never an error here.
#[async_trait]
pub trait ChallengeCloudRepositoryTrait: Send + Sync {
    /// Fetches all documents for the current account, ordered by start
    /// date ascending. Malformed documents are skipped individually.
    async fn fetch_all(&self) -> Result<Vec<Challenge>>;

    /// Upserts one document keyed by the challenge id.
    async fn save(&self, challenge: &Challenge) -> Result<()>;

    /// Deletes one document by challenge id.
    async fn delete(&self, challenge_id: &str) -> Result<()>;
}
