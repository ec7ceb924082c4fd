//! Challenge table storage: row model, repository, legacy migration.

mod legacy;
mod model;
mod repository;

pub use legacy::migrate_legacy_challenges;
pub use model::ChallengeDB;
pub use repository::ChallengeRepository;

#[cfg(test)]
mod tests;
