//! Cloud repository for the per-account challenge collection.
//!
//! Talks to the daystreak cloud API over REST; documents live under
//! `users/{uid}/challenges/{challengeId}` and the challenge id doubles as
//! the document id.

mod client;
mod dto;
mod error;

pub use client::ChallengeCloudClient;
pub use dto::ChallengeDocument;
pub use error::{CloudSyncError, Result};
