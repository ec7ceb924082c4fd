//! Domain models and services for the daystreak challenge engine.
//!
//! The engine keeps three sources of challenge data consistent: the
//! per-device SQLite store, the per-account cloud collection, and a
//! one-time legacy flat-file payload. `ChallengeService` is the single
//! surface the presentation layer talks to.

pub mod auth;
pub mod challenges;
pub mod errors;

pub use errors::{Error, Result};
