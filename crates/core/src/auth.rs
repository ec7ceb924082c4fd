//! Identity seam supplied by the authentication collaborator.

/// A signed-in account as reported by the auth subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSession {
    /// Stable account identifier; also the cloud collection key.
    pub user_id: String,
    /// Bearer token for the cloud API.
    pub access_token: String,
}

/// Provides the current account session, if any.
///
/// The cloud repository consults this on every call; a missing session
/// makes cloud operations succeed as no-ops rather than fail.
pub trait SessionProviderTrait: Send + Sync {
    fn current_session(&self) -> Option<AccountSession>;
}
