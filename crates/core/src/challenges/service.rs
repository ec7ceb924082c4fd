//! Challenge service: the single source of truth the UI observes.
//!
//! Owns the published challenge list for the current owner scope, routes
//! every mutation through the local store, and runs the once-per-sign-in
//! reconciliation pass against the cloud repository.

use std::sync::{Arc, RwLock};

use futures::future::join_all;
use log::{debug, error};

use super::model::{clamp_completed_days, Challenge, MAX_CHALLENGES_PER_SCOPE};
use super::traits::{ChallengeCloudRepositoryTrait, ChallengeRepositoryTrait};

#[derive(Debug, Default)]
struct ScopeState {
    owner: Option<String>,
    challenges: Vec<Challenge>,
    initial_sync_done: bool,
}

/// Orchestrates the local store, the cloud repository, and the identity
/// signal. Constructed once at the composition root and shared behind an
/// `Arc`; the published list is always a materialization of the last
/// successful local read, never an optimistic in-memory delta.
pub struct ChallengeService {
    local: Arc<dyn ChallengeRepositoryTrait>,
    cloud: Arc<dyn ChallengeCloudRepositoryTrait>,
    state: RwLock<ScopeState>,
}

impl ChallengeService {
    /// Creates the service in the anonymous scope and loads its records.
    pub fn new(
        local: Arc<dyn ChallengeRepositoryTrait>,
        cloud: Arc<dyn ChallengeCloudRepositoryTrait>,
    ) -> Self {
        let service = Self {
            local,
            cloud,
            state: RwLock::new(ScopeState::default()),
        };
        service.reload();
        service
    }

    /// Snapshot of the published list for the current owner scope.
    pub fn challenges(&self) -> Vec<Challenge> {
        self.state.read().unwrap().challenges.clone()
    }

    /// The active owner scope; `None` while signed out.
    pub fn current_owner(&self) -> Option<String> {
        self.state.read().unwrap().owner.clone()
    }

    /// Whether the reconciliation pass has completed for this sign-in.
    pub fn has_performed_initial_sync(&self) -> bool {
        self.state.read().unwrap().initial_sync_done
    }

    /// Re-derives the published list from storage. A read failure logs
    /// and publishes an empty list rather than propagating.
    pub fn reload(&self) {
        let mut state = self.state.write().unwrap();
        let owner = state.owner.clone();
        state.challenges = self.list_for(owner.as_deref());
    }

    /// Call on every distinct identity-signal change. Re-scopes the local
    /// store, re-reads the published list, and when entering a signed-in
    /// scope kicks off one reconciliation pass. Re-entry with the current
    /// owner is a no-op.
    pub async fn switch_to_user(&self, user_id: Option<String>) {
        {
            let mut state = self.state.write().unwrap();
            if state.owner == user_id {
                return;
            }
            state.initial_sync_done = false;
            state.owner = user_id.clone();
            state.challenges = self.list_for(user_id.as_deref());
        }

        if let Some(uid) = user_id {
            self.perform_initial_sync(&uid).await;
        }
    }

    /// Inserts a challenge into the active scope. Returns `false` without
    /// writing when the scope already holds the cap; the incoming
    /// completed set is clamped to the valid day range either way.
    pub async fn add(&self, mut challenge: Challenge) -> bool {
        let owner = {
            let state = self.state.read().unwrap();
            if state.challenges.len() >= MAX_CHALLENGES_PER_SCOPE {
                return false;
            }
            state.owner.clone()
        };

        challenge.completed_days =
            clamp_completed_days(challenge.completed_days.iter().map(|&day| i64::from(day)));
        if let Err(err) = self.local.insert(owner.as_deref(), challenge).await {
            error!("Failed to insert challenge: {err}");
        }
        self.reload();
        true
    }

    /// Full-record overwrite by id within the active scope.
    pub async fn update(&self, challenge: Challenge) {
        let owner = self.current_owner();
        if let Err(err) = self.local.update(owner.as_deref(), challenge).await {
            error!("Failed to update challenge: {err}");
        }
        self.reload();
    }

    /// Removes a challenge from the active scope by id.
    pub async fn delete(&self, challenge_id: &str) {
        let owner = self.current_owner();
        if let Err(err) = self.local.delete(owner.as_deref(), challenge_id).await {
            error!("Failed to delete challenge: {err}");
        }
        self.reload();
    }

    /// Flips membership of `day` in the record's completed set.
    pub async fn toggle_day(&self, challenge_id: &str, day: u32) {
        let Some(mut challenge) = self.find(challenge_id) else {
            return;
        };
        if !challenge.completed_days.remove(&day) {
            challenge.completed_days.insert(day);
        }
        self.update(challenge).await;
    }

    /// Marks `day` completed; idempotent, never removes.
    pub async fn complete_day(&self, challenge_id: &str, day: u32) {
        let Some(mut challenge) = self.find(challenge_id) else {
            return;
        };
        challenge.completed_days.insert(day);
        self.update(challenge).await;
    }

    fn find(&self, challenge_id: &str) -> Option<Challenge> {
        self.state
            .read()
            .unwrap()
            .challenges
            .iter()
            .find(|challenge| challenge.id == challenge_id)
            .cloned()
    }

    fn list_for(&self, owner: Option<&str>) -> Vec<Challenge> {
        match self.local.list(owner) {
            Ok(challenges) => challenges,
            Err(err) => {
                error!("Failed to load challenges: {err}");
                Vec::new()
            }
        }
    }

    /// One reconciliation pass for `user_id`, run once per sign-in.
    ///
    /// Remote is authoritative once non-empty; an empty remote receives
    /// every local record instead. A fetch failure aborts the pass with
    /// local data left visible, and a pass whose target owner no longer
    /// matches the active owner (the user switched again mid-flight) is
    /// discarded.
    async fn perform_initial_sync(&self, user_id: &str) {
        let remote = match self.cloud.fetch_all().await {
            Ok(remote) => remote,
            Err(err) => {
                error!("Initial sync failed: {err}");
                return;
            }
        };

        let local = {
            let state = self.state.read().unwrap();
            if state.owner.as_deref() != Some(user_id) {
                debug!("Discarding stale sync pass for {user_id}");
                return;
            }
            state.challenges.clone()
        };

        if remote.is_empty() && !local.is_empty() {
            self.upload_local_to_cloud(&local).await;
            self.mark_sync_done_if_current(user_id);
        } else if !remote.is_empty() {
            if let Err(err) = self
                .local
                .replace_all_in_scope(Some(user_id), remote)
                .await
            {
                error!("Failed to replace local challenges from cloud: {err}");
            }
            let mut state = self.state.write().unwrap();
            if state.owner.as_deref() == Some(user_id) {
                state.initial_sync_done = true;
                state.challenges = self.list_for(Some(user_id));
            }
        } else {
            debug!("Initial sync: both sides empty, nothing to move");
            self.mark_sync_done_if_current(user_id);
        }
    }

    /// Uploads every local record; an individual failure is logged and
    /// does not block the others. Resolves only after all uploads settle.
    async fn upload_local_to_cloud(&self, local: &[Challenge]) {
        let uploads = local.iter().map(|challenge| async move {
            if let Err(err) = self.cloud.save(challenge).await {
                error!("Failed to upload challenge {}: {err}", challenge.id);
            }
        });
        join_all(uploads).await;
    }

    fn mark_sync_done_if_current(&self, user_id: &str) {
        let mut state = self.state.write().unwrap();
        if state.owner.as_deref() == Some(user_id) {
            state.initial_sync_done = true;
        }
    }
}
