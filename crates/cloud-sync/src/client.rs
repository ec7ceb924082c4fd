//! REST client for the per-account challenge collection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;

use daystreak_core::auth::{AccountSession, SessionProviderTrait};
use daystreak_core::challenges::{Challenge, ChallengeCloudRepositoryTrait};

use crate::dto::ChallengeDocument;
use crate::error::{CloudSyncError, Result};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;

/// Client for the daystreak cloud challenge API.
///
/// Every operation consults the session provider first; without a session
/// it returns a no-op success, so "signed out" never reads as a failure.
#[derive(Clone)]
pub struct ChallengeCloudClient {
    client: reqwest::Client,
    base_url: String,
    sessions: Arc<dyn SessionProviderTrait>,
}

impl ChallengeCloudClient {
    /// Create a new cloud client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the cloud API (e.g., "https://api.daystreak.app")
    /// * `sessions` - Supplier of the current account session
    pub fn new(base_url: &str, sessions: Arc<dyn SessionProviderTrait>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            sessions,
        }
    }

    fn collection_url(&self, user_id: &str) -> String {
        format!("{}/users/{}/challenges", self.base_url, user_id)
    }

    fn document_url(&self, user_id: &str, challenge_id: &str) -> String {
        format!("{}/users/{}/challenges/{}", self.base_url, user_id, challenge_id)
    }

    /// Create headers for an API request.
    fn headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| CloudSyncError::invalid_request("Access token is not header-safe"))?;
        headers.insert(AUTHORIZATION, value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn log_response(status: StatusCode, body: &str) {
        if status.is_success() {
            debug!("API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("API response error ({}): {}", status, preview);
    }

    async fn fetch_documents(&self, session: &AccountSession) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(self.collection_url(&session.user_id))
            .headers(self.headers(&session.access_token)?)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);
        if !status.is_success() {
            return Err(CloudSyncError::api(status.as_u16(), body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn put_document(
        &self,
        session: &AccountSession,
        challenge: &Challenge,
    ) -> Result<()> {
        let document = ChallengeDocument::from_domain(challenge);
        let response = self
            .client
            .put(self.document_url(&session.user_id, &challenge.id))
            .headers(self.headers(&session.access_token)?)
            .json(&document)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);
        if !status.is_success() {
            return Err(CloudSyncError::api(status.as_u16(), body));
        }
        Ok(())
    }

    async fn delete_document(&self, session: &AccountSession, challenge_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.document_url(&session.user_id, challenge_id))
            .headers(self.headers(&session.access_token)?)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);
        // A document that is already gone counts as deleted.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(CloudSyncError::api(status.as_u16(), body));
        }
        Ok(())
    }
}

#[async_trait]
impl ChallengeCloudRepositoryTrait for ChallengeCloudClient {
    async fn fetch_all(&self) -> daystreak_core::Result<Vec<Challenge>> {
        let Some(session) = self.sessions.current_session() else {
            return Ok(Vec::new());
        };

        let documents = match self.fetch_documents(&session).await {
            Ok(documents) => documents,
            Err(err) => {
                error!("Cloud fetch failed: {err}");
                return Err(err.into());
            }
        };

        let mut challenges = Vec::new();
        for value in documents {
            let decoded = serde_json::from_value::<ChallengeDocument>(value.clone())
                .ok()
                .and_then(ChallengeDocument::into_domain);
            match decoded {
                Some(challenge) => challenges.push(challenge),
                None => {
                    let document_id = value.get("id").and_then(Value::as_str).unwrap_or("<unknown>");
                    warn!("Skipping malformed challenge document: {document_id}");
                }
            }
        }
        challenges.sort_by_key(|challenge| challenge.start_date);
        Ok(challenges)
    }

    async fn save(&self, challenge: &Challenge) -> daystreak_core::Result<()> {
        let Some(session) = self.sessions.current_session() else {
            return Ok(());
        };
        if let Err(err) = self.put_document(&session, challenge).await {
            error!("Cloud save failed for {}: {err}", challenge.id);
            return Err(err.into());
        }
        Ok(())
    }

    async fn delete(&self, challenge_id: &str) -> daystreak_core::Result<()> {
        let Some(session) = self.sessions.current_session() else {
            return Ok(());
        };
        if let Err(err) = self.delete_document(&session, challenge_id).await {
            error!("Cloud delete failed for {challenge_id}: {err}");
            return Err(err.into());
        }
        Ok(())
    }
}
