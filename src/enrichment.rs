//! Deferred payload enrichment.
//!
//! After a user is created, a background task fetches the configured
//! remote resource, substitutes every `{user}` placeholder with the new
//! user's identifier and stores the parsed result on the user record.
//! Callers never wait on the task; failures are logged and recorded on the
//! record as `failed`.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::config::Enrichment;
use crate::user::{EnrichmentStatus, UserRepository};

/// Token replaced by the user identifier in the fetched body.
pub const USER_PLACEHOLDER: &str = "{user}";

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("fetching enrichment source failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("enrichment source is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("storing derived payload failed: {0}")]
    Store(#[from] crate::error::ServerError),
}

/// Fetches and stores derived payloads for new users.
#[derive(Clone)]
pub struct Enricher {
    http: reqwest::Client,
    repo: UserRepository,
    url: String,
    retry: bool,
}

impl Enricher {
    /// Create a new [`Enricher`] with a bounded request timeout.
    pub fn new(config: &Enrichment, repo: UserRepository) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            repo,
            url: config.url.clone(),
            retry: config.retry,
        })
    }

    /// Schedule enrichment for `user_id` without blocking the caller.
    pub fn spawn(&self, user_id: Uuid) {
        let task = self.clone();
        tokio::spawn(async move {
            if let Err(err) = task.run(user_id).await {
                tracing::error!(%user_id, error = %err, "enrichment failed");
                if let Err(err) = task
                    .repo
                    .set_enrichment_status(user_id, EnrichmentStatus::Failed)
                    .await
                {
                    tracing::error!(%user_id, error = %err, "cannot record enrichment failure");
                }
            }
        });
    }

    async fn run(&self, user_id: Uuid) -> Result<(), EnrichmentError> {
        let body = match self.fetch().await {
            Ok(body) => body,
            Err(err) if self.retry => {
                tracing::warn!(%user_id, error = %err, "enrichment fetch failed, retrying once");
                self.fetch().await?
            },
            Err(err) => return Err(err.into()),
        };

        let body = body.replace(USER_PLACEHOLDER, &user_id.to_string());
        let payload: serde_json::Value = serde_json::from_str(&body)?;
        self.repo.store_payload(user_id, &payload).await?;

        Ok(())
    }

    async fn fetch(&self) -> Result<String, reqwest::Error> {
        self.http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}
