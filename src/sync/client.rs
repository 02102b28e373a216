// src/sync/client.rs

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use crate::{error::SyncError, models::participant::ScoreEnvelope};

/// Remote storage of the last quiz score.
#[async_trait]
pub trait ScoreSync: Send + Sync {
    /// Last persisted score, or `None` when the user never took the quiz.
    async fn fetch_score(&self, email: &str) -> Result<Option<u32>, SyncError>;

    async fn save_score(&self, email: &str, score: u32) -> Result<(), SyncError>;
}

/// Tells the server a certificate was issued.
#[async_trait]
pub trait CertificateNotifier: Send + Sync {
    async fn notify_certificate(&self, email: &str) -> Result<(), SyncError>;
}

/// JSON client for the `/api/score` and `/api/certinfo` endpoints.
#[derive(Debug, Clone)]
pub struct HttpScoreClient {
    http: reqwest::Client,
    base: Url,
}

impl HttpScoreClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let mut base = Url::parse(base_url)?;
        // `Url::join` drops the last path segment unless it ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SyncError> {
        Ok(self.base.join(path)?)
    }

    async fn read_envelope(response: reqwest::Response) -> Result<ScoreEnvelope, SyncError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status));
        }
        let envelope: ScoreEnvelope = response.json().await?;
        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Unable to fetch the score".to_string());
            return Err(SyncError::Rejected(message));
        }
        Ok(envelope)
    }
}

#[async_trait]
impl ScoreSync for HttpScoreClient {
    async fn fetch_score(&self, email: &str) -> Result<Option<u32>, SyncError> {
        let url = self.endpoint("api/score")?;
        tracing::debug!("Fetching score for {}", email);

        let response = self.http.get(url).query(&[("email", email)]).send().await?;
        let envelope = Self::read_envelope(response).await?;

        Ok(envelope
            .user_data
            .and_then(|data| data.score)
            .map(|score| u32::try_from(score.max(0)).unwrap_or(u32::MAX)))
    }

    async fn save_score(&self, email: &str, score: u32) -> Result<(), SyncError> {
        let url = self.endpoint("api/score")?;
        tracing::debug!("Saving score {} for {}", score, email);

        let response = self
            .http
            .post(url)
            .json(&json!({ "email": email, "score": score }))
            .send()
            .await?;
        Self::read_envelope(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CertificateNotifier for HttpScoreClient {
    async fn notify_certificate(&self, email: &str) -> Result<(), SyncError> {
        let url = self.endpoint("api/certinfo")?;

        let response = self
            .http
            .post(url)
            .json(&json!({ "email": email }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client =
            HttpScoreClient::new("http://example.test/quiz", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint("api/score").unwrap().as_str(),
            "http://example.test/quiz/api/score"
        );
    }

    #[test]
    fn test_endpoint_on_root() {
        let client = HttpScoreClient::new("http://127.0.0.1:3000", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint("api/certinfo").unwrap().as_str(),
            "http://127.0.0.1:3000/api/certinfo"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpScoreClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SyncError::InvalidUrl(_)));
    }
}
