use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use review_common::error::{CycleError, RemoteError};

/// Source of raw review status payloads.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch statuses updated since `from_date` (unix seconds).
    ///
    /// The payload is returned as decoded JSON without any shape checks.
    async fn fetch(&self, from_date: i64) -> Result<Value, CycleError>;
}

/// Review API client over HTTP.
pub struct HttpStatusSource {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpStatusSource {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CycleError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self, from_date: i64) -> Result<Value, CycleError> {
        tracing::debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(payload)
    }
}
