//! HTTP implementation of the push provider seam.
//!
//! [`HttpPushGateway`] talks to the external push gateway over JSON. Each
//! call carries an explicit request timeout so a stalled gateway cannot
//! wedge a scan loop.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::envelope::PushEnvelope;
use crate::provider::{BatchOutcome, ProviderError, PushProvider};

/// HTTP request timeout for a single gateway call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response body of a message send.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: String,
}

/// Response body of a topic-membership batch call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponse {
    success_count: u64,
    failure_count: u64,
}

/// Push provider backed by the external HTTP gateway.
pub struct HttpPushGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpPushGateway {
    /// Create a gateway client for `base_url`, optionally authenticating
    /// with a bearer key.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Execute a POST and deserialize the 2xx body, mapping non-2xx
    /// statuses to [`ProviderError::HttpStatus`].
    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl serde::Serialize,
    ) -> Result<T, ProviderError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.post(&url).json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus(status.as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl PushProvider for HttpPushGateway {
    async fn send(&self, envelope: &PushEnvelope) -> Result<String, ProviderError> {
        let response: SendResponse = self.post_json("/v1/messages", envelope).await?;
        Ok(response.message_id)
    }

    async fn subscribe_batch(
        &self,
        tokens: &[String],
        topic: &str,
    ) -> Result<BatchOutcome, ProviderError> {
        let payload = serde_json::json!({ "tokens": tokens });
        let response: BatchResponse = self
            .post_json(&format!("/v1/topics/{topic}/subscriptions"), &payload)
            .await?;
        Ok(BatchOutcome {
            success_count: response.success_count,
            failure_count: response.failure_count,
        })
    }

    async fn unsubscribe_batch(
        &self,
        tokens: &[String],
        topic: &str,
    ) -> Result<BatchOutcome, ProviderError> {
        let payload = serde_json::json!({ "tokens": tokens });
        let response: BatchResponse = self
            .post_json(&format!("/v1/topics/{topic}/subscriptions:remove"), &payload)
            .await?;
        Ok(BatchOutcome {
            success_count: response.success_count,
            failure_count: response.failure_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _gateway = HttpPushGateway::new("https://push.example.com", None);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let gateway = HttpPushGateway::new("https://push.example.com/", None);
        assert_eq!(gateway.base_url, "https://push.example.com");
    }

    #[test]
    fn batch_response_deserializes_camel_case() {
        let parsed: BatchResponse =
            serde_json::from_str(r#"{"successCount": 7, "failureCount": 2}"#).unwrap();
        assert_eq!(parsed.success_count, 7);
        assert_eq!(parsed.failure_count, 2);
    }
}
