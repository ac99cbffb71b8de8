//! Outbound provider plumbing: the single point of entry for every external HTTP call.
//!
//! RULE: embedding and feedback adapters never build their own `reqwest::Client`; they go
//! through `ProviderHttp`, which owns timeouts, retries and error-body parsing.
//!
//! Retries live here, in the collaborator's client. The scoring pipeline never retries.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};

use crate::errors::ProviderError;

pub mod embedding;
pub mod feedback;

const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(1000);
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Error payloads seen across providers: `{"error": {"message": ..}}` (OpenAI, Groq,
/// Gemini) and `{"error": ".."}` (HuggingFace).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProviderErrorBody {
    Nested { error: ProviderErrorMessage },
    Flat { error: String },
}

#[derive(Debug, Deserialize)]
struct ProviderErrorMessage {
    message: String,
}

impl ProviderErrorBody {
    fn into_message(self) -> String {
        match self {
            ProviderErrorBody::Nested { error } => error.message,
            ProviderErrorBody::Flat { error } => error,
        }
    }
}

/// Shared HTTP client for all providers, with retry on 429 / 5xx / transport errors.
#[derive(Clone)]
pub struct ProviderHttp {
    client: Client,
    backoff: Duration,
}

impl ProviderHttp {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Base delay of the exponential backoff (`backoff`, `2 × backoff`, ...).
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sends the request built by `build` and decodes a JSON success body into `T`.
    ///
    /// `build` is called once per attempt since a sent `RequestBuilder` cannot be replayed.
    pub async fn send_json<T, F>(&self, provider: &str, build: F) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut last_error: Option<ProviderError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = self.backoff * (1 << (attempt - 1));
                warn!(
                    "{provider} call attempt {attempt} failed, retrying after {}ms...",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match build(&self.client).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ProviderError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("{provider} returned {status}: {body}");
                last_error = Some(ProviderError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            let body = response.text().await?;

            if !status.is_success() {
                let message = serde_json::from_str::<ProviderErrorBody>(&body)
                    .map(ProviderErrorBody::into_message)
                    .unwrap_or(body);
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!("{provider} call succeeded ({} bytes)", body.len());

            return serde_json::from_str(&body)
                .map_err(|e| ProviderError::Malformed(format!("{provider}: {e}")));
        }

        Err(last_error.unwrap_or(ProviderError::Api {
            status: 429,
            message: format!("gave up after {MAX_ATTEMPTS} attempts"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::Value;

    fn http() -> ProviderHttp {
        ProviderHttp::new()
            .unwrap()
            .with_backoff(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_success_body_is_decoded() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/ok")
            .with_status(200)
            .with_body(r#"{"value": 7}"#)
            .create_async()
            .await;

        let url = format!("{}/ok", server.url());
        let body: Value = http()
            .send_json("test", |c| c.post(&url))
            .await
            .unwrap();

        assert_eq!(body["value"], 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_then_reported() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/flaky")
            .with_status(503)
            .with_body("overloaded")
            .expect(3)
            .create_async()
            .await;

        let url = format!("{}/flaky", server.url());
        let err = http()
            .send_json::<Value, _>("test", |c| c.post(&url))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Api { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/denied")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Invalid API key"}}"#)
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/denied", server.url());
        let err = http()
            .send_json::<Value, _>("test", |c| c.post(&url))
            .await
            .unwrap_err();

        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_flat_error_body_is_parsed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/hf")
            .with_status(400)
            .with_body(r#"{"error": "Model is loading"}"#)
            .create_async()
            .await;

        let url = format!("{}/hf", server.url());
        let err = http()
            .send_json::<Value, _>("test", |c| c.post(&url))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "API error (status 400): Model is loading");
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/garbage")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let url = format!("{}/garbage", server.url());
        let err = http()
            .send_json::<Value, _>("test", |c| c.post(&url))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
