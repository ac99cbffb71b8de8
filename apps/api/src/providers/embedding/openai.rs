use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::truncate_chars;
use crate::errors::ProviderError;
use crate::providers::embedding::{EmbeddingProvider, EmbeddingVector};
use crate::providers::ProviderHttp;

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible `/embeddings` endpoint (secondary embedding provider).
pub struct OpenAiEmbedder {
    http: ProviderHttp,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(http: ProviderHttp, api_key: String, base_url: String, model: String) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn name(&self) -> &str {
        "openai"
    }

    async fn embed(
        &self,
        text: &str,
        max_input_chars: usize,
    ) -> Result<EmbeddingVector, ProviderError> {
        let body = EmbeddingsRequest {
            model: &self.model,
            input: truncate_chars(text, max_input_chars),
        };
        let url = format!("{}/embeddings", self.base_url);

        let response: EmbeddingsResponse = self
            .http
            .send_json(self.name(), |client| {
                client.post(&url).bearer_auth(&self.api_key).json(&body)
            })
            .await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ProviderError::Malformed("no embedding in response data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn embedder(base_url: String) -> OpenAiEmbedder {
        let http = ProviderHttp::new()
            .unwrap()
            .with_backoff(Duration::from_millis(1));
        OpenAiEmbedder::new(
            http,
            "sk-test".to_string(),
            base_url,
            "text-embedding-3-small".to_string(),
        )
    }

    #[tokio::test]
    async fn test_embedding_is_read_from_data() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "model": "text-embedding-3-small",
                "input": "Kafka"
            })))
            .with_status(200)
            .with_body(r#"{"data": [{"embedding": [0.25, -0.5], "index": 0}], "model": "text-embedding-3-small"}"#)
            .create_async()
            .await;

        let vector = embedder(server.url()).embed("Kafka", 5000).await.unwrap();

        assert_eq!(vector, vec![0.25, -0.5]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_data_is_malformed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;

        let err = embedder(server.url()).embed("Kafka", 5000).await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_quota_error_surfaces_provider_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(403)
            .with_body(r#"{"error": {"message": "You exceeded your current quota", "type": "insufficient_quota"}}"#)
            .create_async()
            .await;

        let err = embedder(server.url()).embed("Kafka", 5000).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error (status 403): You exceeded your current quota"
        );
    }
}
