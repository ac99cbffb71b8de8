use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::feedback::prompts::{
    build_feedback_prompt, FEEDBACK_MAX_TOKENS, FEEDBACK_SYSTEM, FEEDBACK_TEMPERATURE,
};
use crate::providers::feedback::{FeedbackGenerator, FeedbackRequest};
use crate::providers::ProviderHttp;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        Some(text)
    }
}

/// Google Gemini `generateContent`. Secondary feedback backend.
pub struct GeminiFeedback {
    http: ProviderHttp,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiFeedback {
    pub fn new(http: ProviderHttp, api_key: String, base_url: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FeedbackGenerator for GeminiFeedback {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_feedback(&self, request: &FeedbackRequest) -> Result<String, ProviderError> {
        let prompt = build_feedback_prompt(request);
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: FEEDBACK_SYSTEM,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: FEEDBACK_TEMPERATURE,
                max_output_tokens: FEEDBACK_MAX_TOKENS,
            },
        };
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response: GenerateContentResponse = self
            .http
            .send_json(self.name(), |client| {
                client
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&body)
            })
            .await?;

        response.text().ok_or(ProviderError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn generator(base_url: String) -> GeminiFeedback {
        let http = ProviderHttp::new()
            .unwrap()
            .with_backoff(Duration::from_millis(1));
        GeminiFeedback::new(
            http,
            "gm-test".to_string(),
            base_url,
            "gemini-2.0-flash".to_string(),
        )
    }

    fn request() -> FeedbackRequest {
        FeedbackRequest::new("Rust dev", "Rust job", 72, 80, 70.0, 60.0, vec![], vec![])
    }

    #[tokio::test]
    async fn test_candidate_parts_are_joined() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_header("x-goog-api-key", "gm-test")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "maxOutputTokens": 800 }
            })))
            .with_status(200)
            .with_body(
                r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "STRENGTHS:"}, {"text": "\n- Rust"}]}}]}"#,
            )
            .create_async()
            .await;

        let text = generator(server.url())
            .generate_feedback(&request())
            .await
            .unwrap();

        assert_eq!(text, "STRENGTHS:\n- Rust");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_blocked_prompt_without_candidates_is_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let err = generator(server.url())
            .generate_feedback(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyContent));
    }
}
