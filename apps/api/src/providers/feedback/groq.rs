use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::feedback::prompts::{
    build_feedback_prompt, FEEDBACK_MAX_TOKENS, FEEDBACK_SYSTEM, FEEDBACK_TEMPERATURE,
};
use crate::providers::feedback::{FeedbackGenerator, FeedbackRequest};
use crate::providers::ProviderHttp;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Groq chat completions (OpenAI-compatible). Primary feedback backend.
pub struct GroqFeedback {
    http: ProviderHttp,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqFeedback {
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
impl FeedbackGenerator for GroqFeedback {
    fn name(&self) -> &str {
        "groq"
    }

    async fn generate_feedback(&self, request: &FeedbackRequest) -> Result<String, ProviderError> {
        let prompt = build_feedback_prompt(request);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: FEEDBACK_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: FEEDBACK_TEMPERATURE,
            max_tokens: FEEDBACK_MAX_TOKENS,
        };
        let url = format!("{}/chat/completions", self.base_url);

        let response: ChatCompletionResponse = self
            .http
            .send_json(self.name(), |client| {
                client.post(&url).bearer_auth(&self.api_key).json(&body)
            })
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ProviderError::EmptyContent)
    }
}
