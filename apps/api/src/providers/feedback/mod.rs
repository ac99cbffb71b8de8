//! Feedback generation: turns already-computed scores into prose.
//!
//! The only non-deterministic part of an analysis. Nothing numeric depends on it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::analysis::tokenizer::truncate_chars;
use crate::errors::ProviderError;

pub mod gemini;
pub mod groq;
pub mod prompts;

pub use gemini::GeminiFeedback;
pub use groq::GroqFeedback;

/// Character budget for each excerpt quoted in the feedback prompt.
pub const MAX_FEEDBACK_EXCERPT_CHARS: usize = 2000;

/// Returned in place of generated feedback when no provider succeeds.
pub const FALLBACK_FEEDBACK: &str = "Unable to generate detailed feedback.";

/// Everything a generator may quote. Excerpts are truncated on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRequest {
    pub resume_excerpt: String,
    pub job_excerpt: String,
    pub score: u8,
    pub semantic_score: u8,
    pub keyword_score: f64,
    pub skill_score: f64,
    pub missing_skills: Vec<String>,
    pub missing_keywords: Vec<String>,
}

impl FeedbackRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resume_text: &str,
        job_text: &str,
        score: u8,
        semantic_score: u8,
        keyword_score: f64,
        skill_score: f64,
        missing_skills: Vec<String>,
        missing_keywords: Vec<String>,
    ) -> Self {
        Self {
            resume_excerpt: truncate_chars(resume_text, MAX_FEEDBACK_EXCERPT_CHARS).to_string(),
            job_excerpt: truncate_chars(job_text, MAX_FEEDBACK_EXCERPT_CHARS).to_string(),
            score,
            semantic_score,
            keyword_score,
            skill_score,
            missing_skills,
            missing_keywords,
        }
    }
}

/// Capability: one call, one piece of prose.
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate_feedback(&self, request: &FeedbackRequest) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFeedback {
    pub provider: String,
    pub text: String,
}

/// Generators tried in priority order; the first non-empty answer wins.
#[derive(Clone)]
pub struct FeedbackChain {
    generators: Vec<Arc<dyn FeedbackGenerator>>,
    timeout: Duration,
}

impl FeedbackChain {
    pub fn new(generators: Vec<Arc<dyn FeedbackGenerator>>, timeout: Duration) -> Self {
        Self {
            generators,
            timeout,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    pub async fn generate(&self, request: &FeedbackRequest) -> Result<GeneratedFeedback, ProviderError> {
        let mut last_error = ProviderError::NotConfigured;

        for generator in &self.generators {
            let attempt = tokio::time::timeout(self.timeout, generator.generate_feedback(request))
                .await
                .map_err(|_| ProviderError::Timeout(self.timeout))
                .and_then(|result| result);

            match attempt {
                Ok(text) if !text.trim().is_empty() => {
                    info!(provider = generator.name(), "feedback generated");
                    return Ok(GeneratedFeedback {
                        provider: generator.name().to_string(),
                        text: text.trim().to_string(),
                    });
                }
                Ok(_) => {
                    warn!(provider = generator.name(), "feedback provider returned empty text");
                    last_error = ProviderError::EmptyContent;
                }
                Err(e) => {
                    warn!(provider = generator.name(), "feedback provider failed: {e}");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CannedFeedback;
    use super::*;

    fn request() -> FeedbackRequest {
        FeedbackRequest::new("resume", "job", 70, 80, 60.0, 50.0, vec![], vec![])
    }

    fn chain(generators: Vec<Arc<dyn FeedbackGenerator>>) -> FeedbackChain {
        FeedbackChain::new(generators, Duration::from_secs(5))
    }

    #[test]
    fn test_request_truncates_excerpts() {
        let long = "x".repeat(MAX_FEEDBACK_EXCERPT_CHARS + 500);
        let request = FeedbackRequest::new(&long, "short", 0, 0, 0.0, 0.0, vec![], vec![]);
        assert_eq!(request.resume_excerpt.chars().count(), MAX_FEEDBACK_EXCERPT_CHARS);
        assert_eq!(request.job_excerpt, "short");
    }

    #[tokio::test]
    async fn test_empty_chain_is_not_configured() {
        let err = chain(vec![]).generate(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured));
    }

    #[tokio::test]
    async fn test_primary_answer_wins_and_secondary_is_not_called() {
        let primary = Arc::new(CannedFeedback::ok("groq", "STRENGTHS:\n- Rust"));
        let secondary = Arc::new(CannedFeedback::ok("gemini", "other"));

        let feedback = chain(vec![primary.clone(), secondary.clone()])
            .generate(&request())
            .await
            .unwrap();

        assert_eq!(feedback.provider, "groq");
        assert_eq!(feedback.text, "STRENGTHS:\n- Rust");
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_on_failure() {
        let feedback = chain(vec![
            Arc::new(CannedFeedback::failing("groq", 500)),
            Arc::new(CannedFeedback::ok("gemini", "fine")),
        ])
        .generate(&request())
        .await
        .unwrap();

        assert_eq!(feedback.provider, "gemini");
    }

    #[tokio::test]
    async fn test_blank_answer_counts_as_failure() {
        let err = chain(vec![Arc::new(CannedFeedback::ok("groq", "  \n "))])
            .generate(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::EmptyContent));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_generator_times_out_and_next_is_tried() {
        let feedback = chain(vec![
            Arc::new(CannedFeedback::ok("groq", "late").slow(Duration::from_secs(120))),
            Arc::new(CannedFeedback::ok("gemini", "on time")),
        ])
        .generate(&request())
        .await
        .unwrap();

        assert_eq!(feedback.text, "on time");
    }
}
