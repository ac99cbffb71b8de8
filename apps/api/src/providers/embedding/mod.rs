//! Embedding providers and the ordered fallback chain over them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::ProviderError;

pub mod huggingface;
pub mod openai;

pub use huggingface::HuggingFaceEmbedder;
pub use openai::OpenAiEmbedder;

/// Character budget for text sent to an embedding model. Truncation keeps the prefix.
pub const MAX_EMBEDDING_INPUT_CHARS: usize = 5000;

pub type EmbeddingVector = Vec<f32>;

/// A service that turns text into a vector. Implementations must truncate `text` to
/// `max_input_chars` characters before sending it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(
        &self,
        text: &str,
        max_input_chars: usize,
    ) -> Result<EmbeddingVector, ProviderError>;
}

/// Two vectors produced by the same provider.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedPair {
    pub provider: String,
    pub left: EmbeddingVector,
    pub right: EmbeddingVector,
}

/// Providers tried in priority order; the first that embeds both texts wins.
///
/// Both texts always come from one provider: vectors from different models do not share a
/// space, so a provider that fails either text is skipped as a whole.
#[derive(Clone)]
pub struct EmbeddingChain {
    providers: Vec<Arc<dyn EmbeddingProvider>>,
    timeout: Duration,
}

impl EmbeddingChain {
    pub fn new(providers: Vec<Arc<dyn EmbeddingProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn embed_pair(&self, left: &str, right: &str) -> Result<EmbeddedPair, ProviderError> {
        let mut last_error = ProviderError::NotConfigured;

        for provider in &self.providers {
            match self.embed_pair_with(provider.as_ref(), left, right).await {
                Ok(pair) => {
                    info!(provider = provider.name(), dims = pair.left.len(), "embeddings ready");
                    return Ok(pair);
                }
                Err(e) => {
                    warn!(provider = provider.name(), "embedding provider failed: {e}");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn embed_pair_with(
        &self,
        provider: &dyn EmbeddingProvider,
        left: &str,
        right: &str,
    ) -> Result<EmbeddedPair, ProviderError> {
        let both = async {
            tokio::try_join!(
                provider.embed(left, MAX_EMBEDDING_INPUT_CHARS),
                provider.embed(right, MAX_EMBEDDING_INPUT_CHARS),
            )
        };

        let (left, right) = tokio::time::timeout(self.timeout, both)
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;

        let left = validate_vector(left)?;
        let right = validate_vector(right)?;

        if left.len() != right.len() {
            return Err(ProviderError::DimensionMismatch {
                left: left.len(),
                right: right.len(),
            });
        }

        Ok(EmbeddedPair {
            provider: provider.name().to_string(),
            left,
            right,
        })
    }
}

/// Rejects vectors no similarity can be computed from.
pub fn validate_vector(vector: EmbeddingVector) -> Result<EmbeddingVector, ProviderError> {
    if vector.is_empty() {
        return Err(ProviderError::Malformed("empty embedding".to_string()));
    }
    if let Some(bad) = vector.iter().find(|x| !x.is_finite()) {
        return Err(ProviderError::Malformed(format!(
            "non-finite embedding component {bad}"
        )));
    }
    Ok(vector)
}
