use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::tokenizer::truncate_chars;
use crate::errors::ProviderError;
use crate::providers::embedding::{EmbeddingProvider, EmbeddingVector};
use crate::providers::ProviderHttp;

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
}

/// Shapes the feature-extraction pipeline answers with. Pooled sentence models return a
/// flat vector; some deployments wrap it in a batch of one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionOutput {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

impl FeatureExtractionOutput {
    fn into_vector(self) -> Result<EmbeddingVector, ProviderError> {
        match self {
            FeatureExtractionOutput::Flat(v) => Ok(v),
            FeatureExtractionOutput::Nested(rows) => rows
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::Malformed("empty embedding batch".to_string())),
        }
    }
}

/// HuggingFace Inference feature-extraction endpoint (primary embedding provider).
pub struct HuggingFaceEmbedder {
    http: ProviderHttp,
    api_key: String,
    base_url: String,
    model: String,
}

impl HuggingFaceEmbedder {
    pub fn new(http: ProviderHttp, api_key: String, base_url: String, model: String) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}/pipeline/feature-extraction", self.base_url, self.model)
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceEmbedder {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn embed(
        &self,
        text: &str,
        max_input_chars: usize,
    ) -> Result<EmbeddingVector, ProviderError> {
        let body = FeatureExtractionRequest {
            inputs: truncate_chars(text, max_input_chars),
        };
        let url = self.endpoint();

        let raw: Value = self
            .http
            .send_json(self.name(), |client| {
                client.post(&url).bearer_auth(&self.api_key).json(&body)
            })
            .await?;

        serde_json::from_value::<FeatureExtractionOutput>(raw)
            .map_err(|_| ProviderError::Malformed("unexpected feature-extraction shape".to_string()))?
            .into_vector()
    }
}
