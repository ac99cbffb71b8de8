mod analysis;
mod config;
mod errors;
mod providers;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::pipeline::AnalysisPipeline;
use crate::analysis::scoring::SCORING_WEIGHTS_VERSION;
use crate::analysis::taxonomy::TAXONOMY_VERSION;
use crate::config::Config;
use crate::providers::embedding::{
    EmbeddingChain, EmbeddingProvider, HuggingFaceEmbedder, OpenAiEmbedder,
};
use crate::providers::feedback::{FeedbackChain, FeedbackGenerator, GeminiFeedback, GroqFeedback};
use crate::providers::ProviderHttp;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; only malformed values are fatal
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    let http = ProviderHttp::new()?.with_backoff(config.provider_retry_backoff);
    let pipeline = build_pipeline(&config, http);
    info!(
        embedding = ?pipeline.embedding_provider_names(),
        feedback = ?pipeline.feedback_provider_names(),
        taxonomy = TAXONOMY_VERSION,
        weights = SCORING_WEIGHTS_VERSION,
        "Analysis pipeline initialized"
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Registers every provider whose API key is configured, in priority order.
fn build_pipeline(config: &Config, http: ProviderHttp) -> AnalysisPipeline {
    let mut embedders: Vec<Arc<dyn EmbeddingProvider>> = Vec::new();
    if let Some(key) = &config.huggingface_api_key {
        embedders.push(Arc::new(HuggingFaceEmbedder::new(
            http.clone(),
            key.clone(),
            config.huggingface_api_url.clone(),
            config.huggingface_embedding_model.clone(),
        )));
    }
    if let Some(key) = &config.openai_api_key {
        embedders.push(Arc::new(OpenAiEmbedder::new(
            http.clone(),
            key.clone(),
            config.openai_api_url.clone(),
            config.openai_embedding_model.clone(),
        )));
    }

    let mut generators: Vec<Arc<dyn FeedbackGenerator>> = Vec::new();
    if let Some(key) = &config.groq_api_key {
        generators.push(Arc::new(GroqFeedback::new(
            http.clone(),
            key.clone(),
            config.groq_api_url.clone(),
            config.groq_model.clone(),
        )));
    }
    if let Some(key) = &config.gemini_api_key {
        generators.push(Arc::new(GeminiFeedback::new(
            http,
            key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        )));
    }

    let embeddings = EmbeddingChain::new(embedders, config.embedding_timeout);
    if embeddings.is_empty() {
        warn!("No embedding provider configured; semantic score will use its default");
    }
    let feedback = FeedbackChain::new(generators, config.feedback_timeout);
    if feedback.is_empty() {
        warn!("No feedback provider configured; responses will carry fallback feedback");
    }

    AnalysisPipeline::new(embeddings, feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::AnalysisRequest;
    use std::collections::HashMap;

    fn pipeline_for(pairs: &[(&str, &str)]) -> AnalysisPipeline {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        build_pipeline(&config, ProviderHttp::new().unwrap())
    }

    #[test]
    fn test_providers_registered_in_priority_order() {
        let pipeline = pipeline_for(&[
            ("OPENAI_API_KEY", "sk"),
            ("HUGGINGFACE_API_KEY", "hf"),
            ("GEMINI_API_KEY", "gm"),
            ("GROQ_API_KEY", "gsk"),
        ]);
        assert_eq!(
            pipeline.embedding_provider_names(),
            vec!["huggingface", "openai"]
        );
        assert_eq!(pipeline.feedback_provider_names(), vec!["groq", "gemini"]);
    }

    #[test]
    fn test_unconfigured_providers_are_skipped() {
        let pipeline = pipeline_for(&[("GEMINI_API_KEY", "gm")]);
        assert!(pipeline.embedding_provider_names().is_empty());
        assert_eq!(pipeline.feedback_provider_names(), vec!["gemini"]);
    }

    #[tokio::test]
    async fn test_feedback_host_comes_from_config() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "From the configured host"}}]}"#)
            .create_async()
            .await;
        let url = server.url();

        let pipeline = pipeline_for(&[("GROQ_API_KEY", "gsk"), ("GROQ_API_URL", url.as_str())]);
        let outcome = pipeline
            .analyze(&AnalysisRequest {
                resume_text: "Rust engineer".to_string(),
                job_description: "Rust role".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.result.feedback, "From the configured host");
        assert_eq!(outcome.feedback_provider.as_deref(), Some("groq"));
        mock.assert_async().await;
    }
}
