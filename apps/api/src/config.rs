use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Every provider key is optional. A provider whose key is missing is simply not
/// registered, and the pipeline falls back to its neutral defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub huggingface_api_key: Option<String>,
    pub huggingface_api_url: String,
    pub huggingface_embedding_model: String,
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_embedding_model: String,
    pub groq_api_key: Option<String>,
    pub groq_api_url: String,
    pub groq_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub embedding_timeout: Duration,
    pub feedback_timeout: Duration,
    /// Base delay between retries of a failed provider call.
    pub provider_retry_backoff: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so parsing can be exercised
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            port: optional("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
            huggingface_api_key: optional("HUGGINGFACE_API_KEY"),
            huggingface_api_url: or_default(
                "HUGGINGFACE_API_URL",
                "https://router.huggingface.co/hf-inference/models",
            ),
            huggingface_embedding_model: or_default(
                "HUGGINGFACE_EMBEDDING_MODEL",
                "sentence-transformers/all-MiniLM-L6-v2",
            ),
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_api_url: or_default("OPENAI_API_URL", "https://api.openai.com/v1"),
            openai_embedding_model: or_default("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            groq_api_key: optional("GROQ_API_KEY"),
            groq_api_url: or_default("GROQ_API_URL", "https://api.groq.com/openai/v1"),
            groq_model: or_default("GROQ_MODEL", "llama-3.1-8b-instant"),
            gemini_api_key: optional("GEMINI_API_KEY"),
            gemini_api_url: or_default(
                "GEMINI_API_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            gemini_model: or_default("GEMINI_MODEL", "gemini-2.0-flash"),
            embedding_timeout: secs(optional("EMBEDDING_TIMEOUT_SECS"), 15)
                .context("EMBEDDING_TIMEOUT_SECS must be a whole number of seconds")?,
            feedback_timeout: secs(optional("FEEDBACK_TIMEOUT_SECS"), 30)
                .context("FEEDBACK_TIMEOUT_SECS must be a whole number of seconds")?,
            provider_retry_backoff: Duration::from_millis(
                optional("PROVIDER_RETRY_BACKOFF_MS")
                    .map(|v| v.trim().parse::<u64>())
                    .transpose()
                    .context("PROVIDER_RETRY_BACKOFF_MS must be a whole number of milliseconds")?
                    .unwrap_or(1000),
            ),
        })
    }
}

fn secs(value: Option<String>, default: u64) -> Result<Duration> {
    let secs = match value {
        Some(v) => v.trim().parse::<u64>()?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}
