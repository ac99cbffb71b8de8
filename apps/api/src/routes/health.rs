use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::analysis::scoring::SCORING_WEIGHTS_VERSION;
use crate::analysis::taxonomy::TAXONOMY_VERSION;
use crate::state::AppState;

/// GET /health
/// Returns service version, the skill taxonomy and weight versions, and which providers are wired.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ats-api",
        "taxonomyVersion": TAXONOMY_VERSION,
        "weightsVersion": SCORING_WEIGHTS_VERSION,
        "embeddingProviders": state.pipeline.embedding_provider_names(),
        "feedbackProviders": state.pipeline.feedback_provider_names(),
    }))
}
