use std::sync::Arc;

use crate::analysis::pipeline::AnalysisPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Embedding and feedback chains are fixed at startup.
    pub pipeline: Arc<AnalysisPipeline>,
}
