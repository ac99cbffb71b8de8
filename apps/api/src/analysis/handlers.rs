use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/ats/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze", %request_id);

    async move {
        info!(
            resume_chars = req.resume_text.chars().count(),
            job_chars = req.job_description.chars().count(),
            "analysis requested"
        );
        let outcome = state.pipeline.analyze(&req).await?;
        info!(
            score = outcome.result.score,
            embedding_provider = outcome.embedding_provider.as_deref().unwrap_or("default"),
            feedback_provider = outcome.feedback_provider.as_deref().unwrap_or("fallback"),
            missing_skills_total = outcome.all_missing_skills.len(),
            stages = ?outcome.stages,
            "analysis served"
        );
        Ok::<_, AppError>(Json(outcome.result))
    }
    .instrument(span)
    .await
}
