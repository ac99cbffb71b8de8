use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Body of `POST /api/v1/ats/analyze`. Absent fields deserialize as empty strings so that
/// "missing" and "blank" share one validation path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

impl AnalysisRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.resume_text.trim().is_empty() || self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "Both resume text and job description are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub semantic_score: u8,
    /// Percent, one decimal place.
    pub keyword_score: f64,
    /// Percent, one decimal place.
    pub skill_score: f64,
    /// At most ten, in job-posting order.
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8,
    pub feedback: String,
    pub breakdown: ScoreBreakdown,
}
