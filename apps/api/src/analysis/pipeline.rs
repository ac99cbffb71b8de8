//! Analysis pipeline: embeddings and lexical scoring in parallel, then aggregate, then prose.
//!
//! Stages:
//! `Start → EmbeddingRequested → (EmbeddingOk | EmbeddingFailed) → KeywordSkillScored →
//!  Aggregated → FeedbackRequested → (FeedbackOk | FeedbackFailed) → Done`
//!
//! Provider failures never fail the analysis: embeddings fall back to
//! `DEFAULT_SEMANTIC_SCORE`, feedback to `FALLBACK_FEEDBACK`. Only an internal fault
//! (non-finite arithmetic, a panicked scoring task) fails the request.

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::analysis::gaps::{missing_skills, SkillGap};
use crate::analysis::keywords::extract_keywords;
use crate::analysis::models::{AnalysisRequest, AnalysisResult, ScoreBreakdown};
use crate::analysis::scoring::{
    aggregate, keyword_match, one_decimal, semantic_score, skill_match,
    DEFAULT_SEMANTIC_SCORE,
};
use crate::analysis::similarity::cosine_similarity;
use crate::analysis::skills::extract_skills;
use crate::errors::AppError;
use crate::providers::embedding::EmbeddingChain;
use crate::providers::feedback::{FeedbackChain, FeedbackRequest, FALLBACK_FEEDBACK};

/// How many missing job keywords the feedback prompt lists.
const MISSING_KEYWORDS_IN_PROMPT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    EmbeddingRequested,
    EmbeddingOk,
    EmbeddingFailed,
    KeywordSkillScored,
    Aggregated,
    FeedbackRequested,
    FeedbackOk,
    FeedbackFailed,
    Done,
}

/// Everything one run produced. Only `result` is returned to callers.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    /// Untruncated skill gap, for consumers other than the response body.
    pub all_missing_skills: Vec<String>,
    pub stages: Vec<PipelineStage>,
    /// `None` when the default semantic score was used.
    pub embedding_provider: Option<String>,
    /// `None` when the fallback feedback was used.
    pub feedback_provider: Option<String>,
}

struct SemanticScore {
    score: u8,
    provider: Option<String>,
}

/// Keyword and skill results for one request.
struct LexicalScores {
    keyword: f64,
    skill: f64,
    gap: SkillGap,
    missing_keywords: Vec<String>,
}

impl LexicalScores {
    fn compute(resume_text: &str, job_text: &str) -> Self {
        let resume_keywords = extract_keywords(resume_text);
        let job_keywords = extract_keywords(job_text);
        let resume_skills = extract_skills(resume_text);
        let job_skills = extract_skills(job_text);

        if job_keywords.is_empty() {
            debug!("job text has no significant keywords; keyword score is a full match");
        }
        if job_skills.is_empty() {
            debug!("job text names no known skills; skill score is a full match");
        }

        Self {
            keyword: keyword_match(&resume_keywords, &job_keywords),
            skill: skill_match(&resume_skills, &job_skills),
            gap: missing_skills(&resume_skills, &job_skills),
            missing_keywords: job_keywords
                .missing_from(&resume_keywords)
                .into_iter()
                .take(MISSING_KEYWORDS_IN_PROMPT)
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Default)]
struct StageLog {
    stages: Vec<PipelineStage>,
}

impl StageLog {
    fn enter(&mut self, stage: PipelineStage) {
        debug!(?stage, "pipeline stage");
        self.stages.push(stage);
    }
}

#[derive(Clone)]
pub struct AnalysisPipeline {
    embeddings: EmbeddingChain,
    feedback: FeedbackChain,
}

impl AnalysisPipeline {
    pub fn new(embeddings: EmbeddingChain, feedback: FeedbackChain) -> Self {
        Self {
            embeddings,
            feedback,
        }
    }

    pub fn embedding_provider_names(&self) -> Vec<&str> {
        self.embeddings.provider_names()
    }

    pub fn feedback_provider_names(&self) -> Vec<&str> {
        self.feedback.provider_names()
    }

    /// Runs a full analysis. The request must already be validated.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AppError> {
        let mut log = StageLog::default();
        log.enter(PipelineStage::Start);

        let resume_text = request.resume_text.clone();
        let job_text = request.job_description.clone();
        let lexical_task =
            tokio::task::spawn_blocking(move || LexicalScores::compute(&resume_text, &job_text));

        log.enter(PipelineStage::EmbeddingRequested);
        let (semantic, lexical) = tokio::join!(
            self.compute_semantic(&request.resume_text, &request.job_description),
            lexical_task
        );

        log.enter(if semantic.provider.is_some() {
            PipelineStage::EmbeddingOk
        } else {
            PipelineStage::EmbeddingFailed
        });

        let lexical = lexical.map_err(|e| anyhow!("lexical scoring task failed: {e}"))?;
        log.enter(PipelineStage::KeywordSkillScored);

        let score = aggregate(f64::from(semantic.score), lexical.keyword, lexical.skill)?;
        log.enter(PipelineStage::Aggregated);

        let display_missing: Vec<String> = lexical
            .gap
            .for_display()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let feedback_request = FeedbackRequest::new(
            &request.resume_text,
            &request.job_description,
            score,
            semantic.score,
            lexical.keyword,
            lexical.skill,
            display_missing.clone(),
            lexical.missing_keywords,
        );

        log.enter(PipelineStage::FeedbackRequested);
        let (feedback, feedback_provider) = match self.feedback.generate(&feedback_request).await {
            Ok(generated) => {
                log.enter(PipelineStage::FeedbackOk);
                (generated.text, Some(generated.provider))
            }
            Err(e) => {
                warn!("feedback unavailable, using fallback text: {e}");
                log.enter(PipelineStage::FeedbackFailed);
                (FALLBACK_FEEDBACK.to_string(), None)
            }
        };

        log.enter(PipelineStage::Done);

        info!(
            score,
            semantic = semantic.score,
            keyword = lexical.keyword,
            skill = lexical.skill,
            missing_skills = lexical.gap.all().len(),
            "analysis complete"
        );

        Ok(AnalysisOutcome {
            result: AnalysisResult {
                score,
                feedback,
                breakdown: ScoreBreakdown {
                    semantic_score: semantic.score,
                    keyword_score: one_decimal(lexical.keyword),
                    skill_score: one_decimal(lexical.skill),
                    missing_skills: display_missing,
                },
            },
            all_missing_skills: lexical.gap.all().iter().map(|s| s.to_string()).collect(),
            stages: log.stages,
            embedding_provider: semantic.provider,
            feedback_provider,
        })
    }

    async fn compute_semantic(&self, resume_text: &str, job_text: &str) -> SemanticScore {
        let fallback = SemanticScore {
            score: DEFAULT_SEMANTIC_SCORE,
            provider: None,
        };

        let pair = match self.embeddings.embed_pair(resume_text, job_text).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("embeddings unavailable, using default semantic score: {e}");
                return fallback;
            }
        };

        match cosine_similarity(&pair.left, &pair.right) {
            Ok(similarity) => SemanticScore {
                score: semantic_score(similarity),
                provider: Some(pair.provider),
            },
            Err(e) => {
                warn!("embeddings not comparable, using default semantic score: {e}");
                fallback
            }
        }
    }
}
