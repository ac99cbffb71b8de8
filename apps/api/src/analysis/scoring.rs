//! Overlap scorers and the weighted aggregate.

use anyhow::{bail, Result};

use crate::analysis::keywords::KeywordSet;
use crate::analysis::skills::SkillSet;

/// Weights in percent. Changing them changes every score ever reported: bump
/// `SCORING_WEIGHTS_VERSION` alongside.
pub const SEMANTIC_WEIGHT_PCT: f64 = 40.0;
pub const KEYWORD_WEIGHT_PCT: f64 = 35.0;
pub const SKILL_WEIGHT_PCT: f64 = 25.0;
pub const SCORING_WEIGHTS_VERSION: &str = "40-35-25";

/// Semantic score used whenever embeddings are unavailable.
pub const DEFAULT_SEMANTIC_SCORE: u8 = 50;

/// Share of the job's keywords found in the resume, 0–100.
pub fn keyword_match(resume: &KeywordSet, job: &KeywordSet) -> f64 {
    overlap_pct(job.overlap(resume), job.len())
}

/// Share of the job's skills found in the resume, 0–100.
pub fn skill_match(resume: &SkillSet, job: &SkillSet) -> f64 {
    overlap_pct(job.overlap(resume), job.len())
}

/// A job that asks for nothing is fully satisfied.
fn overlap_pct(matched: usize, required: usize) -> f64 {
    if required == 0 {
        return 100.0;
    }
    matched as f64 / required as f64 * 100.0
}

/// Maps a cosine similarity to the 0–100 semantic score. Negative similarity floors at 0.
pub fn semantic_score(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Weighted final score, rounded half away from zero and clamped to 0–100.
///
/// Weighted in percent and divided once, so exact halves stay exact: 80/70/60 sums to
/// 7150 / 100 = 71.5 and rounds to 72 (multiplying by 0.35 first would land on 71.4999…).
pub fn aggregate(semantic: f64, keyword: f64, skill: f64) -> Result<u8> {
    if !(semantic.is_finite() && keyword.is_finite() && skill.is_finite()) {
        bail!("non-finite sub-score: semantic={semantic} keyword={keyword} skill={skill}");
    }

    let weighted = (semantic * SEMANTIC_WEIGHT_PCT
        + keyword * KEYWORD_WEIGHT_PCT
        + skill * SKILL_WEIGHT_PCT)
        / 100.0;

    Ok(weighted.round().clamp(0.0, 100.0) as u8)
}

/// Rounds a percentage to one decimal place for display.
pub fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::extract_keywords;
    use crate::analysis::skills::extract_skills;

    fn keywords(resume: &str, job: &str) -> f64 {
        keyword_match(&extract_keywords(resume), &extract_keywords(job))
    }

    fn skills(resume: &str, job: &str) -> f64 {
        skill_match(&extract_skills(resume), &extract_skills(job))
    }

    #[test]
    fn test_weights_sum_to_one_hundred() {
        assert_eq!(SEMANTIC_WEIGHT_PCT + KEYWORD_WEIGHT_PCT + SKILL_WEIGHT_PCT, 100.0);
    }

    #[test]
    fn test_aggregate_rounds_exact_half_up() {
        // 32 + 24.5 + 15 = 71.5
        assert_eq!(aggregate(80.0, 70.0, 60.0).unwrap(), 72);
    }

    #[test]
    fn test_aggregate_bounds() {
        assert_eq!(aggregate(0.0, 0.0, 0.0).unwrap(), 0);
        assert_eq!(aggregate(100.0, 100.0, 100.0).unwrap(), 100);
    }

    #[test]
    fn test_aggregate_clamps_out_of_range_inputs() {
        assert_eq!(aggregate(250.0, 100.0, 100.0).unwrap(), 100);
        assert_eq!(aggregate(-80.0, 0.0, 0.0).unwrap(), 0);
    }

    #[test]
    fn test_aggregate_rejects_non_finite_input() {
        assert!(aggregate(f64::NAN, 50.0, 50.0).is_err());
        assert!(aggregate(50.0, f64::INFINITY, 50.0).is_err());
    }

    #[test]
    fn test_keyword_match_self_is_full() {
        let text = "Built Kafka pipelines and Terraform modules for payments";
        assert_eq!(keywords(text, text), 100.0);
    }

    #[test]
    fn test_keyword_match_partial_overlap() {
        // job keywords: kafka, terraform, docker, golang
        let score = keywords("Kafka and Docker", "Kafka, Terraform, Docker, Golang");
        assert!((score - 50.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_keyword_match_empty_job_is_full() {
        assert_eq!(keywords("Kafka expert", "the and of"), 100.0);
        assert_eq!(keywords("", ""), 100.0);
    }

    #[test]
    fn test_keyword_match_empty_resume_is_zero() {
        assert_eq!(keywords("", "Kafka Terraform"), 0.0);
    }

    #[test]
    fn test_skill_match_only_python_required() {
        assert_eq!(skills("Expert in Python and SQL", "Python"), 100.0);
    }

    #[test]
    fn test_skill_match_one_of_three() {
        let score = skills(
            "Built dashboards in React",
            "Need someone with React, Node.js, and AWS experience",
        );
        assert!((score - 100.0 / 3.0).abs() < 1e-9, "score was {score}");
        assert_eq!(one_decimal(score), 33.3);
    }

    #[test]
    fn test_skill_match_job_without_skills_is_full() {
        assert_eq!(skills("Python", "Friendly office, great snacks"), 100.0);
    }

    #[test]
    fn test_semantic_score_mapping() {
        assert_eq!(semantic_score(1.0), 100);
        assert_eq!(semantic_score(0.734), 73);
        assert_eq!(semantic_score(0.0), 0);
        assert_eq!(semantic_score(-0.4), 0);
    }
}
