use crate::providers::feedback::FeedbackRequest;

pub const FEEDBACK_SYSTEM: &str = "You are an expert ATS specialist providing resume feedback.";

/// Sampling settings shared by every feedback backend.
pub const FEEDBACK_TEMPERATURE: f32 = 0.3;
pub const FEEDBACK_MAX_TOKENS: u32 = 800;

pub fn build_feedback_prompt(request: &FeedbackRequest) -> String {
    format!(
        "As a senior HR specialist, provide specific feedback for this resume analysis:

RESUME: {resume}
JOB: {job}

CALCULATED SCORES:
- Overall Match: {score}/100
- Semantic Similarity: {semantic}/100
- Keyword Match: {keyword:.1}%
- Skill Match: {skill:.1}%
- Missing Skills: {missing_skills}
- Missing Job Keywords: {missing_keywords}

Provide feedback in this format:
STRENGTHS:
- [2-3 specific strengths with examples]

WEAKNESSES & IMPROVEMENTS:
- [3-5 specific gaps with actionable fixes]

ATS OPTIMIZATION:
- [2-3 technical suggestions]

KEYWORD GAPS:
- [Missing important keywords]

Keep it concise and actionable. Focus on what matters most.",
        resume = request.resume_excerpt,
        job = request.job_excerpt,
        score = request.score,
        semantic = request.semantic_score,
        keyword = request.keyword_score,
        skill = request.skill_score,
        missing_skills = list_or_none(&request.missing_skills),
        missing_keywords = list_or_none(&request.missing_keywords),
    )
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(missing: Vec<&str>) -> FeedbackRequest {
        FeedbackRequest::new(
            "Rust engineer",
            "Senior Rust role",
            72,
            80,
            70.0,
            100.0 / 3.0,
            missing.into_iter().map(String::from).collect(),
            vec!["kafka".to_string()],
        )
    }

    #[test]
    fn test_prompt_contains_scores_and_excerpts() {
        let prompt = build_feedback_prompt(&request(vec!["Node.js", "AWS"]));
        assert!(prompt.contains("RESUME: Rust engineer"));
        assert!(prompt.contains("JOB: Senior Rust role"));
        assert!(prompt.contains("Overall Match: 72/100"));
        assert!(prompt.contains("Semantic Similarity: 80/100"));
        assert!(prompt.contains("Keyword Match: 70.0%"));
        assert!(prompt.contains("Skill Match: 33.3%"));
        assert!(prompt.contains("Missing Skills: Node.js, AWS"));
        assert!(prompt.contains("Missing Job Keywords: kafka"));
    }

    #[test]
    fn test_no_missing_skills_reads_none() {
        let prompt = build_feedback_prompt(&request(vec![]));
        assert!(prompt.contains("Missing Skills: None"));
    }

    #[test]
    fn test_placeholders_in_user_text_are_left_alone() {
        let mut req = request(vec![]);
        req.resume_excerpt = "I wrote {score} templates".to_string();
        let prompt = build_feedback_prompt(&req);
        assert!(prompt.contains("RESUME: I wrote {score} templates"));
        assert!(prompt.contains("Overall Match: 72/100"));
    }
}
