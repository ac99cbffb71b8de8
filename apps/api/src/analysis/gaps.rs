use crate::analysis::skills::SkillSet;

/// How many missing skills the response shows.
pub const MISSING_SKILLS_DISPLAY_LIMIT: usize = 10;

/// Job skills the resume does not mention, in the order the job posting lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillGap {
    missing: Vec<&'static str>,
}

impl SkillGap {
    pub fn all(&self) -> &[&'static str] {
        &self.missing
    }

    pub fn for_display(&self) -> &[&'static str] {
        &self.missing[..self.missing.len().min(MISSING_SKILLS_DISPLAY_LIMIT)]
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }
}

/// `job_skills − resume_skills`, keeping the job's discovery order.
pub fn missing_skills(resume_skills: &SkillSet, job_skills: &SkillSet) -> SkillGap {
    SkillGap {
        missing: job_skills
            .iter()
            .filter(|skill| !resume_skills.contains(skill))
            .collect(),
    }
}
