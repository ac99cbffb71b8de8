//! Keyword extraction: normalized tokens minus stopwords and resume/job boilerplate.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::analysis::tokenizer::normalize;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
    "each", "etc", "few", "for", "from", "further", "had", "has", "have", "having", "he",
    "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "may", "me", "might", "more", "most", "must", "my", "no", "nor", "not",
    "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over",
    "own", "per", "same", "shall", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "us", "very", "via", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "within",
    "would", "you", "your", "yours",
];

/// Words that appear in nearly every resume or posting and say nothing about fit.
const GENERIC_TERMS: &[&str] = &[
    "ability", "candidate", "company", "excellent", "experience", "experienced", "familiar",
    "familiarity", "good", "great", "ideal", "including", "job", "knowledge", "looking",
    "need", "needed", "plus", "preferred", "proficiency", "proficient", "required",
    "requirement", "requirements", "responsibilities", "responsible", "role", "skill",
    "skills", "someone", "strong", "team", "understanding", "using", "work", "working",
    "years",
];

static IGNORED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORDS.iter().chain(GENERIC_TERMS).copied().collect());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TermStats {
    frequency: u32,
    first_position: usize,
}

/// Significant terms of one text, with enough bookkeeping to rank them.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    terms: HashMap<String, TermStats>,
}

impl KeywordSet {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    #[cfg(test)]
    pub fn frequency(&self, term: &str) -> u32 {
        self.terms.get(term).map(|s| s.frequency).unwrap_or(0)
    }

    /// Number of terms present in both sets.
    pub fn overlap(&self, other: &KeywordSet) -> usize {
        self.terms.keys().filter(|t| other.contains(t)).count()
    }

    /// Terms ordered by descending frequency, ties broken by first occurrence.
    pub fn ranked(&self) -> Vec<&str> {
        let mut entries: Vec<(&String, &TermStats)> = self.terms.iter().collect();
        entries.sort_by(|(_, a), (_, b)| {
            b.frequency
                .cmp(&a.frequency)
                .then(a.first_position.cmp(&b.first_position))
        });
        entries.into_iter().map(|(term, _)| term.as_str()).collect()
    }

    /// Ranked terms of `self` absent from `other`.
    pub fn missing_from<'a>(&'a self, other: &KeywordSet) -> Vec<&'a str> {
        self.ranked()
            .into_iter()
            .filter(|t| !other.contains(t))
            .collect()
    }
}

/// Extracts the significant terms of `text`.
pub fn extract_keywords(text: &str) -> KeywordSet {
    let mut terms: HashMap<String, TermStats> = HashMap::new();

    let significant = normalize(text)
        .into_iter()
        .filter(|t| !IGNORED.contains(t.as_str()))
        .filter(|t| t.chars().any(char::is_alphabetic));

    for (position, token) in significant.enumerate() {
        terms
            .entry(token)
            .and_modify(|s| s.frequency += 1)
            .or_insert(TermStats {
                frequency: 1,
                first_position: position,
            });
    }

    KeywordSet { terms }
}
