//! Skill extraction against the static taxonomy.
//!
//! Matching is greedy longest-match over n-grams of normalized tokens: at each position the
//! longest alias window is tried first, and a hit consumes its tokens. Every window is a
//! single hash lookup, so cost is linear in text length.

use std::collections::HashSet;

use crate::analysis::taxonomy::TAXONOMY;
use crate::analysis::tokenizer::{trim_joiners, Tokenizer, DEFAULT_SHORT_TOKENS};

/// Canonical skill names in the order they were first discovered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSet {
    ordered: Vec<&'static str>,
    members: HashSet<&'static str>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a skill; returns false when it was already present.
    pub fn insert(&mut self, skill: &'static str) -> bool {
        if self.members.insert(skill) {
            self.ordered.push(skill);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.members.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ordered.iter().copied()
    }

    /// Number of skills present in both sets.
    pub fn overlap(&self, other: &SkillSet) -> usize {
        self.iter().filter(|s| other.contains(s)).count()
    }
}

impl FromIterator<&'static str> for SkillSet {
    fn from_iter<I: IntoIterator<Item = &'static str>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

/// Extracts the canonical skills mentioned in `text`.
pub fn extract_skills(text: &str) -> SkillSet {
    let tokens = skill_tokens(text);
    let max_window = TAXONOMY.max_alias_tokens();
    let mut found = SkillSet::new();

    let mut i = 0;
    while i < tokens.len() {
        let longest = max_window.min(tokens.len() - i);
        let mut consumed = 1;

        for window in (1..=longest).rev() {
            let candidate = tokens[i..i + window].join(" ");
            if let Some(skill) = TAXONOMY.lookup(&candidate) {
                found.insert(skill);
                consumed = window;
                break;
            }
        }

        i += consumed;
    }

    found
}

/// Compound separators first, then the glue inside a single word (`react+redux`,
/// `python.deployed`). A piece that is a known alias is never split further.
const SPLIT_LEVELS: &[&[char]] = &[&['-', '/'], &['.', '+', '&']];

/// Tokens for skill matching. A token that is a known alias stays whole (`react-native`,
/// `node.js`, `c++`); anything else is broken into parts and each part resolved again.
/// Emitting both forms would let `react-native` also count as React.
fn skill_tokens(text: &str) -> Vec<String> {
    let whole = Tokenizer::new(DEFAULT_SHORT_TOKENS, false);
    let mut tokens = Vec::new();

    for token in whole.tokenize(text) {
        push_skill_token(&mut tokens, &token, SPLIT_LEVELS);
    }

    tokens
}

fn push_skill_token(tokens: &mut Vec<String>, token: &str, levels: &[&[char]]) {
    if let Some(alias) = resolve_alias(token) {
        tokens.push(alias);
        return;
    }

    let Some((separators, deeper)) = levels.split_first() else {
        tokens.push(token.to_string());
        return;
    };
    if !token.contains(*separators) {
        push_skill_token(tokens, token, deeper);
        return;
    }

    let parts: Vec<&str> = token.split(*separators).filter_map(trim_joiners).collect();
    // A lone letter out of a compound is only a language next to a known skill:
    // `c/c++` keeps C, `c-level` and `r&d` do not.
    let beside_skill = parts
        .iter()
        .any(|p| p.chars().count() > 1 && resolve_alias(p).is_some());

    for part in parts {
        if part.chars().count() < 2 && !(beside_skill && DEFAULT_SHORT_TOKENS.contains(&part)) {
            continue;
        }
        push_skill_token(tokens, part, deeper);
    }
}

/// The alias a token stands for, allowing a trailing version (`python3.8`, `c++17`, `vue3`).
fn resolve_alias(token: &str) -> Option<String> {
    if TAXONOMY.lookup(token).is_some() {
        return Some(token.to_string());
    }

    let unversioned = token.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
    if unversioned.len() < token.len()
        && unversioned.chars().count() > 1
        && TAXONOMY.lookup(unversioned).is_some()
    {
        return Some(unversioned.to_string());
    }

    None
}
