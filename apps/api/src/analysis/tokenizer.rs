//! Turns raw resume and job text into normalized tokens.
//!
//! Rules:
//! 1. Lowercase, then split on any character that is neither alphanumeric nor a joiner
//!    (`.` `+` `#` `-` `/` `&`).
//! 2. Trim joiners off both ends of a piece. A single leading `.` before a letter survives
//!    (`.net`), as do trailing `+` and `#` (`c++`, `c#`).
//! 3. Pieces with no alphanumeric character are dropped.
//! 4. Compounds containing `-` or `/` (`front-end`, `ci/cd`) are emitted joined, followed
//!    by their parts.
//! 5. Tokens shorter than two characters are dropped unless whitelisted.

const JOINERS: &[char] = &['.', '+', '#', '-', '/', '&'];
const TRAILING_TRIM: &[char] = &['.', '-', '/', '&'];

/// Single-character tokens that carry meaning (language names).
pub const DEFAULT_SHORT_TOKENS: &[&str] = &["c", "r"];

/// Tokenizer configuration. `Tokenizer::default()` is what every scorer uses.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    short_token_whitelist: &'static [&'static str],
    split_compounds: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            short_token_whitelist: DEFAULT_SHORT_TOKENS,
            split_compounds: true,
        }
    }
}

impl Tokenizer {
    pub fn new(short_token_whitelist: &'static [&'static str], split_compounds: bool) -> Self {
        Self {
            short_token_whitelist,
            split_compounds,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut tokens = Vec::new();

        for piece in lower.split(|c: char| !(c.is_alphanumeric() || JOINERS.contains(&c))) {
            let Some(word) = trim_joiners(piece) else {
                continue;
            };

            self.push_token(&mut tokens, word);

            if self.split_compounds && word.contains(is_compound_separator) {
                for part in word.split(is_compound_separator) {
                    if let Some(part) = trim_joiners(part) {
                        self.push_token(&mut tokens, part);
                    }
                }
            }
        }

        tokens
    }

    fn push_token(&self, tokens: &mut Vec<String>, word: &str) {
        if word.chars().count() < 2 && !self.short_token_whitelist.contains(&word) {
            return;
        }
        tokens.push(word.to_string());
    }
}

/// Normalizes text with the default tokenizer.
pub fn normalize(text: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text)
}

fn is_compound_separator(c: char) -> bool {
    c == '-' || c == '/'
}

/// Strips joiners off both ends of `piece`; `None` when nothing alphanumeric is left.
pub(crate) fn trim_joiners(piece: &str) -> Option<&str> {
    let keep_leading_dot = piece.starts_with('.')
        && !piece.starts_with("..")
        && piece[1..].starts_with(|c: char| c.is_alphabetic());

    let start = if keep_leading_dot {
        piece
    } else {
        piece.trim_start_matches(JOINERS)
    };
    let word = start.trim_end_matches(TRAILING_TRIM);

    if word.chars().any(char::is_alphanumeric) {
        Some(word)
    } else {
        None
    }
}

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
/// Never splits a multi-byte character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
