//! Token machinery shared by the signature and OOP tokenizers.
//!
//! Both tokenizers split text on a delimiter regex (keeping the delimiters),
//! classify each fragment over several passes and finally glue neighbouring
//! fragments of the same kind back together.

use std::fmt;

use itertools::Itertools;
use regex::Regex;

/// A classified fragment of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K> {
    pub kind: K,
    pub value: String,
}

impl<K: Copy + PartialEq> Token<K> {
    pub fn new<S: Into<String>>(kind: K, value: S) -> Self {
        Token {
            kind,
            value: value.into(),
        }
    }

    /// Same value, different kind.
    pub fn with_kind(self, kind: K) -> Self {
        Token { kind, ..self }
    }

    pub fn is(&self, kind: K) -> bool {
        self.kind == kind
    }
}

impl<K: fmt::Display> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

/// Split `text` on `delimiters`, keeping each delimiter as its own fragment.
///
/// Empty and whitespace-only fragments are dropped. Non-delimiter fragments
/// are kept as-is (not trimmed).
pub fn split_keep_delimiters(text: &str, delimiters: &Regex) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut last = 0usize;
    for found in delimiters.find_iter(text) {
        fragments.push(&text[last..found.start()]);
        fragments.push(found.as_str());
        last = found.end();
    }
    fragments.push(&text[last..]);

    fragments
        .into_iter()
        .filter(|f| !f.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge adjacent tokens with the same kind, for kinds listed in `kinds`.
pub fn concat_neighbours<K: Copy + PartialEq>(tokens: Vec<Token<K>>, kinds: &[K]) -> Vec<Token<K>> {
    tokens
        .into_iter()
        .coalesce(|prev, next| {
            if prev.kind == next.kind && kinds.contains(&prev.kind) {
                Ok(Token::new(prev.kind, prev.value + &next.value))
            } else {
                Err((prev, next))
            }
        })
        .collect()
}

/// Compact `kind:value` rendering used by verbose logging.
pub fn render_tokens<K: fmt::Display>(tokens: &[Token<K>]) -> String {
    tokens.iter().map(|t| format!("[{}]", t)).join(" ")
}
