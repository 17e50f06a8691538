//! Tokenizer for the `{{OOP|note|class:method|field|counterpart}}` template.
//!
//! The template body may contain wiki links (`[[sound]]:setPanningEnabled`)
//! and unrelated nested templates inside the note, so a plain split on `|`
//! is not enough. Passes:
//! 1. split on `|`, `{{`, `}}`, `[[`, `]]`
//! 2. classify the structural literals
//! 3. mark link bodies and demote nested templates
//! 4. assign content kinds by delimiter position
//! 5. merge neighbours and trim

use lazy_regex::regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::tokens::{Token, concat_neighbours, split_keep_delimiters};
use crate::wikitext::errors::{Result, WikiError};

/// Maximum number of `|` in a well formed template.
pub const MAX_DELIMITERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OopTokenKind {
    /// `{{`
    Start,
    /// `}}`
    End,
    /// `[[`
    ReferenceStart,
    /// `]]`
    ReferenceEnd,
    ReferenceBody,
    /// `|`
    Delimiter,
    /// The `OOP` keyword.
    Unused,
    Note,
    Method,
    Field,
    CounterpartMethod,
    Undefined,
}

impl OopTokenKind {
    pub const CONTENT: [OopTokenKind; 5] = [
        OopTokenKind::Unused,
        OopTokenKind::Note,
        OopTokenKind::Method,
        OopTokenKind::Field,
        OopTokenKind::CounterpartMethod,
    ];

    pub fn from_literal(value: &str) -> OopTokenKind {
        match value {
            "{{" => OopTokenKind::Start,
            "}}" => OopTokenKind::End,
            "[[" => OopTokenKind::ReferenceStart,
            "]]" => OopTokenKind::ReferenceEnd,
            "|" => OopTokenKind::Delimiter,
            _ => OopTokenKind::Undefined,
        }
    }

    /// Content kind for the text after `delimiters` pipes.
    pub fn content_at(delimiters: usize) -> Option<OopTokenKind> {
        Self::CONTENT.get(delimiters).copied()
    }
}

impl fmt::Display for OopTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OopTokenKind::Start => "Start",
            OopTokenKind::End => "End",
            OopTokenKind::ReferenceStart => "ReferenceStart",
            OopTokenKind::ReferenceEnd => "ReferenceEnd",
            OopTokenKind::ReferenceBody => "ReferenceBody",
            OopTokenKind::Delimiter => "Delimiter",
            OopTokenKind::Unused => "Unused",
            OopTokenKind::Note => "Note",
            OopTokenKind::Method => "Method",
            OopTokenKind::Field => "Field",
            OopTokenKind::CounterpartMethod => "CounterpartMethod",
            OopTokenKind::Undefined => "Undefined",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OopTokenKind {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(OopTokenKind::Start),
            "end" => Ok(OopTokenKind::End),
            "referencestart" => Ok(OopTokenKind::ReferenceStart),
            "referenceend" => Ok(OopTokenKind::ReferenceEnd),
            "referencebody" => Ok(OopTokenKind::ReferenceBody),
            "delimiter" | "pipe" => Ok(OopTokenKind::Delimiter),
            "unused" => Ok(OopTokenKind::Unused),
            "note" | "description" => Ok(OopTokenKind::Note),
            "method" => Ok(OopTokenKind::Method),
            "field" | "variable" => Ok(OopTokenKind::Field),
            "counterpartmethod" | "counterpart" => Ok(OopTokenKind::CounterpartMethod),
            "undefined" => Ok(OopTokenKind::Undefined),
            other => Err(format!("unknown OopTokenKind '{}'", other)),
        }
    }
}

pub type OopToken = Token<OopTokenKind>;

/// Tokenize an OOP template.
pub fn tokenize_oop(code: &str) -> Result<Vec<OopToken>> {
    let tokens = split_oop(code);
    let tokens = mark_references(tokens);
    let tokens = demote_nested_templates(tokens);
    check_delimiters(&tokens, code)?;
    let tokens = assign_content(tokens, code)?;

    if let Some(token) = tokens.iter().find(|t| t.is(OopTokenKind::Undefined)) {
        return Err(WikiError::oop_tokenize(
            format!("Unclassified token '{}'", token.value),
            code,
        ));
    }

    Ok(concat_neighbours(tokens, &OopTokenKind::CONTENT)
        .into_iter()
        .map(|t| {
            let value = t.value.trim().to_string();
            OopToken::new(t.kind, value)
        })
        .collect())
}

/// Split and classify the structural literals.
pub fn split_oop(code: &str) -> Vec<OopToken> {
    let delimiters = regex!(r"(\||\{\{|\}\}|\[\[|\]\])");
    split_keep_delimiters(code, delimiters)
        .into_iter()
        .map(|value| OopToken::new(OopTokenKind::from_literal(&value), value))
        .collect()
}

/// Everything between `[[` and `]]` is a link body, pipes included.
pub fn mark_references(tokens: Vec<OopToken>) -> Vec<OopToken> {
    let mut depth = 0usize;
    tokens
        .into_iter()
        .map(|token| match token.kind {
            OopTokenKind::ReferenceStart => {
                depth += 1;
                token
            }
            OopTokenKind::ReferenceEnd => {
                depth = depth.saturating_sub(1);
                token
            }
            _ if depth > 0 => token.with_kind(OopTokenKind::ReferenceBody),
            _ => token,
        })
        .collect()
}

/// Only the outermost `{{ }}` pair is structural. Nested pairs and
/// everything inside them become `Undefined`, to be picked up as content.
pub fn demote_nested_templates(tokens: Vec<OopToken>) -> Vec<OopToken> {
    let mut depth: i32 = -1;
    tokens
        .into_iter()
        .map(|token| match token.kind {
            OopTokenKind::Start => {
                let nested = depth >= 0;
                depth += 1;
                if nested {
                    token.with_kind(OopTokenKind::Undefined)
                } else {
                    token
                }
            }
            OopTokenKind::End => {
                depth -= 1;
                if depth >= 0 {
                    token.with_kind(OopTokenKind::Undefined)
                } else {
                    token
                }
            }
            _ if depth > 0 => token.with_kind(OopTokenKind::Undefined),
            _ => token,
        })
        .collect()
}

fn check_delimiters(tokens: &[OopToken], code: &str) -> Result<()> {
    let count = tokens.iter().filter(|t| t.is(OopTokenKind::Delimiter)).count();
    if count > MAX_DELIMITERS {
        return Err(WikiError::oop_tokenize(
            format!("Too many delimiters: {} (max {})", count, MAX_DELIMITERS),
            code,
        ));
    }
    Ok(())
}

/// Map non-structural tokens to content kinds by how many pipes precede them.
pub fn assign_content(tokens: Vec<OopToken>, code: &str) -> Result<Vec<OopToken>> {
    let mut delimiters = 0usize;
    tokens
        .into_iter()
        .map(|token| match token.kind {
            OopTokenKind::Start | OopTokenKind::End => Ok(token),
            OopTokenKind::Delimiter => {
                delimiters += 1;
                Ok(token)
            }
            _ => match OopTokenKind::content_at(delimiters) {
                Some(kind) => Ok(token.with_kind(kind)),
                None => Err(WikiError::oop_tokenize(
                    format!("Unexpected content '{}' after the last field", token.value),
                    code,
                )),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::OopTokenKind::*;

    fn content(tokens: &[OopToken]) -> Vec<(OopTokenKind, &str)> {
        tokens
            .iter()
            .filter(|t| OopTokenKind::CONTENT.contains(&t.kind))
            .map(|t| (t.kind, t.value.as_str()))
            .collect()
    }

    #[test]
    fn nested_template_in_note() {
        let tokens = tokenize_oop(
            "{{ OOP | As of MTA: SA {{Current Version|master}} the counterpart is not implemented yet. | [[browser]]:setRenderingPaused | renderingPaused | isBrowserRenderingPaused }}",
        )
        .unwrap();
        assert_eq!(
            content(&tokens),
            vec![
                (Unused, "OOP"),
                (
                    Note,
                    "As of MTA: SA {{Current Version|master}} the counterpart is not implemented yet."
                ),
                (Method, "[[browser]]:setRenderingPaused"),
                (Field, "renderingPaused"),
                (CounterpartMethod, "isBrowserRenderingPaused"),
            ]
        );
        assert_eq!(tokens.first().map(|t| t.kind), Some(Start));
        assert_eq!(tokens.last().map(|t| t.kind), Some(End));
    }

    #[test]
    fn note_with_bold_markup() {
        let tokens = tokenize_oop(
            "{{OOP|The method name was incorrect (setPann'''n'''ingEnabled) before version '''1.5.8-9.20761.0'''.|[[sound]]:setPanningEnabled|panningEnabled|isSoundPanningEnabled}}",
        )
        .unwrap();
        assert_eq!(
            content(&tokens)[1],
            (
                Note,
                "The method name was incorrect (setPann'''n'''ingEnabled) before version '''1.5.8-9.20761.0'''."
            )
        );
        assert_eq!(content(&tokens)[2], (Method, "[[sound]]:setPanningEnabled"));
    }

    #[test]
    fn empty_note_and_trailing_pipe() {
        let tokens =
            tokenize_oop("{{OOP||[[blip]]:setVisibleDistance|visibleDistance|getBlipVisibleDistance|}}")
                .unwrap();
        assert_eq!(
            content(&tokens),
            vec![
                (Unused, "OOP"),
                (Method, "[[blip]]:setVisibleDistance"),
                (Field, "visibleDistance"),
                (CounterpartMethod, "getBlipVisibleDistance"),
            ]
        );
    }

    #[test]
    fn nested_template_at_the_end() {
        let tokens =
            tokenize_oop("{{OOP|{{Deprecated feature|3|1.0}}|[[element]]:getData}}").unwrap();
        let ends = tokens.iter().filter(|t| t.is(End)).count();
        assert_eq!(ends, 1);
        assert_eq!(content(&tokens)[1], (Note, "{{Deprecated feature|3|1.0}}"));

        let tokens = tokenize_oop("{{OOP||[[element]]:getData|{{x}}}}").unwrap();
        assert_eq!(tokens.last().map(|t| t.value.as_str()), Some("}}"));
        assert_eq!(content(&tokens).last().copied(), Some((Field, "{{x}}")));
    }

    #[test]
    fn pipes_inside_links_are_not_delimiters() {
        let tokens = tokenize_oop("{{OOP|See [[Foo|the foo page]]|[[bar]]:baz}}").unwrap();
        assert_eq!(content(&tokens)[1], (Note, "See [[Foo|the foo page]]"));
        assert_eq!(content(&tokens)[2], (Method, "[[bar]]:baz"));
    }

    #[test]
    fn too_many_delimiters() {
        let err = tokenize_oop("{{OOP|a|b|c|d|e|f}}").unwrap_err();
        assert_eq!(err.kind(), "OOPTokenizeError");
    }

    #[test]
    fn content_after_last_field() {
        assert!(tokenize_oop("{{OOP|a|b:c|d|e|f}}").is_err());
    }
}
