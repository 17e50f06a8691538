//! Locating `{{...}}` templates inside raw wiki markup.
//!
//! Only the pieces the pipeline needs are modelled: a template's name and its
//! raw text (braces included). Arguments are left to the dedicated OOP
//! tokenizer, which has its own rules for nested links and templates.

use serde::{Deserialize, Serialize};

/// A top-level template found in a piece of markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpan {
    /// Text before the first top-level `|`, trimmed.
    pub name: String,
    /// The full template text, from `{{` to the matching `}}`.
    pub raw: String,
    /// Byte offset of the opening `{{` in the scanned text.
    pub start: usize,
}

/// Find the template starting at `start` (expects "{{").
///
/// Returns (consumed_bytes, TemplateSpan) when the matching `}}` exists.
/// Nested braces are counted, so `{{OOP|{{Current Version|master}}|...}}`
/// yields one span.
pub fn find_template_at(input: &str, start: usize) -> Option<(usize, TemplateSpan)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    if start + 1 >= len || bytes[start] != b'{' || bytes[start + 1] != b'{' {
        return None;
    }
    let mut idx = start + 2;
    let mut depth = 1usize;

    while idx < len {
        if idx + 1 < len && bytes[idx] == b'{' && bytes[idx + 1] == b'{' {
            depth += 1;
            idx += 2;
        } else if idx + 1 < len && bytes[idx] == b'}' && bytes[idx + 1] == b'}' {
            depth -= 1;
            idx += 2;
            if depth == 0 {
                break;
            }
        } else {
            // `{`/`}` are ascii, so stepping a byte at a time never lands
            // inside a multi-byte char when we slice at the brace positions.
            idx += 1;
        }
    }

    if depth != 0 {
        return None;
    }

    let raw = input.get(start..idx)?;
    let content = raw.get(2..raw.len() - 2)?;
    let name = match find_top_level_char(content, '|') {
        Some(pos) => &content[..pos],
        None => content,
    };

    Some((
        idx - start,
        TemplateSpan {
            name: name.trim().to_string(),
            raw: raw.to_string(),
            start,
        },
    ))
}

/// Collect every top-level template in `input`, in document order.
///
/// Nested templates are part of their parent's `raw` text and are not listed.
/// An unterminated template stops the scan.
pub fn find_templates(input: &str) -> Vec<TemplateSpan> {
    let mut found = Vec::new();
    let mut idx = 0usize;

    while let Some(offset) = input.get(idx..).and_then(|rest| rest.find("{{")) {
        let start = idx + offset;
        match find_template_at(input, start) {
            Some((consumed, span)) => {
                found.push(span);
                idx = start + consumed;
            }
            None => break,
        }
    }

    found
}

/// Find a top-level occurrence of `c` in `s` (not inside nested `{{ }}` or
/// `[[ ]]`).
///
/// Returns the byte index of the occurrence suitable for `split_at`.
pub fn find_top_level_char(s: &str, c: char) -> Option<usize> {
    let chs: Vec<(usize, char)> = s.char_indices().collect();
    let n = chs.len();
    let mut i = 0usize;
    let mut depth_brace = 0usize;
    let mut depth_bracket = 0usize;

    while i < n {
        let (byte_pos, ch) = chs[i];
        let next = chs.get(i + 1).map(|(_, ch)| *ch);
        match (ch, next) {
            ('{', Some('{')) => {
                depth_brace += 1;
                i += 2;
                continue;
            }
            ('}', Some('}')) => {
                depth_brace = depth_brace.saturating_sub(1);
                i += 2;
                continue;
            }
            ('[', Some('[')) => {
                depth_bracket += 1;
                i += 2;
                continue;
            }
            (']', Some(']')) => {
                depth_bracket = depth_bracket.saturating_sub(1);
                i += 2;
                continue;
            }
            _ => {}
        }

        if ch == c && depth_brace == 0 && depth_bracket == 0 {
            return Some(byte_pos);
        }
        i += 1;
    }
    None
}
