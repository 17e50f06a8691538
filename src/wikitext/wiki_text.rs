//! `WikiText`: raw page markup with lazily built section and template lists.
//!
//! - `WikiText::parse(input)` stores the text, nothing is computed yet.
//! - `sections()` / `templates()` compute once and cache.
//! - `find_sections(query, QueryType)` / `sections_title_contains(query)` look
//!    sections up by title.
//!
//! A titled section spans from its heading line to the next heading of the
//! same or a higher level, so `== Syntax ==` includes its `=== Returns ===`
//! subsection. Section 0 is the lead text before the first heading.

use std::sync::OnceLock;

use lazy_regex::regex;
use serde::{Deserialize, Serialize};

use crate::wikitext::enums::QueryType;
use crate::wikitext::templates::{TemplateSpan, find_templates};

/// One section of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text without the `=` markers. `None` for the lead section.
    pub title: Option<String>,
    /// Number of `=` around the heading, 0 for the lead section.
    pub level: usize,
    /// Byte range of the section in the page, heading line included.
    pub start: usize,
    pub end: usize,
    /// The section text, heading line included.
    pub text: String,
}

impl Section {
    /// Section text without its heading line.
    pub fn contents(&self) -> &str {
        if self.title.is_none() {
            return &self.text;
        }
        match self.text.find('\n') {
            Some(pos) => &self.text[pos + 1..],
            None => "",
        }
    }
}

/// Wrapper around a page's markup that lazily splits it into sections.
#[derive(Debug, Clone)]
pub struct WikiText {
    /// Raw page text (canonical source of truth)
    pub raw: String,

    /// Name of the page, used in log lines. Optional as we might only parse
    /// part of a page sometimes.
    pub page_name: Option<String>,

    sections_cache: OnceLock<Vec<Section>>,
    templates_cache: OnceLock<Vec<TemplateSpan>>,
}

impl WikiText {
    /// Create a lazy `WikiText` wrapper around the raw text.
    /// Nothing is parsed at construction time.
    pub fn parse(input: &str) -> Self {
        WikiText {
            raw: input.to_string(),
            page_name: None,
            sections_cache: OnceLock::new(),
            templates_cache: OnceLock::new(),
        }
    }

    pub fn with_page_name<S: Into<String>>(mut self, page_name: S) -> Self {
        self.page_name = Some(page_name.into());
        self
    }

    /// All sections, lead first. Computed once.
    pub fn sections(&self) -> &[Section] {
        self.sections_cache.get_or_init(|| split_sections(&self.raw))
    }

    /// All top-level templates in document order. Computed once.
    pub fn templates(&self) -> &[TemplateSpan] {
        self.templates_cache.get_or_init(|| find_templates(&self.raw))
    }

    /// The lead section (text before the first heading).
    pub fn lead(&self) -> Option<&Section> {
        self.sections().first().filter(|s| s.title.is_none())
    }

    /// Sections whose title matches `query`, in document order.
    pub fn find_sections(&self, query: &str, mode: QueryType) -> Vec<&Section> {
        self.sections()
            .iter()
            .filter(|s| s.title.as_deref().is_some_and(|t| mode.matches(t, query)))
            .collect()
    }

    /// Sections whose title contains `expected` (case-insensitive).
    pub fn sections_title_contains(&self, expected: &str) -> Vec<&Section> {
        self.find_sections(expected, QueryType::Contains)
    }

    /// First top-level template whose name starts with `name` (case-insensitive).
    pub fn template_startswith(&self, name: &str) -> Option<&TemplateSpan> {
        if name.trim().is_empty() {
            return None;
        }
        self.templates()
            .iter()
            .find(|t| QueryType::StartsWith.matches(&t.name, name))
    }
}

struct Heading {
    start: usize,
    level: usize,
    title: String,
}

fn find_headings(raw: &str) -> Vec<Heading> {
    let re = regex!(r"(?m)^(=+)[ \t]*(.+?)[ \t]*(=+)[ \t\r]*$");
    re.captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let open = caps.get(1)?.as_str().len();
            let close = caps.get(3)?.as_str().len();
            let level = open.min(close);
            // Uneven markers keep the extra `=` as part of the title.
            let title = format!(
                "{}{}{}",
                "=".repeat(open - level),
                caps.get(2)?.as_str(),
                "=".repeat(close - level)
            );
            let title = title.trim().to_string();
            if title.chars().all(|c| c == '=') {
                return None;
            }
            Some(Heading {
                start: whole.start(),
                level,
                title,
            })
        })
        .collect()
}

fn split_sections(raw: &str) -> Vec<Section> {
    let headings = find_headings(raw);
    let lead_end = headings.first().map_or(raw.len(), |h| h.start);

    let mut sections = vec![Section {
        title: None,
        level: 0,
        start: 0,
        end: lead_end,
        text: raw[..lead_end].to_string(),
    }];

    for (index, heading) in headings.iter().enumerate() {
        let end = headings[index + 1..]
            .iter()
            .find(|next| next.level <= heading.level)
            .map_or(raw.len(), |next| next.start);
        sections.push(Section {
            title: Some(heading.title.clone()),
            level: heading.level,
            start: heading.start,
            end,
            text: raw[heading.start..end].to_string(),
        });
    }

    sections
}
