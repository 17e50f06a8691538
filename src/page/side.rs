//! Side detection and splitting.
//!
//! A page declares its side with a marker template on its own line
//! (`{{Client function}}`, `{{Server client function}}`, `{{Server event}}`).
//! Shared pages either document both engines with one text, or carry
//! `<section class="server">` / `<section class="client">` blocks.

use lazy_regex::{regex, regex_is_match};
use serde::{Deserialize, Serialize};

use crate::wikitext::enums::{EngineSide, PageKind, Side};
use crate::wikitext::errors::{Result, WikiError};

/// Per-engine data with an explicit side tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideData<T> {
    pub side: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<T>,
    /// Set when a shared page carried its own `<section>` per engine.
    #[serde(skip)]
    pub split: bool,
}

/// Raw markup split per engine.
pub type RawSide = SideData<String>;

impl<T> SideData<T> {
    pub fn new(side: Side, server: Option<T>, client: Option<T>) -> Self {
        SideData {
            side,
            server,
            client,
            split: false,
        }
    }

    /// Shared data that came from per-engine `<section>` blocks.
    pub fn sectioned(server: T, client: T) -> Self {
        SideData {
            side: Side::Shared,
            server: Some(server),
            client: Some(client),
            split: true,
        }
    }

    pub fn get(&self, engine: EngineSide) -> Option<&T> {
        match engine {
            EngineSide::Server => self.server.as_ref(),
            EngineSide::Client => self.client.as_ref(),
        }
    }

    /// Present entries, server first.
    pub fn iter(&self) -> impl Iterator<Item = (EngineSide, &T)> {
        EngineSide::ALL
            .into_iter()
            .filter_map(move |engine| self.get(engine).map(|value| (engine, value)))
    }

    pub fn map<U, F>(self, mut f: F) -> SideData<U>
    where
        F: FnMut(EngineSide, T) -> U,
    {
        SideData {
            side: self.side,
            server: self.server.map(|v| f(EngineSide::Server, v)),
            client: self.client.map(|v| f(EngineSide::Client, v)),
            split: self.split,
        }
    }

    /// Like `map`, stopping at the first error.
    pub fn try_map<U, F>(self, mut f: F) -> Result<SideData<U>>
    where
        F: FnMut(EngineSide, T) -> Result<U>,
    {
        Ok(SideData {
            side: self.side,
            server: self.server.map(|v| f(EngineSide::Server, v)).transpose()?,
            client: self.client.map(|v| f(EngineSide::Client, v)).transpose()?,
            split: self.split,
        })
    }

    /// Was the shared page split by `<section>` blocks?
    pub fn is_split(&self) -> bool {
        self.split
    }
}

/// Lower-case, trim and drop anything after the first `}}`.
fn line_process(line: &str) -> String {
    let line = line.trim().to_lowercase();
    match line.find("}}") {
        Some(pos) => line[..pos].to_string(),
        None => line,
    }
}

/// Side declared by a single line, if it is a marker line.
pub fn side_from_line(line: &str, kind: PageKind) -> Option<Side> {
    let line = line_process(line);
    if !line.starts_with("{{") || !line.contains(kind.keyword()) {
        return None;
    }

    match kind {
        PageKind::Function => {
            if regex_is_match!(r"(server[_ ]client|shared)[_ ]function", &line) {
                Some(Side::Shared)
            } else if regex_is_match!(r"client[_ ]function", &line) {
                Some(Side::Client)
            } else if regex_is_match!(r"server[_ ]function", &line) {
                Some(Side::Server)
            } else {
                None
            }
        }
        PageKind::Event => {
            if regex_is_match!(r"client[_ ]event", &line) {
                Some(Side::Client)
            } else if regex_is_match!(r"server[_ ]event", &line) {
                Some(Side::Server)
            } else {
                None
            }
        }
    }
}

/// First marker line wins.
pub fn page_side(raw: &str, kind: PageKind) -> Result<Side> {
    raw.lines()
        .find_map(|line| side_from_line(line, kind))
        .ok_or_else(|| WikiError::unknown_side(kind.keyword()))
}

/// Split a shared page into its server and client text.
pub fn split_shared(raw: &str) -> Result<RawSide> {
    if raw.matches("<section").count() < 2 {
        return Ok(RawSide::new(
            Side::Shared,
            Some(raw.to_string()),
            Some(raw.to_string()),
        ));
    }

    let server = regex!(r#"(?i)<section.+class="server".*?>([\s\S]+?)</section>"#)
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| WikiError::shared_section_missing(EngineSide::Server.section_class()))?;
    let client = regex!(r#"(?i)<section.+class="client".*?>([\s\S]+?)</section>"#)
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| WikiError::shared_section_missing(EngineSide::Client.section_class()))?;

    Ok(RawSide::sectioned(
        server.as_str().to_string(),
        client.as_str().to_string(),
    ))
}

/// Classify a page and split it per engine.
pub fn split_sides(raw: &str, kind: PageKind) -> Result<RawSide> {
    match page_side(raw, kind)? {
        Side::Shared => split_shared(raw),
        Side::Client => Ok(RawSide::new(Side::Client, None, Some(raw.to_string()))),
        Side::Server => Ok(RawSide::new(Side::Server, Some(raw.to_string()), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_lines() {
        let f = PageKind::Function;
        assert_eq!(side_from_line("{{Server client function}}", f), Some(Side::Shared));
        assert_eq!(side_from_line("  {{Shared_function}} <!-- x -->", f), Some(Side::Shared));
        assert_eq!(side_from_line("{{Client function}}", f), Some(Side::Client));
        assert_eq!(side_from_line("{{Server function}}", f), Some(Side::Server));
        assert_eq!(side_from_line("Use {{Client function}}", f), None);
        assert_eq!(side_from_line("{{Deprecated|function}}", f), None);
        assert_eq!(side_from_line("{{Client event}}", PageKind::Event), Some(Side::Client));
        assert_eq!(side_from_line("{{Server event}}", PageKind::Event), Some(Side::Server));
        assert_eq!(side_from_line("{{Client function}}", PageKind::Event), None);
    }

    #[test]
    fn marker_after_closing_braces_is_ignored() {
        // Text after `}}` is not part of the marker.
        assert_eq!(
            side_from_line("{{Note}} client function", PageKind::Function),
            None
        );
    }

    #[test]
    fn first_marker_wins() {
        let raw = "__NOTOC__\n{{Client function}}\n{{Server function}}\n";
        assert_eq!(page_side(raw, PageKind::Function).unwrap(), Side::Client);
    }

    #[test]
    fn missing_marker_is_an_error() {
        let err = split_sides("no marker here", PageKind::Function).unwrap_err();
        assert_eq!(err.kind(), "UnknownSideError");
    }

    #[test]
    fn single_side_pages() {
        let raw = "{{Server function}}\ntext";
        let split = split_sides(raw, PageKind::Function).unwrap();
        assert_eq!(split.side, Side::Server);
        assert_eq!(split.get(EngineSide::Server).map(String::as_str), Some(raw));
        assert!(split.client.is_none());
        assert_eq!(split.iter().count(), 1);
    }

    #[test]
    fn shared_page_without_sections() {
        let raw = "{{Server client function}}\nsame for both";
        let split = split_sides(raw, PageKind::Function).unwrap();
        assert_eq!(split.server.as_deref(), Some(raw));
        assert_eq!(split.client.as_deref(), Some(raw));
        assert!(!split.is_split());
    }

    #[test]
    fn shared_page_with_sections() {
        let raw = "{{Server client function}}\n<section name=\"Server\" class=\"server\" show=\"true\">\nserver body\n</section>\n<section name=\"Client\" class=\"client\" show=\"true\">\nclient body\n</section>\n";
        let split = split_sides(raw, PageKind::Function).unwrap();
        assert_eq!(split.server.as_deref(), Some("\nserver body\n"));
        assert_eq!(split.client.as_deref(), Some("\nclient body\n"));
        assert_ne!(split.server, split.client);
        assert!(split.is_split());
        let engines: Vec<EngineSide> = split.iter().map(|(e, _)| e).collect();
        assert_eq!(engines, vec![EngineSide::Server, EngineSide::Client]);
    }

    #[test]
    fn shared_page_missing_client_section() {
        let raw = "{{Server client function}}\n<section name=\"Server\" class=\"server\" show=\"true\">\nserver body\n</section>\n<section name=\"Other\" class=\"other\">x</section>";
        let err = split_shared(raw).unwrap_err();
        assert_eq!(err.kind(), "SharedSectionMissingError");
        assert!(format!("{}", err).contains("client"));
    }

    #[test]
    fn identical_sections_still_count_as_split() {
        let raw = "{{Server client function}}\n<section name=\"Server\" class=\"server\" show=\"true\">\nsame\n</section>\n<section name=\"Client\" class=\"client\" show=\"true\">\nsame\n</section>\n";
        let split = split_sides(raw, PageKind::Function).unwrap();
        assert_eq!(split.server, split.client);
        assert!(split.is_split());
        assert!(split.map(|_, text| text.len()).is_split());
    }

    #[test]
    fn map_keeps_side() {
        let split = RawSide::new(Side::Client, None, Some("abc".to_string()));
        let lengths = split.map(|_, text| text.len());
        assert_eq!(lengths.side, Side::Client);
        assert_eq!(lengths.client, Some(3));
    }
}
