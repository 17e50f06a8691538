//! Enums used across the wiki parsing pipeline.
//!
//! - `QueryType` - strategies for matching section/template names.
//! - `Side` - which engine a page applies to (client, server or both).
//! - `EngineSide` - one concrete engine, used to address per-side data.
//! - `PageKind` - function page or event page.
//!
//! `PageKind` parses from config values (`functions`, `events`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a title or template name is compared against a query. Both sides
/// are trimmed and compared case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    StartsWith,
    Contains,
}

impl QueryType {
    pub fn matches(&self, candidate: &str, query: &str) -> bool {
        let candidate = candidate.trim().to_lowercase();
        let query = query.trim().to_lowercase();
        match self {
            QueryType::StartsWith => candidate.starts_with(&query),
            QueryType::Contains => candidate.contains(&query),
        }
    }
}

/// Which engine(s) a page documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Client,
    Server,
    /// Both engines. The page may or may not carry per-side `<section>` blocks.
    Shared,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Client => write!(f, "Client"),
            Side::Server => write!(f, "Server"),
            Side::Shared => write!(f, "Shared"),
        }
    }
}

/// A single engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineSide {
    Server,
    Client,
}

impl EngineSide {
    /// Both engines, server first.
    pub const ALL: [EngineSide; 2] = [EngineSide::Server, EngineSide::Client];

    /// The `class` attribute used by `<section>` blocks on shared pages.
    pub fn section_class(&self) -> &'static str {
        match self {
            EngineSide::Server => "server",
            EngineSide::Client => "client",
        }
    }
}

impl fmt::Display for EngineSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineSide::Server => write!(f, "Server"),
            EngineSide::Client => write!(f, "Client"),
        }
    }
}

/// The kind of page being parsed. Decides which marker template and which
/// syntax section is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Function,
    Event,
}

impl PageKind {
    /// Keyword expected in the side marker template (`{{Client function}}`).
    pub fn keyword(&self) -> &'static str {
        match self {
            PageKind::Function => "function",
            PageKind::Event => "event",
        }
    }

    /// Directory name inside the dump.
    pub fn dump_dir(&self) -> &'static str {
        match self {
            PageKind::Function => "functions",
            PageKind::Event => "events",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Function => write!(f, "Function"),
            PageKind::Event => write!(f, "Event"),
        }
    }
}

impl FromStr for PageKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "function" | "functions" => Ok(PageKind::Function),
            "event" | "events" => Ok(PageKind::Event),
            other => Err(format!("unknown PageKind '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn querytype_matches_ignores_case() {
        assert!(QueryType::Contains.matches("Required Arguments", "argument"));
        assert!(QueryType::StartsWith.matches(" OOP", "oop"));
        assert!(!QueryType::StartsWith.matches("Syntax (client)", "client"));
    }

    #[test]
    fn side_display() {
        assert_eq!(format!("{}", Side::Client), "Client");
        assert_eq!(format!("{}", EngineSide::Server), "Server");
        assert_eq!(EngineSide::Client.section_class(), "client");
    }

    #[test]
    fn pagekind_from_config_values() {
        assert_eq!(PageKind::from_str("events").unwrap(), PageKind::Event);
        assert_eq!(PageKind::from_str("Function").unwrap(), PageKind::Function);
        assert!(PageKind::from_str("templates").is_err());
        assert_eq!(PageKind::Function.keyword(), "function");
        assert_eq!(PageKind::Event.dump_dir(), "events");
    }
}
