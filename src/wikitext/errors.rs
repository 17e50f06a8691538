//! Error types shared by the tokenizers, parsers and page pipeline.
//!
//! Exported items:
//! - `WikiError` - main error enum. Every variant is page scoped: the caller is
//!    expected to log it and move on to the next page.
//! - `Result<T>` - convenient alias `std::result::Result<T, WikiError>`.
//!
//! Errors raised deep inside the tokenizers do not know which page they came
//! from, so the page pipeline wraps them with `WikiError::in_page`.

use std::error::Error;
use std::fmt;

/// The canonical result type used across the crate.
pub type Result<T> = std::result::Result<T, WikiError>;

/// Error with rich variants.
///
/// - `Tokenize` - malformed signature. Carries the raw signature.
/// - `SignatureParse` - token stream accepted by the tokenizer but rejected by
///    the parser (eg: unbalanced optional markers).
/// - `OopTokenize` / `OopParse` - problems in the `{{OOP|...}}` template.
/// - `SectionNotFound` - a wiki section is required but missing.
/// - `SharedSectionMissing` - a shared page has `<section>` markers but one
///    side is missing.
/// - `UnknownSide` - no side marker template was found.
/// - `SignatureNotFound` - the syntax section has no code block.
/// - `Page` - any of the above, tagged with the page it came from.
#[derive(Debug)]
pub enum WikiError {
    Tokenize {
        msg: String,
        signature: String,
    },
    SignatureParse {
        msg: String,
        signature: String,
    },
    OopTokenize {
        msg: String,
        code: String,
    },
    OopParse {
        msg: String,
    },
    SectionNotFound {
        section: String,
    },
    SharedSectionMissing {
        section: String,
    },
    UnknownSide {
        /// `function` or `event`
        kind: String,
    },
    SignatureNotFound {
        section: String,
    },
    Config {
        msg: String,
    },
    Io {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
    Json {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
    Page {
        page: String,
        source: Box<WikiError>,
    },
}

impl WikiError {
    pub fn tokenize<S: Into<String>>(msg: S, signature: &str) -> Self {
        WikiError::Tokenize {
            msg: msg.into(),
            signature: signature.to_string(),
        }
    }

    pub fn signature_parse<S: Into<String>>(msg: S, signature: &str) -> Self {
        WikiError::SignatureParse {
            msg: msg.into(),
            signature: signature.to_string(),
        }
    }

    pub fn oop_tokenize<S: Into<String>>(msg: S, code: &str) -> Self {
        WikiError::OopTokenize {
            msg: msg.into(),
            code: code.to_string(),
        }
    }

    pub fn oop_parse<S: Into<String>>(msg: S) -> Self {
        WikiError::OopParse { msg: msg.into() }
    }

    pub fn section_not_found<S: Into<String>>(section: S) -> Self {
        WikiError::SectionNotFound {
            section: section.into(),
        }
    }

    pub fn shared_section_missing<S: Into<String>>(section: S) -> Self {
        WikiError::SharedSectionMissing {
            section: section.into(),
        }
    }

    pub fn unknown_side<S: Into<String>>(kind: S) -> Self {
        WikiError::UnknownSide { kind: kind.into() }
    }

    pub fn signature_not_found<S: Into<String>>(section: S) -> Self {
        WikiError::SignatureNotFound {
            section: section.into(),
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        WikiError::Config { msg: msg.into() }
    }

    /// Wrap a std::io::Error or other error as an Io variant.
    pub fn io_err<E: Error + Send + Sync + 'static>(msg: impl Into<String>, e: E) -> Self {
        WikiError::Io {
            msg: msg.into(),
            source: Some(Box::new(e)),
        }
    }

    /// Tag the error with the page it was raised for.
    ///
    /// Errors that already carry a page are returned untouched so the
    /// innermost (most precise) page name wins.
    pub fn in_page<S: Into<String>>(self, page: S) -> Self {
        match self {
            WikiError::Page { .. } => self,
            other => WikiError::Page {
                page: page.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with any page tag removed.
    pub fn root(&self) -> &WikiError {
        match self {
            WikiError::Page { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns a short, user-friendly description of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WikiError::Tokenize { .. } => "TokenizeError",
            WikiError::SignatureParse { .. } => "SignatureParseError",
            WikiError::OopTokenize { .. } => "OOPTokenizeError",
            WikiError::OopParse { .. } => "OOPParseError",
            WikiError::SectionNotFound { .. } => "SectionNotFoundError",
            WikiError::SharedSectionMissing { .. } => "SharedSectionMissingError",
            WikiError::UnknownSide { .. } => "UnknownSideError",
            WikiError::SignatureNotFound { .. } => "SignatureNotFoundError",
            WikiError::Config { .. } => "ConfigError",
            WikiError::Io { .. } => "Io",
            WikiError::Json { .. } => "Json",
            WikiError::Page { source, .. } => source.kind(),
        }
    }

    /// If the error has an underlying source, return it (if any).
    pub fn source_opt(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WikiError::Io { source, .. } | WikiError::Json { source, .. } => {
                source.as_ref().map(|b| b.as_ref() as &dyn Error)
            }
            WikiError::Page { source, .. } => Some(source.as_ref() as &dyn Error),
            _ => None,
        }
    }
}

impl fmt::Display for WikiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WikiError::Tokenize { msg, signature } => {
                write!(f, "Tokenize error: {} (signature: `{}`)", msg, signature)
            }
            WikiError::SignatureParse { msg, signature } => {
                write!(f, "Signature parse error: {} (signature: `{}`)", msg, signature)
            }
            WikiError::OopTokenize { msg, code } => {
                write!(f, "OOP tokenize error: {} (code: `{}`)", msg, code)
            }
            WikiError::OopParse { msg } => write!(f, "OOP parse error: {}", msg),
            WikiError::SectionNotFound { section } => {
                write!(f, "Section not found: '{}'", section)
            }
            WikiError::SharedSectionMissing { section } => {
                write!(f, "Shared page is missing its <section class=\"{}\">", section)
            }
            WikiError::UnknownSide { kind } => write!(f, "Cannot find {} type", kind),
            WikiError::SignatureNotFound { section } => {
                write!(f, "No signature code found in '{}' section", section)
            }
            WikiError::Config { msg } => write!(f, "Config error: {}", msg),
            WikiError::Io { msg, source } => {
                if let Some(s) = source {
                    write!(f, "IO error: {} (cause: {})", msg, s)
                } else {
                    write!(f, "IO error: {}", msg)
                }
            }
            WikiError::Json { msg, source } => {
                if let Some(s) = source {
                    write!(f, "JSON error: {} (cause: {})", msg, s)
                } else {
                    write!(f, "JSON error: {}", msg)
                }
            }
            WikiError::Page { page, source } => write!(f, "[{}] {}", page, source),
        }
    }
}

impl Error for WikiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source_opt()
    }
}

/* Common conversions to make error propagation ergonomic. */

impl From<std::io::Error> for WikiError {
    fn from(e: std::io::Error) -> Self {
        WikiError::io_err("I/O error", e)
    }
}

impl From<serde_json::Error> for WikiError {
    fn from(e: serde_json::Error) -> Self {
        WikiError::Json {
            msg: "serialization failed".to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<url::ParseError> for WikiError {
    fn from(e: url::ParseError) -> Self {
        WikiError::config(format!("invalid url: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_tokenize_error_includes_signature() {
        let e = WikiError::tokenize("Multiple open brackets", "bool a((int b)");
        let s = format!("{}", e);
        assert!(s.contains("Multiple open brackets"));
        assert!(s.contains("bool a((int b)"));
        assert_eq!(e.kind(), "TokenizeError");
    }

    #[test]
    fn page_wrapping_keeps_kind_and_innermost_page() {
        let e = WikiError::unknown_side("function")
            .in_page("getPlayerName")
            .in_page("ignored");
        assert_eq!(e.kind(), "UnknownSideError");
        assert!(format!("{}", e).starts_with("[getPlayerName]"));
        assert!(matches!(e.root(), WikiError::UnknownSide { .. }));
        assert!(e.source().is_some());
    }

    #[test]
    fn io_conversion_has_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "oh no");
        let e: WikiError = io_err.into();
        let s = format!("{}", e);
        assert!(s.contains("I/O error"));
        assert!(s.contains("oh no"));
    }
}
