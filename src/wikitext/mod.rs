//! Page markup: sections, templates and the shared error and enum types.

pub mod enums;
pub mod errors;
pub mod templates;
pub mod wiki_text;

pub use enums::{EngineSide, PageKind, QueryType, Side};
pub use errors::{Result, WikiError};
pub use templates::TemplateSpan;
pub use wiki_text::{Section, WikiText};
