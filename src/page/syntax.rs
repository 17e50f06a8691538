//! Locating the code blocks of a page: section choice, the signature block
//! and the OOP template.

use itertools::Itertools;
use lazy_regex::{regex_captures, regex_replace};

use crate::page::side::RawSide;
use crate::wikitext::errors::{Result, WikiError};
use crate::wikitext::wiki_text::{Section, WikiText};

/// First section whose title contains `query`.
///
/// A miss on a page split by `<section>` blocks means the split went wrong
/// and is an error. Anywhere else it is only logged.
pub fn pick_section<'w>(
    wiki: &'w WikiText,
    query: &str,
    sides: &RawSide,
    page: &str,
) -> Result<Option<&'w Section>> {
    let found = wiki.sections_title_contains(query);
    if found.len() > 1 {
        log::debug!(
            "[Section/{}]: {} sections match '{}', using the first",
            page,
            found.len(),
            query
        );
    }

    match found.first() {
        Some(section) => Ok(Some(*section)),
        None if sides.is_split() => Err(WikiError::section_not_found(query)),
        None => {
            log::warn!("[Section/{}]: No '{}' section", page, query);
            Ok(None)
        }
    }
}

/// Body of the first `<syntaxhighlight>` block.
pub fn pick_signature_code(text: &str) -> Option<String> {
    regex_captures!(r"<syntaxhighlight[^>]*>([\s\S]+?)</syntaxhighlight>", text)
        .map(|(_, code)| code.trim().to_string())
        .filter(|code| !code.is_empty())
}

/// One line of code with Lua comments dropped and whitespace collapsed.
pub fn clean_code(code: &str) -> String {
    code.lines()
        .map(|line| regex_replace!(r"--.*$", line, ""))
        .join(" ")
        .split_whitespace()
        .join(" ")
}

/// Raw text of the first `{{OOP...}}` template.
pub fn pick_oop_code(text: &str, page: &str) -> Option<String> {
    let wiki = WikiText::parse(text).with_page_name(page);
    let template = wiki.template_startswith("OOP")?;

    if template.raw.contains('\n') {
        log::warn!("[OOP/{}]: Template spans multiple lines", page);
    }
    Some(template.raw.lines().map(str::trim).join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::enums::Side;

    fn plain(raw: &str) -> RawSide {
        RawSide::new(Side::Client, None, Some(raw.to_string()))
    }

    #[test]
    fn first_section_wins() {
        let raw = "lead\n==Syntax==\na\n==Syntax 2==\nb\n";
        let wiki = WikiText::parse(raw);
        let section = pick_section(&wiki, "syntax", &plain(raw), "p").unwrap();
        assert_eq!(section.map(|s| s.title.as_deref()), Some(Some("Syntax")));
    }

    #[test]
    fn soft_miss_outside_split_pages() {
        let raw = "lead\n==Example==\na\n";
        let wiki = WikiText::parse(raw);
        assert!(pick_section(&wiki, "syntax", &plain(raw), "p").unwrap().is_none());
    }

    #[test]
    fn hard_miss_on_split_pages() {
        let sides = RawSide::sectioned("same".to_string(), "same".to_string());
        let wiki = WikiText::parse("nothing here");
        let err = pick_section(&wiki, "syntax", &sides, "p").unwrap_err();
        assert_eq!(err.kind(), "SectionNotFoundError");
    }

    #[test]
    fn signature_code_block() {
        let text = "x\n<syntaxhighlight lang=\"lua\">\nbool setElementData ( element theElement )\n</syntaxhighlight>\n<syntaxhighlight lang=\"lua\">other</syntaxhighlight>";
        assert_eq!(
            pick_signature_code(text).as_deref(),
            Some("bool setElementData ( element theElement )")
        );
        assert_eq!(pick_signature_code("no code"), None);
    }

    #[test]
    fn code_is_flattened() {
        let code = "bool   foo ( int a, -- first\n    int b )\n";
        assert_eq!(clean_code(code), "bool foo ( int a, int b )");
    }

    #[test]
    fn oop_template_is_found() {
        let text = "{{Note|x}}\n{{OOP||[[player]]:getName|name|setPlayerName}}\n";
        assert_eq!(
            pick_oop_code(text, "p").as_deref(),
            Some("{{OOP||[[player]]:getName|name|setPlayerName}}")
        );
        assert_eq!(pick_oop_code("{{Note|x}}", "p"), None);
    }

    #[test]
    fn multi_line_oop_template_is_joined() {
        let text = "{{OOP|\n|[[player]]:getName\n|name}}";
        assert_eq!(
            pick_oop_code(text, "p").as_deref(),
            Some("{{OOP| |[[player]]:getName |name}}")
        );
    }
}
