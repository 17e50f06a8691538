//! Documentation text for a page: description, per-argument notes and the
//! return value description.
//!
//! The wiki text is only lightly cleaned: template/heading/comment lines are
//! dropped and quote/bracket markup is removed. Everything else is passed to
//! the code generator verbatim.

use indexmap::IndexMap;
use itertools::Itertools;
use lazy_regex::{regex, regex_captures, regex_is_match, regex_replace_all};

use crate::definitions::FunctionDoc;
use crate::wikitext::templates::find_templates;
use crate::wikitext::wiki_text::{Section, WikiText};

/// Strip quote and bracket markup.
pub fn clean_line(line: &str) -> String {
    regex_replace_all!(r#"[\[\]'"]"#, line, "").trim().to_string()
}

/// Lines that carry no documentation.
pub fn line_can_be_skipped(line: &str) -> bool {
    if line.is_empty() || line == "}}" {
        return true;
    }
    if line.starts_with('=') || line.starts_with("<!--") || line.ends_with("-->") {
        return true;
    }
    if line.starts_with("{{") {
        return true;
    }
    regex_is_match!(r"^</?\w+[^>]*>$", line)
        || regex_is_match!(r"^\[\[.+\]\]$", line)
        || regex_is_match!(r"(?i)^.?.?.?None", line)
        || regex_is_match!(r"(?i)^.+no arguments.+", line)
}

/// Trim every line, drop skippable ones and clean the rest.
pub fn filter_raw_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line_can_be_skipped(line))
        .map(clean_line)
        .join("\n")
        .trim()
        .to_string()
}

/// Lead text of the page without `__NOTOC__` and the side marker template.
pub fn description_doc(wiki: &WikiText) -> String {
    let Some(lead) = wiki.lead() else {
        return String::new();
    };
    let mut text = regex_replace_all!(r"(?i)__NOTOC__\n?", &lead.text, "").to_string();
    if let Some(marker) = find_templates(&text).into_iter().next() {
        text = text.replacen(&marker.raw, "", 1);
    }
    filter_raw_text(&text)
}

/// Argument notes of one section, plus lines that belong to no argument.
///
/// An argument starts with a bold name line (`*'''thePlayer:''' ...`);
/// following lines extend the last argument.
pub fn section_to_args(page: &str, section: &Section) -> (IndexMap<String, String>, String) {
    let mut result: IndexMap<String, String> = IndexMap::new();
    let mut misc: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let title = section.title.as_deref().unwrap_or_default().to_lowercase();

    for line in section.text.lines().map(str::trim) {
        if line_can_be_skipped(line) {
            continue;
        }

        let Some((whole, name)) = regex_captures!(r"\* *'+([^':]+):?'+", line) else {
            match current.as_ref().and_then(|name| result.get_mut(name)) {
                Some(doc) => {
                    doc.push('\n');
                    doc.push_str(&clean_line(line));
                }
                None => {
                    if !title.contains("optional") {
                        log::warn!("[Docs/{}]: Undetermined line in '{}'", page, title);
                    }
                    misc.push(clean_line(line));
                }
            }
            continue;
        };

        let name = clean_line(name);
        let rest = line.find(whole).map_or("", |pos| &line[pos + whole.len()..]);
        result.insert(name.clone(), clean_line(rest));
        current = Some(name);
    }

    for doc in result.values_mut() {
        *doc = doc.trim().to_string();
    }
    (result, misc.join("\n"))
}

/// Argument notes for a page side.
///
/// Sections titled `...argument...` are preferred. Event pages only have a
/// `Parameters` section, whose code block is dropped first.
pub fn arguments_doc(page: &str, wiki: &WikiText) -> (IndexMap<String, String>, String) {
    let mut sections: Vec<Section> = wiki
        .sections_title_contains("argument")
        .into_iter()
        .cloned()
        .collect();
    if sections.is_empty() {
        let code = regex!(r"<syntaxhighlight[^>]*>([\s\S]+?)</syntaxhighlight>");
        sections = wiki
            .sections_title_contains("parameters")
            .into_iter()
            .map(|section| Section {
                text: code.replace_all(&section.text, "").to_string(),
                ..section.clone()
            })
            .collect();
    }

    let mut arguments = IndexMap::new();
    let mut misc = Vec::new();
    for section in &sections {
        let (partial, rest) = section_to_args(page, section);
        arguments.extend(partial);
        misc.push(rest);
    }
    (arguments, filter_raw_text(&misc.join("\n")))
}

/// Return value notes. The text keeps its case; it is not lowercased.
pub fn returns_doc(wiki: &WikiText) -> String {
    let text = wiki
        .sections_title_contains("return")
        .iter()
        .map(|section| section.text.as_str())
        .join("\n");
    filter_raw_text(&text)
}

/// Assemble the docs for one page side.
pub fn function_doc(page: &str, description: &str, wiki: &WikiText) -> FunctionDoc {
    let (arguments, misc) = arguments_doc(page, wiki);
    FunctionDoc {
        description: format!("{}\n{}", description, misc).trim().to_string(),
        arguments,
        result: returns_doc(wiki),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{{Server client function}}
__NOTOC__
This function returns a string containing the name of the specified player.

==Syntax==
<syntaxhighlight lang="lua">
string getPlayerName ( player thePlayer )
</syntaxhighlight>

===Required Arguments===
*'''thePlayer:''' the [[player]] you want to get the name of
which must be valid.

===Optional Arguments===
{{OptionalArg}}
*'''extra:''' unused

===Returns===
Returns a ''string'' containing the requested player's name, ''false'' if the player passed to the function is invalid.

==Example==
Some example.
"#;

    #[test]
    fn skip_rules() {
        assert!(line_can_be_skipped(""));
        assert!(line_can_be_skipped("}}"));
        assert!(line_can_be_skipped("==Syntax=="));
        assert!(line_can_be_skipped("<!-- comment -->"));
        assert!(line_can_be_skipped("{{Client function}}"));
        assert!(line_can_be_skipped("[[Category:Foo]]"));
        assert!(line_can_be_skipped("<section name=\"Server\" class=\"server\" show=\"true\">"));
        assert!(line_can_be_skipped("''None''"));
        assert!(line_can_be_skipped("This event has no arguments at all."));
        assert!(!line_can_be_skipped("Returns true."));
    }

    #[test]
    fn clean_line_strips_markup() {
        assert_eq!(clean_line(" the [[player]] 'x' \"y\" "), "the player x y");
    }

    #[test]
    fn description_from_lead() {
        let wiki = WikiText::parse(PAGE);
        assert_eq!(
            description_doc(&wiki),
            "This function returns a string containing the name of the specified player."
        );
    }

    #[test]
    fn argument_docs_follow_names() {
        let wiki = WikiText::parse(PAGE);
        let (args, misc) = arguments_doc("getPlayerName", &wiki);
        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["thePlayer", "extra"]);
        assert_eq!(
            args["thePlayer"],
            "the player you want to get the name of\nwhich must be valid."
        );
        assert_eq!(args["extra"], "unused");
        assert_eq!(misc, "");
    }

    #[test]
    fn return_docs() {
        let wiki = WikiText::parse(PAGE);
        assert_eq!(
            returns_doc(&wiki),
            "Returns a string containing the requested players name, false if the player passed to the function is invalid."
        );
    }

    #[test]
    fn parameters_section_without_code() {
        let page = "{{Client event}}\nFired on click.\n==Parameters==\n<syntaxhighlight lang=\"lua\">\nstring button, string state\n</syntaxhighlight>\n*'''button:''' the mouse button\n*'''state:''' up or down\n==Source==\nx\n";
        let wiki = WikiText::parse(page);
        let (args, _) = arguments_doc("onClientClick", &wiki);
        assert_eq!(args.len(), 2);
        assert_eq!(args["button"], "the mouse button");
        assert_eq!(args["state"], "up or down");
    }

    #[test]
    fn assembled_doc() {
        let wiki = WikiText::parse(PAGE);
        let doc = function_doc("getPlayerName", "Desc.", &wiki);
        assert_eq!(doc.description, "Desc.");
        assert_eq!(doc.arguments.len(), 2);
        assert!(doc.result.starts_with("Returns a string"));
    }
}
