//! Page pipeline: raw wiki markup of one function or event page in,
//! per-side structured data out.
//!
//! Every error raised while handling a page is tagged with the page name, so
//! the caller can log it and move on.

pub mod docs;
pub mod side;
pub mod syntax;

use lazy_regex::regex;

use crate::config::Config;
use crate::definitions::{EventData, FunctionData, FunctionDoc, PageUrl};
use crate::oop::parse_oop;
use crate::signature::{SignatureParser, expand_signature, tokenize};
use crate::tokens::render_tokens;
use crate::wikitext::enums::PageKind;
use crate::wikitext::errors::{Result, WikiError};
use crate::wikitext::wiki_text::WikiText;

use docs::{description_doc, function_doc};
use side::{SideData, split_sides};
use syntax::{clean_code, pick_oop_code, pick_section, pick_signature_code};

/// Drop everything from the first `See Also` / `Example(s)` heading on.
pub fn raw_post_process(raw: &str) -> &str {
    match regex!(r"(?i)=+ *(See Also|Examples?) *=+").find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    }
}

pub fn parse_function_page(
    config: &Config,
    url: &PageUrl,
    raw: &str,
) -> Result<SideData<FunctionData>> {
    function_page(config, url, raw).map_err(|e| e.in_page(&url.name))
}

pub fn parse_event_page(config: &Config, url: &PageUrl, raw: &str) -> Result<SideData<EventData>> {
    event_page(config, url, raw).map_err(|e| e.in_page(&url.name))
}

fn function_page(config: &Config, url: &PageUrl, raw: &str) -> Result<SideData<FunctionData>> {
    let page = url.name.as_str();
    let raw = raw_post_process(raw);
    let sides = split_sides(raw, PageKind::Function)?;
    log::debug!("[Side/{}]: {}", page, sides.side);
    let description = page_description(page, raw);

    sides.clone().try_map(|engine, text| {
        let wiki = WikiText::parse(&text).with_page_name(page);
        let syntax = pick_section(&wiki, "syntax", &sides, page)?;
        let container = syntax.map(|s| s.text.as_str()).unwrap_or_default();

        let code = pick_signature_code(container)
            .ok_or_else(|| WikiError::signature_not_found("syntax"))?;
        let code = clean_code(&code);
        let tokens = tokenize(&code)?;
        if config.verbose {
            log::debug!("[Signature/{}/{}]: {}", page, engine, render_tokens(&tokens));
        }
        let signature = SignatureParser::new(&tokens, &code).parse()?;

        let oop = match pick_oop_code(container, page) {
            Some(oop_code) => Some(parse_oop(&oop_code)?.bind(&signature)),
            None => None,
        };

        Ok(FunctionData {
            name: page.to_string(),
            signatures: expand_signature(signature.clone()),
            signature,
            docs: function_doc(page, &description, &wiki),
            oop,
        })
    })
}

fn event_page(config: &Config, url: &PageUrl, raw: &str) -> Result<SideData<EventData>> {
    let page = url.name.as_str();
    let raw = raw_post_process(raw);
    let sides = split_sides(raw, PageKind::Event)?;
    log::debug!("[Side/{}]: {}", page, sides.side);
    let description = page_description(page, raw);

    sides.clone().try_map(|engine, text| {
        let wiki = WikiText::parse(&text).with_page_name(page);
        let parameters = pick_section(&wiki, "parameters", &sides, page)?;
        let container = parameters.map(|s| s.contents()).unwrap_or_default();

        let code = match pick_signature_code(container) {
            Some(code) => clean_code(&code),
            None if has_no_parameters(container) => String::new(),
            None => return Err(WikiError::signature_not_found("parameters")),
        };
        let code = format!("void eventCallback( {} )", code);
        let tokens = tokenize(&code)?;
        if config.verbose {
            log::debug!("[Event/{}/{}]: {}", page, engine, render_tokens(&tokens));
        }
        let signature = SignatureParser::new(&tokens, &code).parse()?;

        let docs = function_doc(page, &description, &wiki);
        Ok(EventData {
            name: page.to_string(),
            arguments: signature.arguments,
            docs: FunctionDoc {
                result: String::new(),
                ..docs
            },
        })
    })
}

fn page_description(page: &str, raw: &str) -> String {
    let description = description_doc(&WikiText::parse(raw).with_page_name(page));
    if description.is_empty() {
        log::warn!("[Docs/{}]: Page without a description", page);
    }
    description
}

fn has_no_parameters(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains("no parameters") || text.contains("none")
}
