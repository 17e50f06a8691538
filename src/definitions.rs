use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display, fs, path::Path};
use url::Url;

use crate::oop::OopBinding;
use crate::page::side::SideData;
use crate::signature::{FunctionArgumentValues, FunctionSignature};
use crate::wikitext::enums::{PageKind, Side};
use crate::wikitext::errors::{Result, WikiError};

/// A page of the dump, addressed the way the wiki addresses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageUrl {
    /// Path relative to the wiki host, e.g. `/wiki/GetPlayerName`.
    pub url: String,
    pub name: String,
    pub category: String,
    pub kind: PageKind,
    /// Known once the page has been classified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl PageUrl {
    pub fn new<S: Into<String>>(name: S, category: S, kind: PageKind) -> Self {
        let name = name.into();
        PageUrl {
            url: format!("/wiki/{}", name),
            name,
            category: category.into(),
            kind,
            side: None,
        }
    }

    pub fn full_url(&self, host: &Url) -> Result<Url> {
        Ok(host.join(&self.url)?)
    }
}

impl Display for PageUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.category, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDoc {
    pub description: String,
    pub arguments: IndexMap<String, String>,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionData {
    pub name: String,
    pub signature: FunctionSignature,
    /// `signature` plus every overload made by dropping optional arguments.
    pub signatures: Vec<FunctionSignature>,
    pub docs: FunctionDoc,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oop: Option<OopBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    pub name: String,
    pub arguments: FunctionArgumentValues,
    pub docs: FunctionDoc,
}

/// Everything one run produced.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParsedDump {
    pub generated_at: DateTime<Utc>,
    pub host: Url,
    pub functions: BTreeMap<String, SideData<FunctionData>>,
    pub events: BTreeMap<String, SideData<EventData>>,
}

impl ParsedDump {
    pub fn new(host: Url) -> Self {
        ParsedDump {
            generated_at: Utc::now(),
            host,
            functions: BTreeMap::new(),
            events: BTreeMap::new(),
        }
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| WikiError::io_err(format!("Failed to create {:?}", parent), e))?;
        }
        let data = serde_json::to_string_pretty(&self)?;
        fs::write(path, data).map_err(|e| WikiError::io_err(format!("Failed to write {:?}", path), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::parse_signature;

    #[test]
    fn page_urls() {
        let page = PageUrl::new("GetPlayerName", "Player_functions", PageKind::Function);
        let host = Url::parse("https://wiki.multitheftauto.com").unwrap();
        assert_eq!(
            page.full_url(&host).unwrap().as_str(),
            "https://wiki.multitheftauto.com/wiki/GetPlayerName"
        );
        assert_eq!(page.to_string(), "Function/Player_functions/GetPlayerName");
    }

    #[test]
    fn dump_with_pages_survives_json() {
        let signature = parse_signature("string getPlayerName ( player thePlayer )").unwrap();
        let function = FunctionData {
            name: "getPlayerName".to_string(),
            signatures: vec![signature.clone()],
            signature: signature.clone(),
            docs: FunctionDoc::default(),
            oop: None,
        };
        let event = EventData {
            name: "onClientClick".to_string(),
            arguments: signature.arguments.clone(),
            docs: FunctionDoc::default(),
        };

        let mut dump = ParsedDump::new(Url::parse("https://wiki.multitheftauto.com").unwrap());
        dump.functions.insert(
            "getPlayerName".to_string(),
            SideData::sectioned(function.clone(), function.clone()),
        );
        dump.events.insert(
            "onClientClick".to_string(),
            SideData::new(Side::Client, None, Some(event.clone())),
        );

        let text = serde_json::to_string(&dump).unwrap();
        assert!(!text.contains("\"server\":null"));
        let back: ParsedDump = serde_json::from_str(&text).unwrap();

        let functions = &back.functions["getPlayerName"];
        assert_eq!(functions.side, Side::Shared);
        assert_eq!(functions.server.as_ref(), Some(&function));
        assert_eq!(functions.client.as_ref(), Some(&function));
        let events = &back.events["onClientClick"];
        assert!(events.server.is_none());
        assert_eq!(events.client.as_ref(), Some(&event));
        assert_eq!(back.generated_at, dump.generated_at);
    }

    #[test]
    fn dump_is_written_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("parsed.json");
        let dump = ParsedDump::new(Url::parse("https://wiki.multitheftauto.com").unwrap());
        dump.write_to_file(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let back: ParsedDump = serde_json::from_str(&text).unwrap();
        assert!(back.functions.is_empty());
        assert_eq!(back.host, dump.host);
    }
}
