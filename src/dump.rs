//! Reading the local page dump.
//!
//! Layout: `<dump_dir>/functions/<Category>/<Page>` and
//! `<dump_dir>/events/<Category>/<Page>`. Files may or may not carry an
//! extension; the file stem is the page name.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::definitions::PageUrl;
use crate::wikitext::enums::PageKind;
use crate::wikitext::errors::{Result, WikiError};

/// A dumped page and where it lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpPage {
    pub url: PageUrl,
    pub path: PathBuf,
}

impl DumpPage {
    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .map_err(|e| WikiError::io_err(format!("Failed to read {:?}", self.path), e))
    }
}

/// `GetPlayerName` -> `getPlayerName`. Event names keep their case.
pub fn page_name(stem: &str, kind: PageKind) -> String {
    match kind {
        PageKind::Event => stem.to_string(),
        PageKind::Function => {
            let mut chars = stem.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| WikiError::io_err(format!("Failed to list {:?}", dir), e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

/// Every page of `kind` in the dump, ordered by category then name.
pub fn collect_pages(dump_dir: &Path, kind: PageKind) -> Result<Vec<DumpPage>> {
    let root = dump_dir.join(kind.dump_dir());
    if !root.is_dir() {
        log::warn!("[Dump]: No {} directory at {:?}", kind.dump_dir(), root);
        return Ok(Vec::new());
    }

    let mut pages = Vec::new();
    for category in sorted_entries(&root)? {
        if !category.is_dir() {
            continue;
        }
        let category_name = file_stem(&category);
        for file in sorted_entries(&category)? {
            if !file.is_file() {
                continue;
            }
            let stem = file_stem(&file);
            let mut url = PageUrl::new(page_name(&stem, kind), category_name.clone(), kind);
            url.url = format!("/wiki/{}", stem);
            pages.push(DumpPage { url, path: file });
        }
    }

    log::info!("[Dump]: Found {} {} pages", pages.len(), kind.keyword());
    Ok(pages)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn names() {
        assert_eq!(page_name("GetPlayerName", PageKind::Function), "getPlayerName");
        assert_eq!(page_name("Utf8.insert", PageKind::Function), "utf8.insert");
        assert_eq!(page_name("OnClientClick", PageKind::Event), "OnClientClick");
        assert_eq!(page_name("", PageKind::Function), "");
    }

    #[test]
    fn collects_sorted_pages() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "functions/Player_functions/SetPlayerName.txt", "b");
        write(dir.path(), "functions/Player_functions/GetPlayerName", "a");
        write(dir.path(), "functions/Blip_functions/CreateBlip", "c");
        write(dir.path(), "functions/stray_file", "ignored");
        write(dir.path(), "events/Client/onClientClick", "e");

        let pages = collect_pages(dir.path(), PageKind::Function).unwrap();
        let names: Vec<&str> = pages.iter().map(|p| p.url.name.as_str()).collect();
        assert_eq!(names, vec!["createBlip", "getPlayerName", "setPlayerName"]);
        assert_eq!(pages[0].url.category, "Blip_functions");
        assert_eq!(pages[2].url.url, "/wiki/SetPlayerName");
        assert_eq!(pages[1].read().unwrap(), "a");

        let events = collect_pages(dir.path(), PageKind::Event).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].url.kind, PageKind::Event);
    }

    #[test]
    fn missing_kind_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_pages(dir.path(), PageKind::Event).unwrap().is_empty());
    }
}
