use derive_builder::Builder;
use std::{env, path::PathBuf, str::FromStr};
use url::Url;

use crate::wikitext::enums::PageKind;
use crate::wikitext::errors::{Result, WikiError};

pub const DEFAULT_HOST: &str = "https://wiki.multitheftauto.com";

/// Run settings. Built once in `main` and passed down by reference.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Config {
    /// Wiki the dump was taken from.
    #[builder(default = "Url::parse(DEFAULT_HOST).map_err(|e| e.to_string())?")]
    pub host_url: Url,
    /// Root of the page dump (`functions/` and `events/` below it).
    #[builder(default = "PathBuf::from(\"./dump\")")]
    pub dump_dir: PathBuf,
    #[builder(default = "PathBuf::from(\"./output/parsed.json\")")]
    pub output: PathBuf,
    /// Page kinds to parse, in order.
    #[builder(default = "vec![PageKind::Function, PageKind::Event]")]
    pub kinds: Vec<PageKind>,
    /// Page names to skip.
    #[builder(default)]
    pub blacklist: Vec<String>,
    /// Log every token list.
    #[builder(default)]
    pub verbose: bool,
    /// File to append per-stage pass/fail details to.
    #[builder(default)]
    pub report: Option<PathBuf>,
}

impl Config {
    /// Read `MTASA_*` variables. Call `dotenv().ok()` first to honour `.env`.
    pub fn from_env() -> Result<Config> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ConfigBuilder::default();
        if let Some(host) = lookup("MTASA_HOST_URL") {
            builder.host_url(Url::parse(host.trim())?);
        }
        if let Some(dir) = lookup("MTASA_DUMP_DIR") {
            builder.dump_dir(dir);
        }
        if let Some(output) = lookup("MTASA_OUTPUT") {
            builder.output(output);
        }
        if let Some(list) = lookup("MTASA_KINDS") {
            let kinds = comma_list(&list)
                .map(|kind| PageKind::from_str(kind).map_err(WikiError::config))
                .collect::<Result<Vec<_>>>()?;
            builder.kinds(kinds);
        }
        if let Some(list) = lookup("MTASA_BLACKLIST") {
            builder.blacklist(comma_list(&list).map(String::from).collect::<Vec<_>>());
        }
        if let Some(verbose) = lookup("MTASA_VERBOSE") {
            builder.verbose(matches!(
                verbose.trim().to_lowercase().as_str(),
                "1" | "true" | "yes"
            ));
        }
        if let Some(report) = lookup("MTASA_REPORT") {
            builder.report(Some(PathBuf::from(report)));
        }

        builder.build().map_err(|e| WikiError::config(e.to_string()))
    }

    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklist.iter().any(|b| b == name)
    }
}

fn comma_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|item| !item.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_map(&[]).unwrap();
        assert_eq!(config.host_url.as_str(), "https://wiki.multitheftauto.com/");
        assert_eq!(config.dump_dir, PathBuf::from("./dump"));
        assert_eq!(config.output, PathBuf::from("./output/parsed.json"));
        assert!(config.blacklist.is_empty());
        assert!(!config.verbose);
        assert!(config.report.is_none());
        assert_eq!(config.kinds, vec![PageKind::Function, PageKind::Event]);
    }

    #[test]
    fn kinds_are_parsed() {
        let config = from_map(&[("MTASA_KINDS", "events")]).unwrap();
        assert_eq!(config.kinds, vec![PageKind::Event]);

        let err = from_map(&[("MTASA_KINDS", "functions,templates")]).unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
    }

    #[test]
    fn overrides() {
        let config = from_map(&[
            ("MTASA_HOST_URL", "https://example.org"),
            ("MTASA_DUMP_DIR", "/tmp/dump"),
            ("MTASA_BLACKLIST", "getFoo, setBar,,"),
            ("MTASA_VERBOSE", "True"),
            ("MTASA_REPORT", "report.txt"),
        ])
        .unwrap();
        assert_eq!(config.host_url.as_str(), "https://example.org/");
        assert_eq!(config.dump_dir, PathBuf::from("/tmp/dump"));
        assert_eq!(config.blacklist, vec!["getFoo", "setBar"]);
        assert!(config.is_blacklisted("setBar"));
        assert!(!config.is_blacklisted("setbar"));
        assert!(config.verbose);
        assert_eq!(config.report, Some(PathBuf::from("report.txt")));
    }

    #[test]
    fn bad_host() {
        let err = from_map(&[("MTASA_HOST_URL", "not a url")]).unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
    }
}
