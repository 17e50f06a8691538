use std::{fmt::Debug, fs, path::PathBuf};

use dotenv::dotenv;
use itertools::{Either, Itertools};

use mtasa_wiki_parser::{
    config::Config,
    definitions::{PageUrl, ParsedDump},
    dump::collect_pages,
    page::{parse_event_page, parse_function_page, side::SideData},
    wikitext::{PageKind, Result},
};

/// Split results into passed and failed, log the stage summary and
/// optionally append both lists to a report file.
///
/// # Arguments
/// - obj -> Results of one stage.
/// - func_name -> Stage name for the summary line.
/// - file -> Optional report path to append to.
///
/// # Returns
/// - Vec<&'a K> -> The items that passed.
fn count_processed<'a, K, E>(
    obj: &'a [std::result::Result<K, E>],
    func_name: &str,
    file: Option<&PathBuf>,
) -> Vec<&'a K>
where
    K: Debug,
    E: Debug + 'a,
{
    let (passed, failed): (Vec<&K>, Vec<&E>) = obj.iter().partition_map(|item| match item {
        Ok(k) => Either::Left(k),
        Err(e) => Either::Right(e),
    });

    if let Some(path) = file {
        use std::io::Write;
        match fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(mut fh) => {
                if let Err(e) = writeln!(fh, "[{}] passed\n{:#?}\n", func_name, passed) {
                    log::error!("Failed to append passed items to {:?}: {}", path, e);
                }
                if let Err(e) = writeln!(fh, "[{}] failed\n{:#?}\n", func_name, failed) {
                    log::error!("Failed to append failed items to {:?}: {}", path, e);
                }
            }
            Err(e) => {
                log::error!("Failed to open file {:?} for appending: {}", path, e);
            }
        }
    }

    log::info!(
        "[{}] Total: {}. Passed: {}. Rate: {:.2}%",
        func_name,
        obj.len(),
        passed.len(),
        if obj.is_empty() {
            0.0
        } else {
            (passed.len() as f64 / obj.len() as f64) * 100.0
        }
    );

    passed
}

/// Parse every non-blacklisted page of `kind`. One failing page never stops
/// the others.
fn parse_pages<T, F>(
    config: &Config,
    kind: PageKind,
    parse: F,
) -> Result<Vec<Result<(PageUrl, SideData<T>)>>>
where
    F: Fn(&Config, &PageUrl, &str) -> Result<SideData<T>>,
{
    let pages = collect_pages(&config.dump_dir, kind)?;
    Ok(pages
        .into_iter()
        .filter(|page| {
            let skip = config.is_blacklisted(&page.url.name);
            if skip {
                log::info!("[{}]: Skipping blacklisted page {}", kind, page.url.name);
            }
            !skip
        })
        .map(|page| {
            let result = page
                .read()
                .and_then(|raw| parse(config, &page.url, &raw))
                .map_err(|e| e.in_page(&page.url.name));
            if let Err(e) = &result {
                let link = page
                    .url
                    .full_url(&config.host_url)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| page.url.url.clone());
                log::error!("[{}] {}: {} ({})", page.url, e.kind(), e, link);
            }
            result.map(|data| {
                let url = PageUrl {
                    side: Some(data.side),
                    ..page.url
                };
                (url, data)
            })
        })
        .collect())
}

fn run(config: &Config) -> Result<()> {
    if let Some(path) = &config.report
        && path.exists()
        && let Err(e) = fs::remove_file(path)
    {
        log::error!("Failed to remove report file {:?}: {}", path, e);
    }

    let mut dump = ParsedDump::new(config.host_url.clone());

    for kind in &config.kinds {
        match kind {
            PageKind::Function => {
                let functions = parse_pages(config, *kind, parse_function_page)?;
                for (url, data) in count_processed(&functions, "functions", config.report.as_ref()) {
                    dump.functions.insert(url.name.clone(), data.clone());
                }
            }
            PageKind::Event => {
                let events = parse_pages(config, *kind, parse_event_page)?;
                for (url, data) in count_processed(&events, "events", config.report.as_ref()) {
                    dump.events.insert(url.name.clone(), data.clone());
                }
            }
        }
    }

    dump.write_to_file(&config.output)?;
    log::info!(
        "Wrote {} functions and {} events to {:?}",
        dump.functions.len(),
        dump.events.len(),
        config.output
    );
    Ok(())
}

fn main() {
    env_logger::init();
    dotenv().ok();

    let result = Config::from_env().and_then(|config| run(&config));
    if let Err(e) = result {
        log::error!("[{}] {}", e.kind(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtasa_wiki_parser::wikitext::WikiError;

    #[test]
    fn count_processed_splits_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.txt");
        let items: Vec<std::result::Result<u32, WikiError>> = vec![
            Ok(1),
            Err(WikiError::unknown_side("function")),
            Ok(3),
        ];

        let passed = count_processed(&items, "stage", Some(&report));
        assert_eq!(passed, vec![&1, &3]);

        let text = fs::read_to_string(&report).unwrap();
        assert!(text.contains("[stage] passed"));
        assert!(text.contains("UnknownSide"));
    }
}
