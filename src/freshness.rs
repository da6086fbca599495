// SPDX-License-Identifier: PMPL-1.0-or-later

//! Output freshness: which generated pages are missing or older than the
//! template or dictionary they were built from.

use crate::config::Site;
use colored::*;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Missing,
    /// Inputs modified after the output was written.
    Stale { newer: Vec<PathBuf> },
}

#[derive(Debug, Clone)]
pub struct PageFreshness {
    pub page: String,
    pub language: String,
    pub output_path: PathBuf,
    pub state: Freshness,
}

fn mtime(path: &Path) -> Option<FileTime> {
    fs::metadata(path)
        .ok()
        .map(|meta| FileTime::from_last_modification_time(&meta))
}

/// Check every registered page in each of `languages`.
pub fn check(site: &Site, languages: &[String]) -> Vec<PageFreshness> {
    let translations = site.translations_dir();
    let mut results = Vec::new();

    for page in site.registry.pages() {
        let template = site.template_path(&page.path);
        for language in languages {
            let output_path = site.output_path(language, &page.path);
            let dictionary = translations.join(format!("{language}.json"));

            let state = match mtime(&output_path) {
                None => Freshness::Missing,
                Some(built) => {
                    let newer: Vec<PathBuf> = [&template, &dictionary]
                        .into_iter()
                        .filter(|input| mtime(input).is_some_and(|t| t > built))
                        .cloned()
                        .collect();
                    if newer.is_empty() {
                        Freshness::Fresh
                    } else {
                        Freshness::Stale { newer }
                    }
                }
            };
            results.push(PageFreshness {
                page: page.path.clone(),
                language: language.clone(),
                output_path,
                state,
            });
        }
    }
    results
}

pub fn print_summary(results: &[PageFreshness]) {
    let mut fresh = 0;
    for entry in results {
        match &entry.state {
            Freshness::Fresh => fresh += 1,
            Freshness::Missing => println!(
                "  {:<8} {}",
                "missing".red(),
                entry.output_path.display()
            ),
            Freshness::Stale { newer } => {
                let inputs: Vec<String> = newer.iter().map(|p| p.display().to_string()).collect();
                println!(
                    "  {:<8} {} (newer: {})",
                    "stale".yellow(),
                    entry.output_path.display(),
                    inputs.join(", ").dimmed()
                );
            }
        }
    }
    println!(
        "\n  {} of {} pages up to date",
        fresh.to_string().green(),
        results.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::substitute::RuleCatalog;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("translations")).unwrap();
        fs::create_dir_all(root.join("es")).unwrap();
        fs::write(root.join("index.html"), "t").unwrap();
        fs::write(root.join("about.html"), "t").unwrap();
        fs::write(root.join("translations/es.json"), "{}").unwrap();
        fs::write(root.join("es/index.html"), "o").unwrap();

        let yaml = "origin: https://example.org\nsource_language: en\nlanguages: [en, es]\npages:\n  - path: index.html\n  - path: about.html\n";
        let config = SiteConfig::from_yaml(yaml, "test").unwrap();
        let site = Site::new(root.to_path_buf(), None, config, RuleCatalog::default()).unwrap();
        (dir, site)
    }

    fn set(path: &Path, secs: i64) {
        filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    #[test]
    fn fresh_missing_and_stale() {
        let (dir, site) = setup();
        let root = dir.path();
        set(&root.join("index.html"), 1_000);
        set(&root.join("translations/es.json"), 1_000);
        set(&root.join("es/index.html"), 2_000);

        let langs = vec!["es".to_string()];
        let results = check(&site, &langs);
        assert_eq!(results[0].state, Freshness::Fresh);
        assert_eq!(results[1].page, "about.html");
        assert_eq!(results[1].state, Freshness::Missing);

        set(&root.join("translations/es.json"), 3_000);
        let results = check(&site, &langs);
        assert_eq!(
            results[0].state,
            Freshness::Stale {
                newer: vec![root.join("translations/es.json")]
            }
        );
    }
}
