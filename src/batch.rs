// SPDX-License-Identifier: PMPL-1.0-or-later

//! Batch driver: the {page × language} cartesian product.
//!
//! Templates and dictionaries are loaded once, up front. A template or
//! dictionary that fails to load skips every unit that needs it; all other
//! units still run. Failures are collected into the [`GenerationReport`],
//! never raised.

use crate::config::{PageSpec, Site};
use crate::error::GenerateError;
use crate::i18n::Dictionary;
use crate::pipeline::{self, GeneratedPage};
use crate::template;
use crate::types::{GenerationReport, Stage, UnitFailure, UnitOutcome, WriteStatus};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Options for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Languages to generate; empty means every target language.
    pub languages: Vec<String>,
    /// Run the pipeline without touching the output tree.
    pub dry_run: bool,
    /// Fan units out over the rayon pool.
    pub parallel: bool,
}

/// Run the generator and return the report. Per-unit failures are in the
/// report; this function itself does not fail.
pub fn run(site: &Site, options: &GenerateOptions) -> GenerationReport {
    let mut failures = Vec::new();

    let languages = resolve_languages(site, &options.languages, &mut failures);
    let pages = resolve_pages(site, &mut failures);

    let mut templates: Vec<Option<String>> = Vec::with_capacity(pages.len());
    for page in &pages {
        match template::load(&site.template_path(&page.path)) {
            Ok(text) => templates.push(Some(text)),
            Err(e) => {
                warn!(page = %page.path, error = %e, "template unavailable, skipping page");
                failures.push(UnitFailure::new(
                    Some(&page.path),
                    None,
                    Stage::Template,
                    e.to_string(),
                ));
                templates.push(None);
            }
        }
    }

    let translations = site.translations_dir();
    let mut dictionaries: Vec<Option<Dictionary>> = Vec::with_capacity(languages.len());
    for code in &languages {
        match Dictionary::load(&translations, code) {
            Ok(dictionary) => {
                info!(
                    language = %code,
                    name = dictionary.native_name(),
                    dir = dictionary.direction().as_str(),
                    "generating {} ({})",
                    dictionary.label(),
                    code
                );
                debug!(language = %code, path = %dictionary.path().display(), "dictionary loaded");
                dictionaries.push(Some(dictionary));
            }
            Err(e) => {
                warn!(language = %code, error = %e, "dictionary unavailable, skipping language");
                failures.push(UnitFailure::new(
                    None,
                    Some(code),
                    Stage::Dictionary,
                    e.to_string(),
                ));
                dictionaries.push(None);
            }
        }
    }

    // Page order, then language order.
    let mut units = Vec::new();
    let mut skipped = 0;
    for (page, template) in pages.iter().zip(&templates) {
        for dictionary in &dictionaries {
            match (template, dictionary) {
                (Some(template), Some(dictionary)) => units.push((page, template, dictionary)),
                _ => skipped += 1,
            }
        }
    }

    let process = |(page, template, dictionary): &(&PageSpec, &String, &Dictionary)| {
        run_unit(site, page, dictionary, template, options.dry_run)
    };
    let results: Vec<Result<UnitOutcome, UnitFailure>> = if options.parallel {
        units.par_iter().map(process).collect()
    } else {
        units.iter().map(process).collect()
    };

    let mut outcomes = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(failure) => failures.push(failure),
        }
    }

    let written = outcomes
        .iter()
        .filter(|u| u.status == WriteStatus::Written)
        .count();
    let unchanged = outcomes
        .iter()
        .filter(|u| u.status == WriteStatus::Unchanged)
        .count();

    GenerationReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        languages,
        pages: pages.iter().map(|p| p.path.clone()).collect(),
        written,
        unchanged,
        skipped,
        failures,
        units: outcomes,
    }
}

fn run_unit(
    site: &Site,
    page: &PageSpec,
    dictionary: &Dictionary,
    template: &str,
    dry_run: bool,
) -> Result<UnitOutcome, UnitFailure> {
    let fail = |e: GenerateError| {
        warn!(page = %page.path, language = dictionary.code(), error = %e, "unit failed");
        UnitFailure::new(Some(&page.path), Some(dictionary.code()), e.stage(), e.to_string())
    };

    let generated = pipeline::generate_page(site, page, dictionary, template).map_err(fail)?;
    let status = if dry_run {
        WriteStatus::DryRun
    } else {
        write_if_changed(&generated.output_path, &generated.text).map_err(fail)?
    };
    if !generated.unmatched_rules.is_empty() {
        debug!(
            page = %page.path,
            language = dictionary.code(),
            rules = ?generated.unmatched_rules,
            "anchors not found in template"
        );
    }
    Ok(outcome(generated, status))
}

fn outcome(generated: GeneratedPage, status: WriteStatus) -> UnitOutcome {
    UnitOutcome {
        page: generated.page,
        language: generated.language,
        output_path: generated.output_path,
        digest: generated.digest,
        status,
        fallback_keys: generated.fallback_keys,
        unmatched_rules: generated.unmatched_rules,
        conflicting_rules: generated.conflicting_rules,
    }
}

/// Write `text` unless the file already holds exactly these bytes.
pub fn write_if_changed(path: &Path, text: &str) -> Result<WriteStatus, GenerateError> {
    let write_err = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Ok(existing) = fs::read(path) {
        if existing == text.as_bytes() {
            return Ok(WriteStatus::Unchanged);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, text).map_err(write_err)?;
    Ok(WriteStatus::Written)
}

/// Requested languages, or every target language when none were given.
/// Unknown codes and the source language become `language` failures.
fn resolve_languages(
    site: &Site,
    requested: &[String],
    failures: &mut Vec<UnitFailure>,
) -> Vec<String> {
    if requested.is_empty() {
        return site.config.target_languages();
    }
    let mut seen = HashSet::new();
    let mut languages = Vec::new();
    for code in requested {
        if !seen.insert(code.as_str()) {
            continue;
        }
        let cause = if *code == site.config.source_language {
            Some("the source language is not generated")
        } else if !site.config.languages.contains(code) {
            Some("not a configured language")
        } else {
            None
        };
        match cause {
            Some(cause) => {
                warn!(language = %code, cause, "language rejected");
                failures.push(UnitFailure::new(None, Some(code), Stage::Language, cause));
            }
            None => languages.push(code.clone()),
        }
    }
    languages
}

/// Registered pages in table order. Discovered templates missing from the
/// table are reported as `registry` failures and never generated.
fn resolve_pages(site: &Site, failures: &mut Vec<UnitFailure>) -> Vec<PageSpec> {
    for path in discover_templates(site) {
        if let Err(err) = site.registry.resolve(&path) {
            warn!(page = %path, "{err}");
            failures.push(UnitFailure::new(Some(&path), None, err.stage(), err.to_string()));
        }
    }
    for section in orphan_rule_sections(site) {
        warn!(section = %section, "rule section matches no registered page key");
    }
    debug!(rules = site.catalog.len(), "rule catalog loaded");
    site.registry.pages().to_vec()
}

/// Page sections of the rule catalog whose key no registered page uses.
/// Their rules can never fire, which usually means a typo in the key.
pub fn orphan_rule_sections(site: &Site) -> Vec<String> {
    let used: HashSet<&str> = site.registry.pages().iter().map(|p| p.key.as_str()).collect();
    let mut orphans: Vec<String> = site
        .catalog
        .page_keys()
        .filter(|key| !used.contains(key))
        .map(str::to_string)
        .collect();
    orphans.sort();
    orphans
}

/// `.html` files under the configured discovery roots, relative to the site
/// root with `/` separators, minus ignored paths. Sorted.
pub fn discover_templates(site: &Site) -> Vec<String> {
    let ignore: HashSet<&str> = site.config.ignore.iter().map(String::as_str).collect();
    let mut found = Vec::new();

    for dir in &site.config.discover {
        let base = site.root.join(dir);
        if !base.is_dir() {
            debug!(dir = %base.display(), "discovery root missing");
            continue;
        }
        for entry in WalkDir::new(&base).into_iter().filter_map(Result::ok) {
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("html")
            {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&site.root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if !ignore.contains(relative.as_str()) {
                found.push(relative);
            }
        }
    }

    found.sort();
    found.dedup();
    found
}
