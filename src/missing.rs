// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation coverage: keys present in the source dictionary that a
//! target dictionary lacks.

use crate::config::Site;
use crate::i18n::{language_name, list_missing_keys, Dictionary};
use anyhow::{Context, Result};
use colored::*;

#[derive(Debug, Clone)]
pub struct LanguageCoverage {
    pub language: String,
    pub total_keys: usize,
    pub missing: Vec<String>,
    /// Set when the target dictionary itself could not be loaded.
    pub error: Option<String>,
}

impl LanguageCoverage {
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.missing.is_empty()
    }
}

/// Compare each target dictionary against the source-language dictionary.
/// Failing to load the source dictionary is fatal; a broken target is
/// recorded and the other languages continue.
pub fn check(site: &Site, languages: &[String]) -> Result<Vec<LanguageCoverage>> {
    let dir = site.translations_dir();
    let source = Dictionary::load(&dir, &site.config.source_language).with_context(|| {
        format!(
            "loading source dictionary '{}'",
            site.config.source_language
        )
    })?;
    let total_keys = source.flatten().len();

    Ok(languages
        .iter()
        .map(|code| match Dictionary::load(&dir, code) {
            Ok(target) => LanguageCoverage {
                language: code.clone(),
                total_keys,
                missing: list_missing_keys(&source, &target),
                error: None,
            },
            Err(e) => LanguageCoverage {
                language: code.clone(),
                total_keys,
                missing: Vec::new(),
                error: Some(e.to_string()),
            },
        })
        .collect())
}

pub fn print_summary(results: &[LanguageCoverage], verbose: bool) {
    for entry in results {
        if let Some(err) = &entry.error {
            println!("  {:<4} {} {}", entry.language, "ERROR".red(), err);
            continue;
        }
        let present = entry.total_keys - entry.missing.len().min(entry.total_keys);
        let status = if entry.missing.is_empty() {
            "complete".green()
        } else {
            format!("{} missing", entry.missing.len()).yellow()
        };
        println!(
            "  {:<4} {:<12} {:>5}/{:<5} {}",
            entry.language,
            language_name(&entry.language).unwrap_or("?"),
            present,
            entry.total_keys,
            status
        );
        if verbose {
            for key in &entry.missing {
                println!("         {}", key.dimmed());
            }
        }
    }
}
