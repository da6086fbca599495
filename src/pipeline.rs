// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-unit pipeline: one English template, one dictionary, one page.
//!
//! Content substitution → runtime injection → metadata → asset paths. The
//! function is pure; writing to disk is the batch driver's job.

use crate::assets;
use crate::config::{PageSpec, Site};
use crate::error::GenerateError;
use crate::i18n::Dictionary;
use crate::metadata::{self, PageContext};
use crate::runtime;
use crate::substitute;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Final text of one (page, language) unit plus its diagnostics.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub page: String,
    pub language: String,
    pub output_path: PathBuf,
    pub text: String,
    pub digest: String,
    pub fallback_keys: Vec<String>,
    pub unmatched_rules: Vec<String>,
    pub conflicting_rules: Vec<String>,
}

pub fn generate_page(
    site: &Site,
    page: &PageSpec,
    dictionary: &Dictionary,
    template: &str,
) -> Result<GeneratedPage, GenerateError> {
    let template_depth = page.depth();
    let output_depth = template_depth + 1;

    let rules = site.catalog.rules_for(&page.key);
    let content = substitute::substitute(template, dictionary, &page.key, rules);

    let text = match &site.config.runtime_script {
        Some(script) => runtime::inject(
            &content.text,
            dictionary,
            &site.config.runtime_sections,
            script,
            output_depth,
        )?,
        None => content.text,
    };

    let ctx = PageContext {
        site,
        page,
        dictionary,
    };
    let meta = metadata::rewrite(&text, &ctx)?;

    let text = assets::fix_paths(
        &meta.text,
        template_depth,
        output_depth,
        &site.config.asset_dirs,
    );

    let mut fallback_keys = content.fallback_keys;
    for key in meta.fallback_keys {
        if !fallback_keys.contains(&key) {
            fallback_keys.push(key);
        }
    }

    Ok(GeneratedPage {
        page: page.path.clone(),
        language: dictionary.code().to_string(),
        output_path: site.output_path(dictionary.code(), &page.path),
        digest: digest(&text),
        text,
        fallback_keys,
        unmatched_rules: content.unmatched_rules,
        conflicting_rules: content.conflicts,
    })
}

/// Lowercase hex SHA-256 of the page text.
pub fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
