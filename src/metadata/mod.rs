// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metadata rewriter.
//!
//! Independent passes over `<head>` and structured data, run after content
//! substitution. Page identity always comes from the (page, language) unit,
//! never from the document.

mod head;
mod jsonld;

pub use head::{
    attr_encode, hreflang_set, insert_hreflang, rewrite_descriptions, set_canonical,
    set_document_language, set_og_url, HrefLang,
};
pub use jsonld::{translate_blocks, translate_value};

use crate::config::{PageSpec, Site};
use crate::error::GenerateError;
use crate::i18n::Dictionary;
use tracing::debug;

/// Everything a metadata pass may read about the unit being generated.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub site: &'a Site,
    pub page: &'a PageSpec,
    pub dictionary: &'a Dictionary,
}

impl<'a> PageContext<'a> {
    pub fn language(&self) -> &'a str {
        self.dictionary.code()
    }

    pub fn canonical_url(&self) -> String {
        self.site.page_url(self.language(), &self.page.path)
    }

    /// Rewrite an absolute site URL to its counterpart in this language.
    pub fn localize_url(&self, url: &str) -> String {
        let config = &self.site.config;
        if self.language() == config.source_language {
            return url.to_string();
        }
        let origin = format!("{}/", config.origin);
        url.replace(&origin, &format!("{origin}{}/", self.language()))
    }
}

/// Dictionary reads that remember which keys were missing.
#[derive(Debug)]
pub struct Lookup<'a> {
    dictionary: &'a Dictionary,
    missing: Vec<String>,
}

impl<'a> Lookup<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self {
            dictionary,
            missing: Vec::new(),
        }
    }

    pub fn text(&mut self, key: &str) -> Option<&'a str> {
        let value = self.dictionary.text(key);
        if value.is_none() && !self.missing.iter().any(|k| k == key) {
            debug!(key, language = self.dictionary.code(), "metadata key missing");
            self.missing.push(key.to_string());
        }
        value
    }

    pub fn into_missing(self) -> Vec<String> {
        self.missing
    }
}

#[derive(Debug, Clone)]
pub struct MetadataRewrite {
    pub text: String,
    pub fallback_keys: Vec<String>,
}

/// Run every metadata pass for one unit.
pub fn rewrite(text: &str, ctx: &PageContext<'_>) -> Result<MetadataRewrite, GenerateError> {
    let mut lookup = Lookup::new(ctx.dictionary);
    let url = ctx.canonical_url();

    let text = set_document_language(text, ctx.language(), ctx.dictionary.direction());
    let text = rewrite_descriptions(&text, &ctx.page.key, &mut lookup);
    let text = set_canonical(&text, &url);
    let text = set_og_url(&text, &url);
    let text = translate_blocks(&text, ctx, &mut lookup)?;
    let text = if ctx.page.hreflang {
        insert_hreflang(&text, &hreflang_set(ctx.site, &ctx.page.path))
    } else {
        text
    };

    Ok(MetadataRewrite {
        text,
        fallback_keys: lookup.into_missing(),
    })
}
