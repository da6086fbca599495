// SPDX-License-Identifier: PMPL-1.0-or-later

//! Site configuration and the page registration table.
//!
//! Everything the pipeline needs to know about the site (origin, language
//! list, page key prefixes, asset directories) lives in one immutable
//! [`Site`] value built at startup and borrowed by every stage. Nothing is
//! read from globals.

use crate::error::{ConfigError, GenerateError};
use crate::i18n;
use crate::substitute::RuleCatalog;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SITE: &str = include_str!("../config/site.yaml");

/// Raw `site.yaml` contents.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub origin: String,
    pub source_language: String,
    pub languages: Vec<String>,
    #[serde(default = "default_translations_dir")]
    pub translations_dir: PathBuf,
    #[serde(default)]
    pub asset_dirs: Vec<String>,
    #[serde(default)]
    pub runtime_script: Option<String>,
    #[serde(default)]
    pub runtime_sections: Vec<String>,
    pub pages: Vec<PageEntry>,
    #[serde(default)]
    pub discover: Vec<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_translations_dir() -> PathBuf {
    PathBuf::from("translations")
}

fn default_true() -> bool {
    true
}

/// One row of the registration table as written in YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageEntry {
    pub path: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default = "default_true")]
    pub hreflang: bool,
}

/// A registered page with its key prefix resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    /// Template path relative to the site root, always `/`-separated.
    pub path: String,
    /// Translation key prefix (`index`, `blog_post`).
    pub key: String,
    /// JSON-LD Article key prefix (`article1`), if the page is an article.
    pub article: Option<String>,
    /// Whether the page gets an hreflang block.
    pub hreflang: bool,
}

impl PageSpec {
    /// Number of directory separators in the template path.
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }
}

/// Explicit page → key prefix table. Lookups never infer a prefix for a
/// path that was not registered.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: Vec<PageSpec>,
}

impl PageRegistry {
    pub fn from_entries(entries: &[PageEntry]) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut pages = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = normalize_page_path(&entry.path)?;
            if !seen.insert(path.clone()) {
                return Err(invalid("pages", format!("'{path}' is registered twice")));
            }
            let key = match &entry.key {
                Some(key) if !key.trim().is_empty() => key.trim().to_string(),
                Some(_) => return Err(invalid("pages", format!("'{path}' has an empty key"))),
                None if path.contains('/') => {
                    return Err(invalid(
                        "pages",
                        format!("nested page '{path}' must declare an explicit key"),
                    ))
                }
                None => path.trim_end_matches(".html").to_string(),
            };
            pages.push(PageSpec {
                path,
                key,
                article: entry.article.clone(),
                hreflang: entry.hreflang,
            });
        }
        Ok(Self { pages })
    }

    pub fn pages(&self) -> &[PageSpec] {
        &self.pages
    }

    pub fn get(&self, path: &str) -> Option<&PageSpec> {
        self.pages.iter().find(|p| p.path == path)
    }

    pub fn resolve(&self, path: &str) -> Result<&PageSpec, GenerateError> {
        self.get(path)
            .ok_or_else(|| GenerateError::UnregisteredPage(path.to_string()))
    }
}

fn normalize_page_path(raw: &str) -> Result<String, ConfigError> {
    let path = raw.trim().replace('\\', "/");
    let path = path.trim_start_matches("./").to_string();
    if path.is_empty() || !path.ends_with(".html") {
        return Err(invalid("pages", format!("'{raw}' is not an .html page")));
    }
    if path.starts_with('/') || path.split('/').any(|seg| seg == ".." || seg.is_empty()) {
        return Err(invalid(
            "pages",
            format!("'{raw}' must be a relative path inside the site root"),
        ));
    }
    Ok(path)
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message,
    }
}

impl SiteConfig {
    pub fn from_yaml(text: &str, what: &str) -> Result<Self, ConfigError> {
        let mut config: SiteConfig =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
                what: what.to_string(),
                source,
            })?;
        config.origin = config.origin.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text, &path.display().to_string())
    }

    /// The configuration shipped with the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(DEFAULT_SITE, "built-in site configuration")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.origin.starts_with("https://") || self.origin.starts_with("http://")) {
            return Err(invalid(
                "origin",
                format!("'{}' must be an absolute http(s) URL", self.origin),
            ));
        }
        let mut seen = HashSet::new();
        for code in &self.languages {
            if !i18n::is_valid_iso639_1(code) {
                return Err(invalid(
                    "languages",
                    format!("'{code}' is not an ISO 639-1 code"),
                ));
            }
            if !seen.insert(code.as_str()) {
                return Err(invalid("languages", format!("'{code}' is listed twice")));
            }
        }
        if !self.languages.contains(&self.source_language) {
            return Err(invalid(
                "source_language",
                format!("'{}' is not in languages", self.source_language),
            ));
        }
        for dir in &self.asset_dirs {
            if dir.is_empty() || dir.contains('/') || dir.contains('"') {
                return Err(invalid(
                    "asset_dirs",
                    format!("'{dir}' must be a single directory name"),
                ));
            }
        }
        Ok(())
    }

    /// Every configured language except the source language, in order.
    pub fn target_languages(&self) -> Vec<String> {
        self.languages
            .iter()
            .filter(|code| **code != self.source_language)
            .cloned()
            .collect()
    }
}

/// Immutable bundle injected into every pipeline stage.
#[derive(Debug, Clone)]
pub struct Site {
    pub root: PathBuf,
    pub output_root: PathBuf,
    pub config: SiteConfig,
    pub registry: PageRegistry,
    pub catalog: RuleCatalog,
}

impl Site {
    pub fn new(
        root: PathBuf,
        output_root: Option<PathBuf>,
        config: SiteConfig,
        catalog: RuleCatalog,
    ) -> Result<Self, ConfigError> {
        let registry = PageRegistry::from_entries(&config.pages)?;
        let output_root = output_root.unwrap_or_else(|| root.clone());
        Ok(Self {
            root,
            output_root,
            config,
            registry,
            catalog,
        })
    }

    /// Build a site from optional config/rule file overrides, falling back
    /// to the built-in defaults.
    pub fn load(
        root: &Path,
        output_root: Option<PathBuf>,
        config_path: Option<&Path>,
        rules_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => SiteConfig::from_file(path)?,
            None => {
                let local = root.join("site.yaml");
                if local.is_file() {
                    SiteConfig::from_file(&local)?
                } else {
                    SiteConfig::builtin()?
                }
            }
        };
        let catalog = match rules_path {
            Some(path) => RuleCatalog::from_file(path)?,
            None => RuleCatalog::builtin()?,
        };
        Self::new(root.to_path_buf(), output_root, config, catalog)
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.root.join(&self.config.translations_dir)
    }

    pub fn template_path(&self, page: &str) -> PathBuf {
        self.root.join(page)
    }

    pub fn output_path(&self, language: &str, page: &str) -> PathBuf {
        self.output_root.join(language).join(page)
    }

    /// Absolute URL of `page` in `language`; the source language has no
    /// language segment.
    pub fn page_url(&self, language: &str, page: &str) -> String {
        if language == self.config.source_language {
            format!("{}/{}", self.config.origin, page)
        } else {
            format!("{}/{}/{}", self.config.origin, language, page)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, key: Option<&str>) -> PageEntry {
        PageEntry {
            path: path.to_string(),
            key: key.map(str::to_string),
            article: None,
            hreflang: true,
        }
    }

    #[test]
    fn builtin_config_is_valid() {
        let config = SiteConfig::builtin().expect("built-in config should parse");
        assert_eq!(config.languages.len(), 11);
        assert_eq!(config.target_languages().len(), 10);
        assert!(!config.target_languages().contains(&"en".to_string()));
        let registry = PageRegistry::from_entries(&config.pages).unwrap();
        assert_eq!(registry.get("blog/why-we-built-reroute-nj.html").unwrap().key, "blog_post");
        assert_eq!(registry.get("index.html").unwrap().key, "index");
    }

    #[test]
    fn top_level_pages_default_to_stem() {
        let registry = PageRegistry::from_entries(&[entry("compare.html", None)]).unwrap();
        assert_eq!(registry.resolve("compare.html").unwrap().key, "compare");
    }

    #[test]
    fn nested_pages_require_explicit_key() {
        let err = PageRegistry::from_entries(&[entry("blog/post.html", None)]).unwrap_err();
        assert!(err.to_string().contains("explicit key"));
    }

    #[test]
    fn unregistered_page_does_not_resolve() {
        let registry = PageRegistry::from_entries(&[entry("index.html", None)]).unwrap();
        let err = registry.resolve("blog/new-post.html").unwrap_err();
        assert!(matches!(err, GenerateError::UnregisteredPage(ref p) if p == "blog/new-post.html"));
        assert!(err.to_string().contains("unregistered page"));
    }

    #[test]
    fn duplicate_registration_rejected() {
        let err = PageRegistry::from_entries(&[entry("index.html", None), entry("./index.html", None)])
            .unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn escaping_paths_rejected() {
        assert!(PageRegistry::from_entries(&[entry("../index.html", None)]).is_err());
        assert!(PageRegistry::from_entries(&[entry("/index.html", None)]).is_err());
        assert!(PageRegistry::from_entries(&[entry("notes.txt", None)]).is_err());
    }

    #[test]
    fn invalid_language_rejected() {
        let yaml = "origin: https://example.org\nsource_language: en\nlanguages: [en, sp]\npages: []\n";
        let err = SiteConfig::from_yaml(yaml, "test").unwrap_err();
        assert!(err.to_string().contains("'sp'"));
    }

    #[test]
    fn source_language_must_be_listed() {
        let yaml = "origin: https://example.org\nsource_language: en\nlanguages: [es]\npages: []\n";
        assert!(SiteConfig::from_yaml(yaml, "test").is_err());
    }

    #[test]
    fn origin_trailing_slash_trimmed() {
        let yaml = "origin: https://example.org/\nsource_language: en\nlanguages: [en, es]\npages: []\n";
        let config = SiteConfig::from_yaml(yaml, "test").unwrap();
        assert_eq!(config.origin, "https://example.org");
    }

    #[test]
    fn page_urls() {
        let config = SiteConfig::builtin().unwrap();
        let site = Site::new(PathBuf::from("."), None, config, RuleCatalog::default()).unwrap();
        assert_eq!(site.page_url("en", "map.html"), "https://reroutenj.org/map.html");
        assert_eq!(
            site.page_url("es", "blog/new-embed-system.html"),
            "https://reroutenj.org/es/blog/new-embed-system.html"
        );
    }
}
