// SPDX-License-Identifier: PMPL-1.0-or-later

//! Data-driven rule catalog for the substitution engine.
//!
//! Rules are declared in YAML (`config/rules.yaml` ships as the built-in
//! catalog) and converted into [`Rule`] values once at startup. A catalog
//! has a `common` list applied to every page and one list per page key
//! prefix.

use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const DEFAULT_RULES: &str = include_str!("../../config/rules.yaml");

/// Entity encodings applied to a dictionary value before insertion, so the
/// value matches the entity style of the surrounding template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// `&` → `&amp;`
    Amp,
    /// `→` → `&rarr;`, `←` → `&larr;`
    Arrows,
    /// `—` → `&mdash;`, `–` → `&ndash;`
    Dashes,
    /// `·` → `&middot;`
    Middot,
    /// `"` → `&quot;`
    Quote,
}

impl Encoding {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Encoding::Amp => value.replace('&', "&amp;"),
            Encoding::Arrows => value.replace('→', "&rarr;").replace('←', "&larr;"),
            Encoding::Dashes => value.replace('—', "&mdash;").replace('–', "&ndash;"),
            Encoding::Middot => value.replace('·', "&middot;"),
            Encoding::Quote => value.replace('"', "&quot;"),
        }
    }
}

/// Where a rule writes.
#[derive(Debug, Clone)]
pub enum Anchor {
    /// Any of the spellings is replaced whole.
    Literal(Vec<String>),
    /// `before` + text + `after`; only the text is replaced.
    Wrapped {
        before: String,
        texts: Vec<String>,
        after: String,
    },
    /// Regex match; the `open` and `close` groups are kept, the rest replaced.
    Pattern(Regex),
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    /// Dot-notation key; `{page}` expands to the page key prefix.
    pub key: String,
    pub anchor: Anchor,
    pub encode: Vec<Encoding>,
    /// Replacement template containing `{value}`.
    pub format: Option<String>,
    pub first_only: bool,
    /// Don't report the rule when its anchor is absent from a page.
    pub optional: bool,
}

impl Rule {
    pub fn resolved_key(&self, page_key: &str) -> String {
        self.key.replace("{page}", page_key)
    }

    /// Turn a dictionary value into the exact text written into the page.
    pub fn render(&self, value: &str) -> String {
        // `amp` has to run first or it would re-escape the other entities.
        let mut out = value.to_string();
        if self.encode.contains(&Encoding::Amp) {
            out = Encoding::Amp.apply(&out);
        }
        for encoding in self.encode.iter().filter(|e| **e != Encoding::Amp) {
            out = encoding.apply(&out);
        }
        match &self.format {
            Some(format) => format.replace("{value}", &out),
            None => out,
        }
    }
}

/// One rule as written in YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub key: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub encode: Vec<Encoding>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub first_only: bool,
    #[serde(default)]
    pub optional: bool,
}

impl RuleSpec {
    pub fn to_rule(&self) -> Result<Rule, ConfigError> {
        let name = self.name.clone().unwrap_or_else(|| self.key.clone());
        let fail = |reason: &str| ConfigError::Rule {
            rule: name.clone(),
            reason: reason.to_string(),
        };

        if self.key.trim().is_empty() {
            return Err(fail("key must not be empty"));
        }
        if let Some(format) = &self.format {
            if !format.contains("{value}") {
                return Err(fail("format must contain {value}"));
            }
        }

        let mut texts = self.texts.clone();
        if let Some(text) = &self.text {
            texts.insert(0, text.clone());
        }
        if texts.iter().any(String::is_empty) {
            return Err(fail("anchor text must not be empty"));
        }

        let anchor = match (&self.pattern, texts.is_empty()) {
            (Some(_), false) => return Err(fail("use either text or pattern, not both")),
            (None, true) => return Err(fail("a rule needs text, texts or pattern")),
            (Some(pattern), true) => {
                if self.before.is_some() || self.after.is_some() || self.element.is_some() {
                    return Err(fail("pattern rules cannot use before/after/element"));
                }
                let regex = Regex::new(pattern).map_err(|source| ConfigError::Pattern {
                    rule: name.clone(),
                    source,
                })?;
                Anchor::Pattern(regex)
            }
            (None, false) => {
                let (before, after) = match (&self.element, &self.before, &self.after) {
                    (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                        return Err(fail("element cannot be combined with before/after"))
                    }
                    (Some(tag), None, None) => (format!("<{tag}>"), format!("</{tag}>")),
                    (None, before, after) => (
                        before.clone().unwrap_or_default(),
                        after.clone().unwrap_or_default(),
                    ),
                };
                if before.is_empty() && after.is_empty() {
                    Anchor::Literal(texts)
                } else {
                    Anchor::Wrapped {
                        before,
                        texts,
                        after,
                    }
                }
            }
        };

        Ok(Rule {
            name,
            key: self.key.clone(),
            anchor,
            encode: self.encode.clone(),
            format: self.format.clone(),
            first_only: self.first_only,
            optional: self.optional,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogSpec {
    #[serde(default)]
    common: Vec<RuleSpec>,
    #[serde(default)]
    pages: BTreeMap<String, Vec<RuleSpec>>,
}

/// Page key prefix → ordered rule list, plus the rules shared by all pages.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    common: Vec<Rule>,
    pages: BTreeMap<String, Vec<Rule>>,
}

impl RuleCatalog {
    pub fn from_yaml(text: &str, what: &str) -> Result<Self, ConfigError> {
        let spec: CatalogSpec = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            what: what.to_string(),
            source,
        })?;
        let common = spec
            .common
            .iter()
            .map(RuleSpec::to_rule)
            .collect::<Result<Vec<_>, _>>()?;
        let mut pages = BTreeMap::new();
        for (page, specs) in &spec.pages {
            let rules = specs
                .iter()
                .map(RuleSpec::to_rule)
                .collect::<Result<Vec<_>, _>>()?;
            pages.insert(page.clone(), rules);
        }
        Ok(Self { common, pages })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text, &path.display().to_string())
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(DEFAULT_RULES, "built-in rule catalog")
    }

    /// Common rules followed by the page's own rules, in catalog order.
    pub fn rules_for<'a>(&'a self, page_key: &str) -> impl Iterator<Item = &'a Rule> + 'a {
        let page_rules = self.pages.get(page_key).map(Vec::as_slice).unwrap_or(&[]);
        self.common.iter().chain(page_rules.iter())
    }

    pub fn page_keys(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.common.len() + self.pages.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
