// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions shared by the pipeline, the batch driver and the
//! report renderers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Text direction declared by a dictionary's `meta.dir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ltr" => Some(Direction::Ltr),
            "rtl" => Some(Direction::Rtl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Language,
    Registry,
    Template,
    Dictionary,
    Substitution,
    JsonLd,
    Write,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Language => "language",
            Stage::Registry => "registry",
            Stage::Template => "template",
            Stage::Dictionary => "dictionary",
            Stage::Substitution => "substitution",
            Stage::JsonLd => "jsonld",
            Stage::Write => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One itemized failure. `page` or `language` is `None` when the failure
/// covers every page of a language (or every language of a page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    pub page: Option<String>,
    pub language: Option<String>,
    pub stage: Stage,
    pub cause: String,
}

impl UnitFailure {
    pub fn new(
        page: Option<&str>,
        language: Option<&str>,
        stage: Stage,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            page: page.map(str::to_string),
            language: language.map(str::to_string),
            stage,
            cause: cause.into(),
        }
    }
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.page.as_deref().unwrap_or("*"),
            self.language.as_deref().unwrap_or("*"),
            self.stage,
            self.cause
        )
    }
}

/// What happened to a generated file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Written,
    Unchanged,
    DryRun,
}

/// Successful (page, language) unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitOutcome {
    pub page: String,
    pub language: String,
    pub output_path: PathBuf,
    pub digest: String,
    pub status: WriteStatus,
    /// Keys that were missing and fell back to the English text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback_keys: Vec<String>,
    /// Non-optional rules whose anchor never occurred in the template.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched_rules: Vec<String>,
    /// Rules dropped because their anchor overlapped an earlier rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting_rules: Vec<String>,
}

/// Summary of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub created_at: String,
    pub languages: Vec<String>,
    pub pages: Vec<String>,
    pub written: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failures: Vec<UnitFailure>,
    pub units: Vec<UnitOutcome>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_fallbacks(&self) -> usize {
        self.units.iter().map(|u| u.fallback_keys.len()).sum()
    }

    pub fn total_unmatched(&self) -> usize {
        self.units.iter().map(|u| u.unmatched_rules.len()).sum()
    }
}
