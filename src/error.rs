// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error taxonomy for the page generator.
//!
//! Unit-level errors never cross the batch boundary: the driver converts
//! each one into a [`UnitFailure`](crate::types::UnitFailure) and keeps going.
//! Missing translation keys have no variant: they fall back to English.

use crate::types::Stage;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading a per-language dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid dictionary {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Failures while loading an English template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template is not valid UTF-8: {}", .0.display())]
    Encoding(PathBuf),
}

/// Failures raised while running the per-unit pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("unregistered page: {0} (add it to the page registration table)")]
    UnregisteredPage(String),

    #[error("malformed JSON-LD block #{index}: {source}")]
    MalformedStructuredData {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize JSON-LD block #{index}: {source}")]
    StructuredDataSerialize {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize runtime translations: {0}")]
    RuntimeSerialize(#[source] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Stage a failure is reported under.
    pub fn stage(&self) -> Stage {
        match self {
            GenerateError::UnregisteredPage(_) => Stage::Registry,
            GenerateError::MalformedStructuredData { .. }
            | GenerateError::StructuredDataSerialize { .. } => Stage::JsonLd,
            GenerateError::RuntimeSerialize(_) => Stage::Substitution,
            GenerateError::Write { .. } => Stage::Write,
        }
    }
}

/// Failures in the site configuration or the rule catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid pattern in rule '{rule}': {source}")]
    Pattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid rule '{rule}': {reason}")]
    Rule { rule: String, reason: String },

    #[error("configuration error in '{field}': {message}")]
    Invalid { field: String, message: String },
}
