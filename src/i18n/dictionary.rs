// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-language translation dictionaries.
//!
//! A dictionary is a nested JSON object addressed with dot-notation keys
//! (`"common.nav_map"`, `"meta.index_description"`). It is loaded once per
//! run and never mutated afterwards; the pipeline only ever borrows it.

use crate::error::DictionaryError;
use crate::types::Direction;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Identity fields every dictionary must carry under `meta`.
const IDENTITY_FIELDS: [&str; 4] = ["lang", "dir", "label", "nativeName"];

#[derive(Debug, Clone)]
pub struct Dictionary {
    code: String,
    direction: Direction,
    label: String,
    native_name: String,
    path: PathBuf,
    root: Map<String, Value>,
}

impl Dictionary {
    /// Load `{dir}/{code}.json`.
    pub fn load(dir: &Path, code: &str) -> Result<Self, DictionaryError> {
        let path = dir.join(format!("{code}.json"));
        let raw = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                DictionaryError::MissingFile(path.clone())
            } else {
                DictionaryError::Read {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        Self::parse(code, &raw, path)
    }

    /// Parse dictionary text that was read from `path`.
    pub fn parse(code: &str, raw: &str, path: PathBuf) -> Result<Self, DictionaryError> {
        let value: Value = serde_json::from_str(raw).map_err(|source| {
            DictionaryError::MalformedJson {
                path: path.clone(),
                source,
            }
        })?;
        let Value::Object(root) = value else {
            return Err(DictionaryError::Invalid {
                path,
                reason: "top-level value must be an object".to_string(),
            });
        };

        let identity = |field: &str| -> Result<String, DictionaryError> {
            match root.get("meta").and_then(|meta| meta.get(field)) {
                Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
                _ => Err(DictionaryError::Invalid {
                    path: path.clone(),
                    reason: format!("missing required field meta.{field}"),
                }),
            }
        };

        let [lang, dir, label, native_name] = IDENTITY_FIELDS;
        let (lang, dir, label, native_name) = (
            identity(lang)?,
            identity(dir)?,
            identity(label)?,
            identity(native_name)?,
        );

        if lang != code {
            return Err(DictionaryError::Invalid {
                path,
                reason: format!("meta.lang is '{lang}' but the file is for '{code}'"),
            });
        }
        let Some(direction) = Direction::parse(&dir) else {
            return Err(DictionaryError::Invalid {
                path,
                reason: format!("meta.dir must be 'ltr' or 'rtl', got '{dir}'"),
            });
        };

        Ok(Self {
            code: code.to_string(),
            direction,
            label,
            native_name,
            path,
            root,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn native_name(&self) -> &str {
        &self.native_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Traverse a dot-notation key. Stops at the first undefined segment.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Lookup restricted to non-empty strings, the only values the pipeline
    /// ever substitutes. Anything else counts as missing.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.lookup(key)? {
            Value::String(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Top-level section by name (`"common"`, `"js"`).
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// All leaf keys in dot notation, in document order.
    pub fn flatten(&self) -> Vec<String> {
        let mut keys = Vec::new();
        flatten_into(&self.root, None, &mut keys);
        keys
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: Option<&str>, out: &mut Vec<String>) {
    for (key, value) in map {
        let full_key = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(child) if !child.is_empty() => {
                flatten_into(child, Some(&full_key), out);
            }
            _ => out.push(full_key),
        }
    }
}

/// Keys present in `english` but absent (or `null`) in `other`, sorted.
pub fn list_missing_keys(english: &Dictionary, other: &Dictionary) -> Vec<String> {
    let mut missing: Vec<String> = english
        .flatten()
        .into_iter()
        .filter(|key| matches!(other.lookup(key), None | Some(Value::Null)))
        .collect();
    missing.sort();
    missing
}
