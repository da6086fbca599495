// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for exported run reports

use crate::types::GenerationReport;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportOutputFormat {
    Json,
    Yaml,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            _ => None,
        }
    }

    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    pub fn serialize(&self, report: &GenerationReport) -> Result<String> {
        match self {
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        }
    }
}

/// Write `report` to `path`. Without an explicit format the extension
/// decides.
pub fn write_report(
    report: &GenerationReport,
    path: &Path,
    format: Option<ReportOutputFormat>,
) -> Result<()> {
    let Some(format) = format.or_else(|| ReportOutputFormat::from_path(path)) else {
        bail!(
            "cannot infer report format from {} (use .json, .yaml or .yml)",
            path.display()
        );
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let text = format.serialize(report)?;
    fs::write(path, text).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}
