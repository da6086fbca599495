// SPDX-License-Identifier: PMPL-1.0-or-later

//! Audit of generated output.
//!
//! Walks every language directory under the output root and checks the
//! invariants generation must uphold: one canonical link at most, one
//! `x-default` alternate at most, a single runtime block, parseable JSON-LD,
//! and an `<html lang>` that matches the directory.

use crate::config::Site;
use colored::*;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static LD_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script type="application/ld\+json">(.*?)</script>"#)
        .expect("static pattern")
});
static HTML_LANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<html\s+lang="([^"]*)""#).expect("static pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warn,
    Error,
}

impl Level {
    fn tag(&self) -> ColoredString {
        match self {
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERR".red(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub path: PathBuf,
    pub level: Level,
    pub detail: String,
}

impl Finding {
    fn new(path: &Path, level: Level, detail: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            level,
            detail: detail.into(),
        }
    }

    fn print(&self) {
        println!("  [{}] {} {}", self.level.tag(), self.path.display(), self.detail);
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub files_checked: usize,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.level == Level::Error)
    }

    pub fn count(&self, level: Level) -> usize {
        self.findings.iter().filter(|f| f.level == level).count()
    }

    pub fn print(&self) {
        println!("{}", "reroute-pages output audit".bold());
        println!();
        for finding in &self.findings {
            finding.print();
        }
        if !self.findings.is_empty() {
            println!();
        }
        println!(
            "  {} files checked, {} errors, {} warnings",
            self.files_checked,
            self.count(Level::Error),
            self.count(Level::Warn)
        );
    }
}

/// Audit `{output_root}/{lang}/**/*.html` for each of `languages`.
pub fn audit_output(site: &Site, languages: &[String]) -> AuditReport {
    let mut report = AuditReport::default();

    for language in languages {
        let dir = site.output_root.join(language);
        if !dir.is_dir() {
            report
                .findings
                .push(Finding::new(&dir, Level::Warn, "no generated output"));
            continue;
        }
        for entry in WalkDir::new(&dir).into_iter().filter_map(Result::ok) {
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("html")
            {
                continue;
            }
            report.files_checked += 1;
            match fs::read_to_string(path) {
                Ok(text) => report.findings.extend(check_page(path, &text, language)),
                Err(e) => report
                    .findings
                    .push(Finding::new(path, Level::Error, format!("unreadable: {e}"))),
            }
        }
    }
    report
}

/// Problems found in one generated page. An empty list means the page is
/// clean.
pub fn check_page(path: &Path, text: &str, language: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    let canonical = text.matches("rel=\"canonical\"").count();
    if canonical > 1 {
        findings.push(Finding::new(
            path,
            Level::Error,
            format!("{canonical} canonical links"),
        ));
    } else if canonical == 0 {
        findings.push(Finding::new(path, Level::Warn, "no canonical link"));
    }

    let x_default = text.matches("hreflang=\"x-default\"").count();
    if x_default > 1 {
        findings.push(Finding::new(
            path,
            Level::Error,
            format!("{x_default} x-default alternates"),
        ));
    }

    let runtime = text.matches("window._T=").count();
    if runtime > 1 {
        findings.push(Finding::new(
            path,
            Level::Error,
            format!("runtime translations injected {runtime} times"),
        ));
    }

    for (i, caps) in LD_BODY.captures_iter(text).enumerate() {
        let body = caps.get(1).map_or("", |m| m.as_str());
        if let Err(e) = serde_json::from_str::<serde_json::Value>(body) {
            findings.push(Finding::new(
                path,
                Level::Error,
                format!("JSON-LD block #{i} does not parse: {e}"),
            ));
        }
    }

    match HTML_LANG.captures(text).and_then(|c| c.get(1)) {
        Some(lang) if lang.as_str() == language => {}
        Some(lang) => findings.push(Finding::new(
            path,
            Level::Warn,
            format!("<html lang=\"{}\"> in the {language} tree", lang.as_str()),
        )),
        None => findings.push(Finding::new(path, Level::Warn, "no <html lang> attribute")),
    }

    findings
}
