// SPDX-License-Identifier: PMPL-1.0-or-later

//! Terminal rendering of a generation run

use crate::types::*;
use colored::*;

pub struct ReportFormatter {
    verbose: bool,
}

impl ReportFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print(&self, report: &GenerationReport) {
        println!("\n{}", "=== REROUTE-PAGES GENERATION REPORT ===".bold().cyan());
        println!(
            "  Languages: {}  |  Pages: {}",
            report.languages.join(" "),
            report.pages.len()
        );
        println!(
            "  Written: {}  |  Unchanged: {}  |  Skipped: {}",
            report.written.to_string().green(),
            report.unchanged,
            report.skipped
        );
        println!();

        self.print_units(&report.units);
        self.print_failures(&report.failures);

        let status = if report.is_success() {
            "PASSED".green()
        } else {
            "FAILED".red()
        };
        println!(
            "{} {} units, {} fallback keys, {} unmatched anchors, {} failures",
            status.bold(),
            report.units.len(),
            report.total_fallbacks(),
            report.total_unmatched(),
            report.failures.len()
        );
        println!();
    }

    fn print_units(&self, units: &[UnitOutcome]) {
        if !self.verbose {
            return;
        }
        println!("{}", "UNITS".bold().yellow());
        for unit in units {
            let status = match unit.status {
                WriteStatus::Written => "written".green(),
                WriteStatus::Unchanged => "unchanged".normal(),
                WriteStatus::DryRun => "dry-run".blue(),
            };
            println!(
                "  {:<10} {:<4} {} {}",
                status,
                unit.language,
                unit.output_path.display(),
                unit.digest[..12.min(unit.digest.len())].dimmed()
            );
            if !unit.fallback_keys.is_empty() {
                println!(
                    "    Fallbacks: {}",
                    unit.fallback_keys.join(", ").dimmed()
                );
            }
            if !unit.unmatched_rules.is_empty() {
                println!(
                    "    Unmatched: {}",
                    unit.unmatched_rules.join(", ").yellow()
                );
            }
            if !unit.conflicting_rules.is_empty() {
                println!(
                    "    Conflicts: {}",
                    unit.conflicting_rules.join(", ").red()
                );
            }
        }
        println!();
    }

    fn print_failures(&self, failures: &[UnitFailure]) {
        if failures.is_empty() {
            return;
        }
        println!("{}", "FAILURES".bold().red());
        for (i, failure) in failures.iter().enumerate() {
            println!(
                "  {}. [{}] {} {}: {}",
                i + 1,
                failure.stage.to_string().red(),
                failure.page.as_deref().unwrap_or("*").bold(),
                failure.language.as_deref().unwrap_or("*"),
                failure.cause
            );
        }
        println!();
    }
}
