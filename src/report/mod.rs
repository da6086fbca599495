// SPDX-License-Identifier: PMPL-1.0-or-later

//! Run report rendering and export

pub mod formatter;
pub mod output;

use crate::types::GenerationReport;

pub use formatter::ReportFormatter;
pub use output::{write_report, ReportOutputFormat};

/// Print report to console
pub fn print_report(report: &GenerationReport, verbose: bool) {
    ReportFormatter::new(verbose).print(report);
}
