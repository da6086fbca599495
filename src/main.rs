// SPDX-License-Identifier: PMPL-1.0-or-later

//! reroute-pages: generate translated copies of the site's English pages
//!
//! With no subcommand every target language is generated; positional
//! arguments restrict the run to those languages. `missing`, `stale` and
//! `audit` only inspect, they never write pages.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use reroute_pages::batch::{self, GenerateOptions};
use reroute_pages::config::Site;
use reroute_pages::report::{self, ReportOutputFormat};
use reroute_pages::{audit, freshness, missing};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reroute-pages")]
#[command(version)]
#[command(about = "Generate translated static pages from English templates")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args)]
struct GlobalArgs {
    /// Site root holding the templates and translations/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Site configuration (default: <root>/site.yaml, else built-in)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Substitution rule catalog (default: built-in)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Output root (default: the site root)
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Languages to generate (default: all but the source language)
    #[arg(value_name = "LANG")]
    languages: Vec<String>,

    /// Run the whole pipeline but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Process units in parallel
    #[arg(short = 'j', long)]
    parallel: bool,

    /// Write the run report to file (.json, .yaml or .yml)
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Report format, overriding the file extension
    #[arg(long, value_enum, requires = "report")]
    report_format: Option<ReportOutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// List dictionary keys that fall back to English
    Missing {
        #[arg(value_name = "LANG")]
        languages: Vec<String>,

        /// Exit non-zero when any key is missing
        #[arg(long)]
        strict: bool,
    },

    /// Find generated pages older than their template or dictionary
    Stale {
        #[arg(value_name = "LANG")]
        languages: Vec<String>,
    },

    /// Check generated output for duplicated tags and broken JSON-LD
    Audit {
        #[arg(value_name = "LANG")]
        languages: Vec<String>,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reroute_pages={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Requested languages checked against the configuration, or every target
/// language when none were given.
fn inspect_languages(site: &Site, requested: Vec<String>) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(site.config.target_languages());
    }
    for code in &requested {
        if !site.config.languages.contains(code) {
            bail!("'{code}' is not a configured language");
        }
    }
    Ok(requested)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(global.verbose, global.quiet);

    let site = Site::load(
        &global.root,
        global.out.clone(),
        global.config.as_deref(),
        global.rules.as_deref(),
    )
    .context("loading site configuration")?;

    match cli.command {
        None => {
            let args = cli.generate;
            let options = GenerateOptions {
                languages: args.languages,
                dry_run: args.dry_run,
                parallel: args.parallel,
            };
            let report = batch::run(&site, &options);

            if !global.quiet {
                report::print_report(&report, global.verbose);
            }
            if let Some(path) = &args.report {
                report::write_report(&report, path, args.report_format)?;
                if !global.quiet {
                    println!("Report saved to: {}", path.display());
                }
            }
            if !report.is_success() {
                bail!("{} failure(s) during generation", report.failures.len());
            }
        }

        Some(Commands::Missing { languages, strict }) => {
            let languages = inspect_languages(&site, languages)?;
            let results = missing::check(&site, &languages)?;
            missing::print_summary(&results, global.verbose);

            if results.iter().any(|r| r.error.is_some()) {
                bail!("some dictionaries could not be loaded");
            }
            let incomplete = results.iter().filter(|r| !r.is_complete()).count();
            if strict && incomplete > 0 {
                bail!("{incomplete} language(s) have missing keys");
            }
        }

        Some(Commands::Stale { languages }) => {
            let languages = inspect_languages(&site, languages)?;
            let results = freshness::check(&site, &languages);
            freshness::print_summary(&results);
        }

        Some(Commands::Audit { languages }) => {
            let languages = inspect_languages(&site, languages)?;
            let report = audit::audit_output(&site, &languages);
            report.print();
            if report.has_errors() {
                bail!("output audit reported errors");
            }
        }
    }

    Ok(())
}
