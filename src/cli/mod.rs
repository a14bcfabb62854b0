//! Command-line interface for lobster-ingest.
//!
//! Two subcommands: `assemble` turns raw scrape JSON into (or merges it
//! into) a six-collection artifact file, and `validate` checks any artifact
//! file against the import schema. Validation exit codes are part of the
//! contract consumed by the import tooling: 0 clean, 1 constraint errors,
//! 2 unreadable input.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::core::{extend_artifact, validate, AssembleOptions, Report};
use crate::domain::{Artifact, RawPage};

/// lobster-ingest - scrape output normalizer and artifact validator
#[derive(Parser, Debug)]
#[command(name = "lobster-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize raw scrape JSON into an importable artifact
    Assemble {
        /// Raw scrape file: one page object or an array of them
        input: PathBuf,

        /// Artifact file to write; merged into when it already exists
        #[arg(short, long, default_value = "artifact.json")]
        output: PathBuf,

        /// Author stamped on every emitted Resource
        #[arg(long)]
        author: Option<String>,

        /// Rating stamped on every emitted Resource (0.0-9.9)
        #[arg(long)]
        rating: Option<f64>,

        /// Capture date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Mark emitted resources as verified
        #[arg(long)]
        verified: bool,
    },

    /// Validate an artifact file against the import schema
    Validate {
        /// Path to the artifact JSON file
        artifact: PathBuf,
    },
}

impl Cli {
    pub fn execute(self) -> Result<ExitCode> {
        match self.command {
            Commands::Assemble {
                input,
                output,
                author,
                rating,
                date,
                verified,
            } => {
                let mut opts = AssembleOptions {
                    verified,
                    ..Default::default()
                };
                if let Some(author) = author {
                    opts.author = author;
                }
                if let Some(rating) = rating {
                    opts.rating = Some(rating);
                }
                if let Some(date) = date {
                    opts.capture_date = date;
                }
                run_assemble(&input, &output, &opts)?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Validate { artifact } => Ok(ExitCode::from(run_validate(&artifact))),
        }
    }
}

fn run_assemble(input: &PathBuf, output: &PathBuf, opts: &AssembleOptions) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read scrape file: {}", input.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse scrape file: {}", input.display()))?;

    let pages: Vec<RawPage> = if value.is_array() {
        serde_json::from_value(value).context("failed to decode scrape pages")?
    } else {
        vec![serde_json::from_value(value).context("failed to decode scrape page")?]
    };

    let mut artifact = if output.exists() {
        let existing = fs::read_to_string(output)
            .with_context(|| format!("failed to read existing artifact: {}", output.display()))?;
        let artifact: Artifact = serde_json::from_str(&existing)
            .with_context(|| format!("failed to parse existing artifact: {}", output.display()))?;
        info!(
            path = %output.display(),
            records = artifact.len(),
            "merging into existing artifact"
        );
        artifact
    } else {
        Artifact::default()
    };

    let before = artifact.len();
    extend_artifact(&mut artifact, &pages, opts)?;

    let json = serde_json::to_string_pretty(&artifact).context("failed to encode artifact")?;
    fs::write(output, json)
        .with_context(|| format!("failed to write artifact: {}", output.display()))?;

    println!(
        "Wrote {} (+{} records): {} resources, {} notes, {} pdfs, {} images, {} videos, {} websites",
        output.display(),
        artifact.len() - before,
        artifact.resources.len(),
        artifact.notes.len(),
        artifact.pdfs.len(),
        artifact.images.len(),
        artifact.videos.len(),
        artifact.websites.len(),
    );

    Ok(())
}

/// Validate an artifact file and report the exit code the import tooling
/// keys on: 0 clean, 1 constraint errors, 2 unreadable input.
pub fn run_validate(path: &PathBuf) -> u8 {
    let value = match read_artifact(path) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            return 2;
        }
    };

    let report = validate(&value);
    print_report(&report);

    if report.is_ok() {
        0
    } else {
        1
    }
}

fn read_artifact(path: &PathBuf) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse artifact file: {}", path.display()))
}

fn print_report(report: &Report) {
    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for issue in &report.warnings {
            println!("  - {issue}");
        }
    }

    if report.is_ok() {
        println!(
            "Validation OK: no errors, {} warning(s)",
            report.warnings.len()
        );
    } else {
        println!("\nErrors:");
        for issue in &report.errors {
            println!("  - {issue}");
        }
        println!(
            "\nValidation FAILED: {} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
    }
}
