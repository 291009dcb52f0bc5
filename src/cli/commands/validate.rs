//! Validate command implementation
//!
//! Reads every input with the CSV iterator, collecting malformed rows and the
//! column count of each file. Validation fails when any file has row errors or
//! when the inputs disagree on their column count, which would make a merge of
//! the same inputs fail.

use super::shared::{completed_at, create_spinner, print_field, print_title};
use crate::Result;
use crate::cli::args::ValidateArgs;
use crate::cli::input::expand_inputs;
use crate::config::CsvOptions;
use crate::csvio::{BoxError, CsvError, CsvIterator};
use crate::error::Error;
use crate::logging::ElapsedTimer;
use anyhow::{Context, bail};
use colored::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, info, warn};

/// Outcome of checking one input file
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    /// Data records read successfully
    pub records: usize,
    /// Column count of the first well-formed record, header included
    pub columns: Option<usize>,
    pub errors: Vec<CsvError>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Outcome of checking every input
#[derive(Debug, Default)]
pub struct ValidationSummary {
    pub files: Vec<FileReport>,
}

impl ValidationSummary {
    /// Files grouped by their column count
    pub fn column_counts(&self) -> BTreeMap<usize, Vec<&Path>> {
        let mut counts: BTreeMap<usize, Vec<&Path>> = BTreeMap::new();
        for file in &self.files {
            if let Some(columns) = file.columns {
                counts.entry(columns).or_default().push(&file.path);
            }
        }
        counts
    }

    pub fn total_records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.files.iter().map(|f| f.errors.len()).sum()
    }

    pub fn is_valid(&self) -> bool {
        self.files.iter().all(FileReport::is_valid) && self.column_counts().len() <= 1
    }
}

/// Validate command runner
pub async fn run_validate(
    args: ValidateArgs,
    show_progress: bool,
    token: CancellationToken,
) -> anyhow::Result<ValidationSummary> {
    let _timer = ElapsedTimer::start(Level::INFO, "validate_command");

    let inputs = expand_inputs(&args.inputs)?;
    let options = args.csv_options();
    info!("Validating {} inputs", inputs.len());

    let spinner = create_spinner(show_progress, format!("Validating {} files...", inputs.len()))?;

    let worker_token = token.clone();
    let summary = tokio::task::spawn_blocking(move || validate_files(&inputs, &options, &worker_token))
        .await
        .context("validation task failed")??;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    print_report(&summary, args.max_errors);

    if !summary.is_valid() {
        bail!(
            "validation failed: {} row errors, {} distinct column counts",
            summary.total_errors(),
            summary.column_counts().len()
        );
    }
    Ok(summary)
}

/// Check every file in `inputs`
pub fn validate_files(
    inputs: &[PathBuf],
    options: &CsvOptions,
    token: &CancellationToken,
) -> Result<ValidationSummary> {
    let mut summary = ValidationSummary::default();
    for input in inputs {
        summary.files.push(validate_file(input, options, token)?);
    }
    Ok(summary)
}

/// Check one file, collecting its row errors
///
/// A file that cannot be opened is reported with a single error. Only
/// cancellation aborts the check.
pub fn validate_file(
    path: &Path,
    options: &CsvOptions,
    token: &CancellationToken,
) -> Result<FileReport> {
    ensure_not_cancelled(token, path)?;

    let mut report = FileReport {
        path: path.to_path_buf(),
        records: 0,
        columns: None,
        errors: Vec::new(),
    };

    let iter = match CsvIterator::with_buffer_size(
        path,
        options.has_header,
        options.buffer_size,
        |fields: &csv::StringRecord| Ok::<_, BoxError>(fields.len()),
    ) {
        Ok(iter) => iter,
        Err(e) => {
            warn!(path = %path.display(), err = %e, "cannot open input");
            report.errors.push(e);
            return Ok(report);
        }
    };

    for item in iter {
        ensure_not_cancelled(token, path)?;

        match item {
            Ok(record) => {
                report.records += 1;
                report.columns.get_or_insert(record.data);
            }
            Err(e) => {
                debug!(path = %path.display(), err = %e, "malformed row");
                report.errors.push(e);
            }
        }
    }

    Ok(report)
}

fn ensure_not_cancelled(token: &CancellationToken, path: &Path) -> Result<()> {
    if token.is_cancelled() {
        return Err(Error::processing_interrupted(format!(
            "validation cancelled while reading {}",
            path.display()
        )));
    }
    Ok(())
}

fn print_report(summary: &ValidationSummary, max_errors: usize) {
    print_title("Validation Results");

    for file in &summary.files {
        let status = if file.is_valid() {
            "OK".bright_green().bold()
        } else {
            "FAIL".bright_red().bold()
        };
        let columns = file
            .columns
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {} ({} records, {} columns)",
            status,
            file.path.display(),
            file.records,
            columns
        );

        for error in file.errors.iter().take(max_errors) {
            println!("      {}", error.to_string().red());
        }
        if file.errors.len() > max_errors {
            println!("      ... {} more errors", file.errors.len() - max_errors);
        }
    }

    let counts = summary.column_counts();
    if counts.len() > 1 {
        println!("\n  {}", "Inconsistent column counts:".bright_red().bold());
        for (columns, files) in &counts {
            println!("    {} columns: {} files", columns, files.len());
        }
    }

    print_title("Validation Summary");
    print_field("Files", summary.files.len().to_string().bright_white().bold());
    print_field("Records", summary.total_records().to_string().bright_white().bold());
    print_field("Row errors", summary.total_errors());
    print_field("Completed", completed_at());
}
