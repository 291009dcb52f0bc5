//! Merge command implementation
//!
//! Resolves the input patterns, runs the merge on the blocking pool and
//! prints a summary once it completes.

use super::shared::{completed_at, create_spinner, print_field, print_title};
use crate::cli::args::MergeArgs;
use crate::cli::input::expand_inputs;
use crate::csvio::{MergeSummary, ensure_output_is_not_input, merge_with_cancellation};
use crate::logging::ElapsedTimer;
use anyhow::{Context, Result};
use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};

/// Merge command runner
pub async fn run_merge(
    args: MergeArgs,
    show_progress: bool,
    token: CancellationToken,
) -> Result<MergeSummary> {
    let _timer = ElapsedTimer::start(Level::INFO, "merge_command");

    let inputs = expand_inputs(&args.inputs)?;
    ensure_output_is_not_input(&args.output, &inputs)?;
    info!(
        "Merging {} inputs into {}",
        inputs.len(),
        args.output.display()
    );

    let spinner = create_spinner(show_progress, format!("Merging {} files...", inputs.len()))?;

    let output = args.output.clone();
    let has_header = args.header;
    let worker_token = token.clone();
    let mut handle = tokio::task::spawn_blocking(move || {
        merge_with_cancellation(&output, has_header, &inputs, &worker_token)
    });

    let result = tokio::select! {
        joined = &mut handle => joined.context("merge task failed")?,
        _ = token.cancelled() => {
            warn!("Cancellation requested, waiting for merge to stop");
            // The worker observes the same token before each record
            handle.await.context("merge task failed")?
        }
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            error!(path = %args.output.display(), err = %e, "merge failed");
            if let Some(pb) = &spinner {
                pb.abandon_with_message("Merge failed");
            }
            return Err(e).with_context(|| format!("Failed to merge into {}", args.output.display()));
        }
    };

    if let Some(pb) = &spinner {
        pb.finish_with_message("Merge completed");
    }

    print_summary(&summary);
    Ok(summary)
}

fn print_summary(summary: &MergeSummary) {
    print_title("Merge Summary");
    print_field("Output", summary.output.display());
    print_field(
        "Files merged",
        summary.files_merged.to_string().bright_white().bold(),
    );
    print_field("Data rows", summary.data_rows.to_string().bright_white().bold());
    print_field(
        "Header",
        if summary.header_written { "written" } else { "none" },
    );
    print_field("Completed", completed_at());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn merge_args(dir: &TempDir, inputs: Vec<String>, header: bool) -> MergeArgs {
        MergeArgs {
            output: dir.path().join("out").join("merged.csv"),
            header,
            inputs,
        }
    }

    #[tokio::test]
    async fn test_run_merge_expands_glob() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.csv"), "id,name\n1,x\n").unwrap();
        fs::write(temp_dir.path().join("b.csv"), "id,name\n2,y\n3,z\n").unwrap();

        let pattern = format!("{}/*.csv", temp_dir.path().display());
        let args = merge_args(&temp_dir, vec![pattern], true);
        let output = args.output.clone();

        let summary = run_merge(args, false, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.files_merged, 2);
        assert_eq!(summary.data_rows, 3);
        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "id,name\n1,x\n2,y\n3,z\n"
        );
    }

    #[tokio::test]
    async fn test_run_merge_reports_mismatch_with_context() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.csv");
        let b = temp_dir.path().join("b.csv");
        fs::write(&a, "1,2\n").unwrap();
        fs::write(&b, "1,2,3\n").unwrap();

        let args = merge_args(
            &temp_dir,
            vec![a.display().to_string(), b.display().to_string()],
            false,
        );

        let err = run_merge(args, false, CancellationToken::new())
            .await
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("Failed to merge into"), "{message}");
        assert!(message.contains("expected 2 columns, found 3"), "{message}");
    }

    #[tokio::test]
    async fn test_run_merge_cancelled_before_start() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.csv");
        fs::write(&a, "1,2\n3,4\n").unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let args = merge_args(&temp_dir, vec![a.display().to_string()], false);
        let err = run_merge(args, false, token).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Processing interrupted"));
    }

    #[tokio::test]
    async fn test_run_merge_rejects_output_among_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.csv");
        fs::write(&a, "id\n1\n").unwrap();

        let args = MergeArgs {
            output: a.clone(),
            header: true,
            inputs: vec![format!("{}/*.csv", temp_dir.path().display())],
        };

        let err = run_merge(args, false, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("is also an input"), "{err}");
        assert_eq!(fs::read_to_string(&a).unwrap(), "id\n1\n");
    }
}
