//! Command implementations for the utilkit CLI
//!
//! Each subcommand lives in its own module and reports its own summary.
//! Commands receive the signal-derived cancellation token from `main`.

pub mod merge;
pub mod shared;
pub mod validate;

use crate::cli::args::{Args, Commands};
use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Dispatch to the handler of the selected subcommand
pub async fn run(args: Args, token: CancellationToken) -> Result<()> {
    let show_progress = args.show_progress();
    match args.command {
        Commands::Merge(merge_args) => {
            merge::run_merge(merge_args, show_progress, token).await?;
        }
        Commands::Validate(validate_args) => {
            validate::run_validate(validate_args, show_progress, token).await?;
        }
    }
    Ok(())
}
