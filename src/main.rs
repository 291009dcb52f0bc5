use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;
use utilkit::cli::{args::Args, commands};
use utilkit::logging::configure_logger;
use utilkit::signal::new_signal_context;

fn main() {
    let args = Args::parse();

    if let Err(e) = configure_logger(&args.logging_config()) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result: anyhow::Result<()> = runtime.block_on(async {
        // Cancelled on SIGINT or SIGTERM; commands stop at the next record
        let token = new_signal_context(&CancellationToken::new(), &[])?;
        commands::run(args, token).await
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}
