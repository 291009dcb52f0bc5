//! Helpers shared by CLI commands: progress spinners and summary output

use anyhow::Result;
use chrono::Utc;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::dates::format_iso8601_datetime;

/// Create a ticking spinner, or `None` when progress output is disabled
pub fn create_spinner(show_progress: bool, message: impl Into<String>) -> Result<Option<ProgressBar>> {
    if !show_progress {
        return Ok(None);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {msg}",
    )?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(Some(pb))
}

/// Print a bold section title preceded by a blank line
pub fn print_title(title: &str) {
    println!("\n{}", title.bright_green().bold());
}

/// Print an aligned `label: value` summary line
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<14} {}", format!("{}:", label), value);
}

/// Current UTC time for summary footers
pub fn completed_at() -> String {
    format_iso8601_datetime(&Utc::now())
}
