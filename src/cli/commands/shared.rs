//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::Result;
use crate::cli::args::Args;
use crate::models::ComponentKind;
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct CommandStats {
    /// Number of files read
    pub files_read: usize,
    /// Number of locations read
    pub locations_read: usize,
    /// Number of files written
    pub files_written: usize,
    /// Number of years changed by reconciliation
    pub years_reconciled: usize,
    /// Number of validation problems found
    pub problems_found: usize,
    /// Number of errors encountered
    pub errors_encountered: usize,
    /// Total processing time
    pub processing_time: Duration,
}

impl CommandStats {
    pub fn has_errors(&self) -> bool {
        self.errors_encountered > 0
    }

    /// Print a short summary to stdout
    pub fn print_summary(&self, title: &str) {
        println!("\n{}", title.bright_green().bold());
        println!(
            "  {} {}",
            "Files read:".bright_cyan(),
            self.files_read.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Locations:".bright_cyan(),
            self.locations_read.to_string().bright_white()
        );
        if self.files_written > 0 {
            println!(
                "  {} {}",
                "Files written:".bright_cyan(),
                self.files_written.to_string().bright_white()
            );
        }
        if self.years_reconciled > 0 {
            println!(
                "  {} {}",
                "Years reconciled:".bright_cyan(),
                self.years_reconciled.to_string().bright_white()
            );
        }
        if self.problems_found > 0 {
            println!(
                "  {} {}",
                "Problems:".bright_yellow(),
                self.problems_found.to_string().bright_yellow().bold()
            );
        }
        if self.errors_encountered > 0 {
            println!(
                "  {} {}",
                "Errors:".bright_red(),
                self.errors_encountered.to_string().bright_red().bold()
            );
        }
        println!(
            "  {} {}",
            "Time elapsed:".bright_cyan(),
            HumanDuration(self.processing_time).to_string().bright_white()
        );
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cu_acreage={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Component kind of a file named on the command line
pub fn component_kind(path: &Path) -> Result<ComponentKind> {
    ComponentKind::from_path(path).ok_or_else(|| {
        crate::CuError::configuration(format!(
            "{}: cannot tell the file type from its extension (expected .cds or .ipy)",
            path.display()
        ))
    })
}

/// Display name of a path for progress messages
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Create a progress bar with appropriate styling.
///
/// A hidden bar is returned when progress is switched off.
pub fn create_progress_bar(total: u64, message: &str, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Sorted, deduplicated list of paths
pub fn unique_paths(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = paths.into_iter().collect();
    paths.sort();
    paths.dedup();
    paths
}
