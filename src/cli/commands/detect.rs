//! Detect command: report the layout of each file
//!
//! Detection never reads past the first data record, except for legacy
//! files whose period is inferred from the years near both ends.

use super::shared::{CommandStats, component_kind, unique_paths};
use crate::cli::args::DetectArgs;
use crate::format::{Detection, detect, open_reader};
use crate::header::HeaderForm;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use std::time::Instant;
use tracing::warn;

pub fn run_detect(args: &DetectArgs) -> Result<CommandStats> {
    let start = Instant::now();
    let mut stats = CommandStats::default();

    for path in unique_paths(args.files.iter().cloned()) {
        match detect_file(&path) {
            Ok(detection) => {
                stats.files_read += 1;
                print_detection(&path, &detection);
            }
            Err(error) => {
                stats.errors_encountered += 1;
                warn!("{:#}", error);
                println!("{} {}", path.display().to_string().bright_white(), "unreadable".bright_red());
            }
        }
    }

    stats.processing_time = start.elapsed();
    if stats.has_errors() {
        anyhow::bail!("{} of {} files could not be detected", stats.errors_encountered, args.files.len());
    }
    Ok(stats)
}

fn detect_file(path: &Path) -> Result<Detection> {
    let kind = component_kind(path)?;
    let mut reader = open_reader(path)?;
    let detection = detect(&mut reader, kind.file_kind(), None, path)
        .with_context(|| format!("Failed to detect the layout of {}", path.display()))?;
    Ok(detection)
}

/// One line per file, e.g. `basin.cds: version 12+, 1950-2005 ACRE, fixed header`
pub fn describe(detection: &Detection) -> String {
    let header = match detection.header.as_ref().map(|h| h.form) {
        Some(HeaderForm::Fixed) => "fixed header",
        Some(HeaderForm::Tokenized) => "tokenized header",
        None => "no header",
    };
    let period = if detection.period_inferred {
        format!("{}-{} (inferred)", detection.period.0, detection.period.1)
    } else {
        format!("{}-{}", detection.period.0, detection.period.1)
    };
    format!(
        "{}, {} {}, {}",
        detection.dialect,
        period,
        detection.units(),
        header
    )
}

fn print_detection(path: &Path, detection: &Detection) {
    println!(
        "{}: {}",
        path.display().to_string().bright_white(),
        describe(detection).bright_green()
    );
}
