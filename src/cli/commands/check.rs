//! Check command: read files and run the consistency checks

use super::shared::{CommandStats, create_progress_bar, file_name};
use crate::cli::args::CheckArgs;
use crate::dataset::{DataSet, discover, expand_patterns};
use crate::models::ComponentKind;
use crate::validation::Severity;
use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

pub fn run_check(args: &CheckArgs, show_progress: bool) -> Result<CommandStats> {
    let start = Instant::now();
    let files = collect_files(args)?;
    if files.is_empty() {
        anyhow::bail!("No crop pattern or irrigation practice files to check");
    }
    info!("Checking {} files", files.len());

    let options = args.input.read_options();
    let pb = create_progress_bar(files.len() as u64, "Reading", show_progress && files.len() > 1);
    let mut data_set = DataSet::default();
    let mut errors = Vec::new();
    for (path, kind) in &files {
        pb.set_message(file_name(path));
        if let Some(error) = data_set.load_file(path, *kind, &options) {
            errors.push(error);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let problems = data_set.validate();
    let mut stats = CommandStats {
        files_read: data_set.file_count(),
        locations_read: data_set.location_count(),
        problems_found: problems.len(),
        ..Default::default()
    };

    for error in &errors {
        println!("{} {}", "read error".bright_red().bold(), error);
    }
    for (path, problem) in &problems {
        let text = format!("{}: {}", file_name(path), problem);
        match problem.severity {
            Severity::Error => println!("{}", text.bright_red()),
            Severity::Warning => println!("{}", text.bright_yellow()),
        }
    }

    let failed_checks = problems
        .iter()
        .filter(|(_, p)| p.severity == Severity::Error)
        .count();
    stats.errors_encountered = errors.len() + failed_checks;
    stats.processing_time = start.elapsed();
    stats.print_summary("Check Summary");

    if stats.has_errors() {
        warn!(
            "{} read errors, {} failed checks",
            errors.len(),
            failed_checks
        );
        anyhow::bail!(
            "Check failed: {} read errors, {} failed checks",
            errors.len(),
            failed_checks
        );
    }
    Ok(stats)
}

fn collect_files(args: &CheckArgs) -> Result<Vec<(PathBuf, ComponentKind)>> {
    let mut files = expand_patterns(&args.patterns)?;
    if let Some(dir) = &args.dir {
        files.extend(discover(dir)?);
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::InputOptions;
    use std::fs;
    use tempfile::TempDir;

    const GOOD: &str = concat!(
        "  1950  1950 ACRE  CYR\n",
        "1950 0100501          100.    1\n",
        "     ALFALFA             1.000\n",
    );

    fn check_args(patterns: Vec<String>, dir: Option<PathBuf>) -> CheckArgs {
        CheckArgs {
            patterns,
            dir,
            input: InputOptions::default(),
        }
    }

    #[test]
    fn test_check_passes_good_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.cds"), GOOD).unwrap();
        let stats = run_check(&check_args(Vec::new(), Some(dir.path().to_path_buf())), false).unwrap();
        assert_eq!(stats.files_read, 1);
        assert_eq!(stats.locations_read, 1);
    }

    #[test]
    fn test_check_fails_on_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.ipy").to_string_lossy().to_string();
        assert!(run_check(&check_args(vec![missing], None), false).is_err());
    }

    #[test]
    fn test_collect_files_deduplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("good.cds");
        fs::write(&path, GOOD).unwrap();
        let args = check_args(
            vec![path.to_string_lossy().to_string()],
            Some(dir.path().to_path_buf()),
        );
        assert_eq!(collect_files(&args).unwrap().len(), 1);
    }
}
