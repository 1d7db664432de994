//! Convert command: rewrite a file in another layout
//!
//! The input is read completely before anything is written; a partial read
//! is an error so a truncated file is never written out as if whole.

use super::shared::{CommandStats, component_kind};
use crate::cli::args::ConvertArgs;
use crate::config::WriteOptions;
use crate::crop_pattern::{read_crop_pattern_file, write_crop_pattern_file};
use crate::irrigation::{read_irrigation_practice_file, write_irrigation_practice_file};
use crate::models::ComponentKind;
use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;
use tracing::info;

pub fn run_convert(args: &ConvertArgs) -> Result<CommandStats> {
    let start = Instant::now();
    args.validate()?;

    let kind = component_kind(&args.input_path)?;
    if let Some(out_kind) = ComponentKind::from_path(&args.output_path) {
        if out_kind != kind {
            anyhow::bail!(
                "Cannot convert a {} file into {}",
                kind,
                args.output_path.display()
            );
        }
    }

    let read_options = args.input.read_options();
    let write_options = args.write_options();
    let mut stats = CommandStats::default();

    match kind {
        ComponentKind::CropPatternTs => {
            let mut file = read_crop_pattern_file(&args.input_path, &read_options)?
                .into_result()
                .with_context(|| format!("Failed to read {}", args.input_path.display()))?;
            info!("Converting {} from {} to {}", kind, file.dialect, write_options.dialect);
            stats.locations_read = file.locations.len();
            let options = carry_comments(write_options, &file.comments);
            write_crop_pattern_file(&args.output_path, &mut file.locations, &options)?;
        }
        ComponentKind::IrrigationPracticeTs => {
            let mut file = read_irrigation_practice_file(&args.input_path, &read_options)?
                .into_result()
                .with_context(|| format!("Failed to read {}", args.input_path.display()))?;
            info!("Converting {} from {} to {}", kind, file.dialect, write_options.dialect);
            stats.locations_read = file.locations.len();
            let options = carry_comments(write_options, &file.comments);
            write_irrigation_practice_file(&args.output_path, &mut file.locations, &options)?;
        }
    }

    stats.files_read = 1;
    stats.files_written = 1;
    stats.processing_time = start.elapsed();
    println!(
        "{} {} {}",
        "Wrote".bright_green(),
        args.output_path.display().to_string().bright_white().bold(),
        format!("({})", args.to).bright_cyan()
    );
    Ok(stats)
}

/// Keep the input's free-text comments in the output header
pub fn carry_comments(options: WriteOptions, comments: &[String]) -> WriteOptions {
    if comments.is_empty() {
        options
    } else {
        options.with_comments(comments.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::InputOptions;
    use crate::format::Dialect;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const V10_CROP_PATTERN: &str = concat!(
        "# Basin crop pattern\n",
        "  1950  1950 ACRE  CYR\n",
        "1950 0100501          100.    1\n",
        "     ALFALFA             1.000\n",
    );

    fn convert_args(input: PathBuf, output: PathBuf, to: Dialect) -> ConvertArgs {
        ConvertArgs {
            input_path: input,
            output_path: output,
            to,
            write_crop_area: true,
            write_only_total: false,
            start: None,
            end: None,
            input: InputOptions::default(),
        }
    }

    #[test]
    fn test_convert_to_version_12() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("basin.cds");
        let output = dir.path().join("basin_v12.cds");
        fs::write(&input, V10_CROP_PATTERN).unwrap();

        let stats = run_convert(&convert_args(input, output.clone(), Dialect::V12Plus)).unwrap();
        assert_eq!(stats.locations_read, 1);

        let file = read_crop_pattern_file(&output, &Default::default())
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(file.dialect, Dialect::V12Plus);
        assert_eq!(file.locations[0].total_area(1950), Some(100.0));
        assert!(file.comments.iter().any(|c| c.contains("Basin crop pattern")));
    }

    #[test]
    fn test_convert_rejects_kind_change() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("basin.cds");
        fs::write(&input, V10_CROP_PATTERN).unwrap();
        let args = convert_args(input, dir.path().join("basin.ipy"), Dialect::V12Plus);
        assert!(run_convert(&args).is_err());
    }
}
