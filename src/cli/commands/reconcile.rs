//! Reconcile command: make irrigation acreage add up and write the result

use super::convert::carry_comments;
use super::shared::{CommandStats, component_kind};
use crate::cli::args::ReconcileArgs;
use crate::config::WriteOptions;
use crate::irrigation::{
    IrrigationPracticeTs, read_irrigation_practice_file, write_irrigation_practice_file,
};
use crate::models::ComponentKind;
use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;
use tracing::{debug, info};

pub fn run_reconcile(args: &ReconcileArgs) -> Result<CommandStats> {
    let start = Instant::now();
    if component_kind(&args.input_path)? != ComponentKind::IrrigationPracticeTs {
        anyhow::bail!(
            "{} is not an irrigation practice file",
            args.input_path.display()
        );
    }

    let mut file = read_irrigation_practice_file(&args.input_path, &args.input.read_options())?
        .into_result()
        .with_context(|| format!("Failed to read {}", args.input_path.display()))?;

    let years = reconcile_locations(&mut file.locations, |id| args.is_gw_only(id));
    info!(
        "Reconciled {} location-years in {} locations",
        years,
        file.locations.len()
    );

    let options = WriteOptions::default().with_dialect(args.to.unwrap_or(file.dialect));
    let options = carry_comments(options, &file.comments);
    write_irrigation_practice_file(&args.output_path, &mut file.locations, &options)?;

    let stats = CommandStats {
        files_read: 1,
        locations_read: file.locations.len(),
        files_written: 1,
        years_reconciled: years,
        processing_time: start.elapsed(),
        ..Default::default()
    };
    println!(
        "{} {}",
        "Wrote".bright_green(),
        args.output_path.display().to_string().bright_white().bold()
    );
    stats.print_summary("Reconcile Summary");
    Ok(stats)
}

/// Reconcile every location, returning the number of years touched
pub fn reconcile_locations(
    locations: &mut [IrrigationPracticeTs],
    is_gw_only: impl Fn(&str) -> bool,
) -> usize {
    locations
        .iter_mut()
        .map(|location| {
            let gw_only = is_gw_only(location.id());
            if gw_only {
                debug!("{}: groundwater only", location.id());
            }
            location.reconcile_all(gw_only)
        })
        .sum()
}
