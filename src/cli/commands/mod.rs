//! Command implementations for the cu-acreage CLI
//!
//! Each command is implemented in its own module; this module dispatches
//! on the parsed arguments.

pub mod check;
pub mod convert;
pub mod detect;
pub mod reconcile;
pub mod shared;

pub use shared::CommandStats;

use crate::cli::args::{Args, Commands};
use anyhow::Result;

/// Main command runner
///
/// Dispatches to the handler for the selected subcommand:
/// - `detect`: report the layout of each file
/// - `check`: read and validate files
/// - `convert`: rewrite a file in another layout
/// - `reconcile`: make irrigation acreage add up and write the result
pub fn run(args: &Args) -> Result<CommandStats> {
    let show_progress = args.show_progress();
    match &args.command {
        Some(Commands::Detect(detect_args)) => detect::run_detect(detect_args),
        Some(Commands::Check(check_args)) => check::run_check(check_args, show_progress),
        Some(Commands::Convert(convert_args)) => convert::run_convert(convert_args),
        Some(Commands::Reconcile(reconcile_args)) => reconcile::run_reconcile(reconcile_args),
        None => anyhow::bail!("No command given, run with --help to list commands"),
    }
}
