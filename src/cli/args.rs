//! Command-line argument definitions for cu-acreage
//!
//! This module defines the CLI interface using the clap derive API and maps
//! the flags onto the library's read and write options.

use crate::config::{ReadDataFrom, ReadOptions, WriteOptions};
use crate::error::{CuError, Result};
use crate::format::Dialect;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the crop pattern and irrigation practice tool
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cu-acreage",
    version,
    about = "Inspect, check, convert and reconcile CU crop pattern and irrigation practice files",
    long_about = "Reads the fixed-column crop pattern (.cds) and irrigation practice (.ipy) \
                  time series files of consumptive-use models in any of their historical \
                  layouts, validates them, rewrites them in another layout and reconciles \
                  irrigation acreage so totals match their parts."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show warnings and errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and errors"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the detected layout, period and header form of files
    Detect(DetectArgs),
    /// Read files, run the consistency checks and print any problems
    Check(CheckArgs),
    /// Rewrite a file in another layout
    Convert(ConvertArgs),
    /// Reconcile irrigation practice acreage and write the result
    Reconcile(ReconcileArgs),
}

/// Options shared by every command that reads files
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct InputOptions {
    /// Read the input as this version instead of detecting it
    #[arg(
        long = "version-in",
        value_name = "VERSION",
        help = "Force the input layout (legacy, 10 or 12)"
    )]
    pub input_version: Option<Dialect>,

    /// Where crop acreage is read from
    #[arg(
        long = "read-data-from",
        value_name = "SOURCE",
        help = "CropArea or TotalAndCropFraction"
    )]
    pub read_data_from: Option<ReadDataFrom>,

    /// Replace '.' with '-' in crop names
    #[arg(long = "auto-adjust", help = "Replace '.' with '-' in crop names")]
    pub auto_adjust: bool,
}

impl InputOptions {
    pub fn read_options(&self) -> ReadOptions {
        let mut options = ReadOptions::default();
        if let Some(version) = self.input_version {
            options = options.with_version(version);
        }
        if let Some(read_data_from) = self.read_data_from {
            options = options.with_read_data_from(read_data_from);
        }
        if self.auto_adjust {
            options = options.with_auto_adjust();
        }
        options
    }
}

/// Arguments for the detect command
#[derive(Debug, Clone, Parser)]
pub struct DetectArgs {
    /// Files to inspect
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Files or glob patterns, e.g. "data/*.cds"
    #[arg(value_name = "PATTERNS", required_unless_present = "dir")]
    pub patterns: Vec<String>,

    /// Check every .cds and .ipy file under a directory
    #[arg(long = "dir", value_name = "DIR", help = "Search a directory for component files")]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub input: InputOptions,
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Input file (.cds or .ipy)
    #[arg(value_name = "IN")]
    pub input_path: PathBuf,

    /// Output file
    #[arg(value_name = "OUT")]
    pub output_path: PathBuf,

    /// Output layout
    #[arg(
        long = "to",
        value_name = "VERSION",
        default_value = "12",
        help = "Output layout (legacy, 10 or 12)"
    )]
    pub to: Dialect,

    /// Write per-crop acreage columns
    #[arg(
        long = "write-crop-area",
        value_name = "BOOL",
        default_value_t = true,
        action = ArgAction::Set,
        help = "Write crop acreage columns where the layout has them"
    )]
    pub write_crop_area: bool,

    /// Write only the location total, no crop records
    #[arg(long = "write-only-total", help = "Omit crop records")]
    pub write_only_total: bool,

    /// First year to write
    #[arg(long = "start", value_name = "YEAR", requires = "end")]
    pub start: Option<i32>,

    /// Last year to write
    #[arg(long = "end", value_name = "YEAR", requires = "start")]
    pub end: Option<i32>,

    #[command(flatten)]
    pub input: InputOptions,
}

impl ConvertArgs {
    /// Validate the convert arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.input_path == self.output_path {
            return Err(CuError::configuration(format!(
                "Output would overwrite the input file: {}",
                self.output_path.display()
            )));
        }
        Ok(())
    }

    pub fn write_options(&self) -> WriteOptions {
        let mut options = WriteOptions::default()
            .with_dialect(self.to)
            .with_crop_area(self.write_crop_area);
        if self.write_only_total {
            options = options.with_only_total();
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            options = options.with_period(start, end);
        }
        options
    }
}

/// Arguments for the reconcile command
#[derive(Debug, Clone, Parser)]
pub struct ReconcileArgs {
    /// Irrigation practice file to reconcile
    #[arg(value_name = "IN")]
    pub input_path: PathBuf,

    /// Output file
    #[arg(value_name = "OUT")]
    pub output_path: PathBuf,

    /// Locations served by groundwater only (comma-separated)
    #[arg(
        long = "gw-only",
        value_name = "IDS",
        help = "Comma-separated list of groundwater-only location IDs"
    )]
    pub gw_only: Option<IdList>,

    /// Output layout, defaults to the input layout
    #[arg(long = "to", value_name = "VERSION", help = "Output layout (legacy, 10 or 12)")]
    pub to: Option<Dialect>,

    #[command(flatten)]
    pub input: InputOptions,
}

impl ReconcileArgs {
    pub fn is_gw_only(&self, id: &str) -> bool {
        self.gw_only
            .as_ref()
            .is_some_and(|list| list.ids.iter().any(|i| i == id))
    }
}

/// Wrapper for parsing comma-separated location ID lists
#[derive(Debug, Clone, PartialEq)]
pub struct IdList {
    pub ids: Vec<String>,
}

impl FromStr for IdList {
    type Err = CuError;

    fn from_str(s: &str) -> Result<Self> {
        let ids: Vec<String> = s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if ids.is_empty() {
            return Err(CuError::configuration("Location ID list cannot be empty"));
        }
        Ok(IdList { ids })
    }
}

impl Args {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
