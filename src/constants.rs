//! Application constants for crop pattern and irrigation practice files
//!
//! This module contains the missing-value conventions, numeric tolerances,
//! detection bounds and file markers used throughout the crate.

// =============================================================================
// Missing Values
// =============================================================================

/// Sentinel written for missing values
pub const MISSING_VALUE: f64 = -999.0;

/// Values read back from text are missing when inside this band
pub const MISSING_BAND_LOW: f64 = -1000.0;
pub const MISSING_BAND_HIGH: f64 = -998.0;

// =============================================================================
// Numeric Tolerances
// =============================================================================

/// Differences smaller than this are below the usual one-decimal output precision
pub const FORMAT_PRECISION_TOLERANCE: f64 = 0.1;

/// Targets closer than this to zero are treated as exactly zero
pub const ZERO_TOLERANCE: f64 = 0.001;

/// Default decimal places used when comparing formatted sums
pub const DEFAULT_COMPARE_PRECISION: usize = 1;

// =============================================================================
// Format Detection
// =============================================================================

/// Year tokens at or above this are not accepted when inferring a period
pub const MAX_REASONABLE_YEAR: i32 = 2050;

/// Year tokens below this are not accepted when inferring a period
pub const MIN_REASONABLE_YEAR: i32 = 1800;

/// Period header years must fall in this range (four-digit year columns)
pub const MIN_HEADER_YEAR: i32 = 1;
pub const MAX_HEADER_YEAR: i32 = 9999;

/// Bytes sampled at the start and end of a file with no period header
pub const PERIOD_SCAN_WINDOW_BYTES: u64 = 8192;

/// Crop pattern primary lines at least this long are version 12 or later
pub const CDS_V12_MIN_PRIMARY_LENGTH: usize = 40;

/// Irrigation practice lines with at least this many tokens are version 12 or later
pub const IPY_V12_MIN_TOKENS: usize = 12;

// =============================================================================
// File Markers
// =============================================================================

/// First character of a comment line
pub const COMMENT_CHAR: char = '#';

/// Comment marking the end of the generated documentation header
pub const END_HEADER_MARKER: &str = "#EndHeader";

/// Prefix of generated documentation lines
pub const GENERATED_COMMENT_PREFIX: &str = "#>";

/// Year type written in period headers
pub const YEAR_TYPE_CALENDAR: &str = "CYR";

/// Units of all acreage series
pub const ACRE_UNITS: &str = "ACRE";

/// Units of efficiency series
pub const FRACTION_UNITS: &str = "FRACTION";

/// Units of the maximum pumping series
pub const PUMPING_UNITS: &str = "ACFT";
