//! Tests for crop pattern aggregates, reading and writing
//!
//! Fixture lines are built with the same column widths as the file layouts
//! so that each test states its records in terms of values, not spacing.

pub mod aggregate_tests;
pub mod reader_tests;

use crate::config::ReadOptions;
use crate::crop_pattern::{CropPatternTs, read_crop_pattern};
use crate::error::ReadOutcome;
use crate::format::LocationFile;
use std::io::Cursor;
use std::path::Path;

/// Version 12+ year record
pub fn v12_primary(year: i32, id: &str, total: f64, count: usize) -> String {
    format!("{:<4} {:<12}{:>18.1}{:>10}", year, id, total, count)
}

/// Version 12+ crop record, acreage column optional
pub fn v12_detail(name: &str, fraction: f64, area: Option<f64>) -> String {
    match area {
        Some(area) => format!("     {:<30}{:>10.3}{:>10.1}", name, fraction, area),
        None => format!("     {:<30}{:>10.3}", name, fraction),
    }
}

/// Version 10 (and legacy) year record
pub fn v10_primary(year: i32, id: &str, total: f64, count: usize) -> String {
    format!("{:<4} {:<12}{:>10.0}{:>5}", year, id, total, count)
}

/// Version 10 crop record, acreage column optional
pub fn v10_detail(name: &str, fraction: f64, area: Option<f64>) -> String {
    match area {
        Some(area) => format!("     {:<20}{:>8.3}{:>10.0}", name, fraction, area),
        None => format!("     {:<20}{:>8.3}", name, fraction),
    }
}

/// Join lines into file text
pub fn file_text(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Read crop pattern text, failing the test on format errors
pub fn read_text(text: &str, options: &ReadOptions) -> ReadOutcome<LocationFile<CropPatternTs>> {
    read_crop_pattern(
        Cursor::new(text.as_bytes().to_vec()),
        Path::new("test.cds"),
        options,
    )
    .unwrap()
}

/// Two-crop location with areas set for one year
pub fn create_test_pattern(id: &str, year: i32) -> CropPatternTs {
    let mut pattern = CropPatternTs::new(id, 1950, 1955, "ACRE");
    pattern.set_pattern_by_areas(year, &[("ALFALFA", 60.0), ("CORN", 40.0)]);
    pattern
}
