//! Integration tests for crop pattern files on disk
//!
//! Files are written to a temporary directory, read back through the public
//! API and rewritten in other layouts.

use cu_acreage::crop_pattern::{read_crop_pattern_file, write_crop_pattern_file};
use cu_acreage::{CuError, Dialect, ReadDataFrom, ReadOptions, Validate, WriteOptions};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn v10_primary(year: i32, id: &str, total: f64, count: usize) -> String {
    format!("{:<4} {:<12}{:>10.0}{:>5}", year, id, total, count)
}

fn v10_detail(name: &str, fraction: f64, area: f64) -> String {
    format!("     {:<20}{:>8.3}{:>10.0}", name, fraction, area)
}

/// Two locations over two years in the version 10 layout
fn basin_lines() -> Vec<String> {
    vec![
        "# Test basin".to_string(),
        "  1950  1951 ACRE  CYR".to_string(),
        v10_primary(1950, "0100501", 100.0, 2),
        v10_detail("ALFALFA", 0.6, 60.0),
        v10_detail("CORN", 0.4, 40.0),
        v10_primary(1950, "0100502", 50.0, 1),
        v10_detail("ALFALFA", 1.0, 50.0),
        v10_primary(1951, "0100501", 120.0, 2),
        v10_detail("ALFALFA", 0.5, 60.0),
        v10_detail("CORN", 0.5, 60.0),
        v10_primary(1951, "0100502", 50.0, 1),
        v10_detail("GRASS", 1.0, 50.0),
    ]
}

fn write_text(path: &Path, lines: &[String]) {
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(path, text).unwrap();
}

#[test]
fn test_read_version_10_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("basin.cds");
    write_text(&path, &basin_lines());

    let outcome = read_crop_pattern_file(&path, &ReadOptions::default()).unwrap();
    assert!(outcome.is_complete());
    let file = outcome.data;
    assert_eq!(file.dialect, Dialect::V10);
    assert_eq!(file.period, (1950, 1951));
    assert_eq!(file.locations.len(), 2);

    let first = &file.locations[0];
    assert_eq!(first.id(), "0100501");
    assert_eq!(first.total_area(1951), Some(120.0));
    assert_eq!(first.crop_area("CORN", 1951), Some(60.0));

    let second = &file.locations[1];
    assert_eq!(second.crop_names(), vec!["ALFALFA", "GRASS"]);
    assert_eq!(second.total_area(1951), Some(50.0));
    assert!(first.validate(file.dialect).is_empty());
}

#[test]
fn test_rewrite_in_every_layout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("basin.cds");
    write_text(&input, &basin_lines());
    let original = read_crop_pattern_file(&input, &ReadOptions::default())
        .unwrap()
        .into_result()
        .unwrap();

    for dialect in [Dialect::V12Plus, Dialect::V10, Dialect::NoPeriod] {
        let output = dir.path().join("rewritten.cds");
        let mut locations = original.locations.clone();
        let options = WriteOptions::default().with_dialect(dialect);
        write_crop_pattern_file(&output, &mut locations, &options).unwrap();

        let reread = read_crop_pattern_file(&output, &ReadOptions::default())
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(reread.dialect, dialect);
        assert_eq!(reread.period, (1950, 1951));
        assert_eq!(reread.locations.len(), 2);
        for (before, after) in original.locations.iter().zip(&reread.locations) {
            assert_eq!(before.id(), after.id());
            for year in 1950..=1951 {
                assert_eq!(before.total_area(year), after.total_area(year));
                for name in before.crop_names() {
                    assert_eq!(
                        before.crop_area(name, year),
                        after.crop_area(name, year),
                        "{} {} {} in {}",
                        before.id(),
                        name,
                        year,
                        dialect
                    );
                }
            }
        }
    }
}

#[test]
fn test_output_period_limits_written_years() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("basin.cds");
    write_text(&input, &basin_lines());
    let mut file = read_crop_pattern_file(&input, &ReadOptions::default())
        .unwrap()
        .data;

    let output = dir.path().join("1951.cds");
    let options = WriteOptions::default().with_period(1951, 1951);
    write_crop_pattern_file(&output, &mut file.locations, &options).unwrap();

    let reread = read_crop_pattern_file(&output, &ReadOptions::default())
        .unwrap()
        .data;
    assert_eq!(reread.period, (1951, 1951));
    assert_eq!(reread.locations[0].total_area(1951), Some(120.0));
}

#[test]
fn test_fraction_mode_rebuilds_areas_from_totals() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fractions.cds");
    write_text(
        &path,
        &[
            "  1950  1950 ACRE  CYR".to_string(),
            v10_primary(1950, "0100501", 200.0, 1),
            v10_detail("ALFALFA", 0.5, 999.0),
        ],
    );
    let options = ReadOptions::default().with_read_data_from(ReadDataFrom::TotalAndCropFraction);
    let file = read_crop_pattern_file(&path, &options).unwrap().data;
    assert_eq!(file.locations[0].crop_area("ALFALFA", 1950), Some(100.0));
}

#[test]
fn test_bad_record_keeps_locations_read_before_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("truncated.cds");
    let mut lines = basin_lines();
    lines.truncate(7);
    lines.push("YEAR 0100501          120.    2".to_string());
    write_text(&path, &lines);

    let outcome = read_crop_pattern_file(&path, &ReadOptions::default()).unwrap();
    assert!(!outcome.is_complete());
    assert_eq!(outcome.data.locations.len(), 2);
    let error = outcome.error.unwrap();
    assert!(matches!(error, CuError::Parse { .. }));
    assert_eq!(error.line_number(), Some(8));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = read_crop_pattern_file(&dir.path().join("absent.cds"), &ReadOptions::default());
    assert!(matches!(result, Err(CuError::Io { .. })));
}
