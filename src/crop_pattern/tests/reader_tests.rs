//! Tests for reading crop pattern files

use super::*;
use crate::config::ReadDataFrom;
use crate::error::CuError;
use crate::format::Dialect;
use std::io::Write;
use tempfile::NamedTempFile;

fn v12_file() -> String {
    file_text(&[
        "# Crop pattern test file".to_string(),
        "#EndHeader".to_string(),
        "      1/1950  -     12/1951 ACRE  CYR".to_string(),
        v12_primary(1950, "0100501", 100.0, 2),
        v12_detail("ALFALFA", 0.6, Some(60.0)),
        v12_detail("CORN", 0.4, Some(40.0)),
        v12_primary(1950, "0100502", 10.0, 1),
        v12_detail("GRASS_PASTURE", 1.0, Some(10.0)),
        v12_primary(1951, "0100501", 80.0, 1),
        v12_detail("ALFALFA", 1.0, Some(80.0)),
        v12_primary(1951, "0100502", 12.0, 1),
        v12_detail("GRASS_PASTURE", 1.0, Some(12.0)),
    ])
}

#[test]
fn test_read_v12_crop_areas() {
    let outcome = read_text(&v12_file(), &ReadOptions::default());
    assert!(outcome.is_complete());
    let file = outcome.data;
    assert_eq!(file.dialect, Dialect::V12Plus);
    assert_eq!(file.period, (1950, 1951));
    assert_eq!(file.units, "ACRE");
    assert_eq!(file.locations.len(), 2);
    assert!(file.comments.iter().any(|c| c.contains("Crop pattern test file")));

    let first = &file.locations[0];
    assert_eq!(first.id(), "0100501");
    assert_eq!(first.total_area(1950), Some(100.0));
    assert_eq!(first.crop_area("CORN", 1950), Some(40.0));
    assert_eq!(first.total_area(1951), Some(80.0));
}

#[test]
fn test_crop_missing_from_a_year_is_zero() {
    let file = read_text(&v12_file(), &ReadOptions::default()).data;
    // CORN has no record in 1951, so the year record says it was not planted
    assert_eq!(file.locations[0].crop_area("CORN", 1951), Some(0.0));
}

#[test]
fn test_crop_first_seen_late_is_zero_filled() {
    let text = file_text(&[
        "  1950  1951 ACRE  CYR".to_string(),
        v12_primary(1950, "0100501", 50.0, 1),
        v12_detail("ALFALFA", 1.0, Some(50.0)),
        v12_primary(1951, "0100501", 70.0, 2),
        v12_detail("ALFALFA", 0.5, Some(35.0)),
        v12_detail("BEANS", 0.5, Some(35.0)),
    ]);
    let file = read_text(&text, &ReadOptions::default()).data;
    let location = &file.locations[0];
    assert_eq!(location.crop_area("BEANS", 1950), Some(0.0));
    assert_eq!(location.crop_area("BEANS", 1951), Some(35.0));
    assert_eq!(location.total_area(1950), Some(50.0));
}

#[test]
fn test_missing_area_falls_back_to_fraction() {
    let text = file_text(&[
        "  1950  1950 ACRE  CYR".to_string(),
        v12_primary(1950, "0100501", 200.0, 2),
        v12_detail("ALFALFA", 0.25, None),
        v12_detail("CORN", 0.75, Some(150.0)),
    ]);
    let file = read_text(&text, &ReadOptions::default()).data;
    let location = &file.locations[0];
    assert_eq!(location.crop_area("ALFALFA", 1950), Some(50.0));
    assert_eq!(location.total_area(1950), Some(200.0));
}

#[test]
fn test_total_and_fraction_mode_ignores_area_column() {
    let text = file_text(&[
        "  1950  1950 ACRE  CYR".to_string(),
        v12_primary(1950, "0100501", 200.0, 1),
        v12_detail("ALFALFA", 0.5, Some(999.0)),
    ]);
    let options = ReadOptions::default().with_read_data_from(ReadDataFrom::TotalAndCropFraction);
    let file = read_text(&text, &options).data;
    let location = &file.locations[0];
    assert_eq!(location.crop_area("ALFALFA", 1950), Some(100.0));
    assert_eq!(location.total_area(1950), Some(200.0));
}

#[test]
fn test_read_v10_file() {
    let text = file_text(&[
        "  1950  1950 ACRE  CYR".to_string(),
        v10_primary(1950, "0100501", 100.0, 2),
        v10_detail("ALFALFA", 0.6, Some(60.0)),
        v10_detail("CORN", 0.4, Some(40.0)),
    ]);
    let file = read_text(&text, &ReadOptions::default()).data;
    assert_eq!(file.dialect, Dialect::V10);
    assert_eq!(file.locations[0].crop_area("ALFALFA", 1950), Some(60.0));
}

#[test]
fn test_legacy_file_infers_period_and_uses_fractions() {
    let text = file_text(&[
        "# no period header".to_string(),
        v10_primary(1960, "0100501", 100.0, 1),
        v10_detail("ALFALFA", 1.0, None),
        v10_primary(1961, "0100501", 80.0, 2),
        v10_detail("ALFALFA", 0.5, None),
        v10_detail("CORN", 0.5, None),
    ]);
    let file = read_text(&text, &ReadOptions::default()).data;
    assert_eq!(file.dialect, Dialect::NoPeriod);
    assert_eq!(file.period, (1960, 1961));
    let location = &file.locations[0];
    assert_eq!(location.crop_area("ALFALFA", 1961), Some(40.0));
    assert_eq!(location.crop_area("CORN", 1960), Some(0.0));
}

#[test]
fn test_auto_adjust_rewrites_crop_names() {
    let text = file_text(&[
        "  1950  1950 ACRE  CYR".to_string(),
        v12_primary(1950, "0100501", 10.0, 1),
        v12_detail("GRASS.PASTURE", 1.0, Some(10.0)),
    ]);
    let options = ReadOptions::default().with_auto_adjust();
    let file = read_text(&text, &options).data;
    assert_eq!(file.locations[0].crop_names(), vec!["GRASS-PASTURE"]);
}

#[test]
fn test_location_first_seen_after_first_year_is_added() {
    let text = file_text(&[
        "  1950  1951 ACRE  CYR".to_string(),
        v12_primary(1950, "0100501", 10.0, 1),
        v12_detail("ALFALFA", 1.0, Some(10.0)),
        v12_primary(1951, "0100501", 10.0, 1),
        v12_detail("ALFALFA", 1.0, Some(10.0)),
        v12_primary(1951, "0100999", 5.0, 1),
        v12_detail("CORN", 1.0, Some(5.0)),
    ]);
    let file = read_text(&text, &ReadOptions::default()).data;
    assert_eq!(file.locations.len(), 2);
    assert_eq!(file.locations[1].id(), "0100999");
    assert_eq!(file.locations[1].total_area(1950), None);
    assert_eq!(file.locations[1].total_area(1951), Some(5.0));
}

#[test]
fn test_total_only_records_keep_total() {
    let text = file_text(&[
        "  1950  1950 ACRE  CYR".to_string(),
        v12_primary(1950, "0100501", 123.4, 0),
    ]);
    let file = read_text(&text, &ReadOptions::default()).data;
    assert_eq!(file.locations[0].total_area(1950), Some(123.4));
    assert!(file.locations[0].crops().is_empty());
}

#[test]
fn test_parse_error_keeps_flushed_locations() {
    let text = file_text(&[
        "  1950  1951 ACRE  CYR".to_string(),
        v12_primary(1950, "0100501", 10.0, 1),
        v12_detail("ALFALFA", 1.0, Some(10.0)),
        v12_primary(1951, "0100501", 10.0, 1),
        format!("     {:<30}{:>10}{:>10}", "ALFALFA", "one", "ten"),
    ]);
    let outcome = read_text(&text, &ReadOptions::default());
    assert!(!outcome.is_complete());
    assert_eq!(outcome.error.as_ref().and_then(|e| e.line_number()), Some(5));
    assert_eq!(outcome.data.locations[0].total_area(1950), Some(10.0));
    assert_eq!(outcome.data.locations[0].total_area(1951), None);
}

#[test]
fn test_forced_v12_on_legacy_file_is_format_error() {
    let text = file_text(&[v10_primary(1960, "0100501", 100.0, 0)]);
    let err = read_crop_pattern(
        Cursor::new(text.into_bytes()),
        Path::new("legacy.cds"),
        &ReadOptions::default().with_version(Dialect::V12Plus),
    )
    .unwrap_err();
    assert!(matches!(err, CuError::Format { .. }));
}

#[test]
fn test_read_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", v12_file()).unwrap();
    let outcome =
        crate::crop_pattern::read_crop_pattern_file(file.path(), &ReadOptions::default()).unwrap();
    assert!(outcome.is_complete());
    assert_eq!(outcome.data.path, file.path());
    assert_eq!(outcome.data.locations.len(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = crate::crop_pattern::read_crop_pattern_file(
        Path::new("/nonexistent/file.cds"),
        &ReadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CuError::Io { .. }));
}
