//! Tests for the crop pattern aggregate operations

use super::*;
use crate::error::CuError;
use crate::series::is_missing;
use proptest::prelude::*;

#[test]
fn test_set_pattern_by_areas_sums_total() {
    let pattern = create_test_pattern("0100501", 1950);
    assert_eq!(pattern.total_area(1950), Some(100.0));
    assert_eq!(pattern.crop_area("CORN", 1950), Some(40.0));
    assert_eq!(pattern.crop_fraction("ALFALFA", 1950), Some(0.6));
    assert_eq!(pattern.crop_names(), vec!["ALFALFA", "CORN"]);
}

#[test]
fn test_empty_pattern_total_is_zero_not_missing() {
    let mut pattern = CropPatternTs::new("0100501", 1950, 1955, "ACRE");
    pattern.set_pattern_by_areas(1951, &[]);
    assert_eq!(pattern.total_area(1951), Some(0.0));
    assert_eq!(pattern.total_area(1952), None);
}

#[test]
fn test_set_pattern_by_fractions() {
    let mut pattern = CropPatternTs::new("0100501", 1950, 1955, "ACRE");
    pattern.set_pattern_by_fractions(1952, 200.0, &[("ALFALFA", 0.25), ("CORN", 0.75)]);
    assert_eq!(pattern.total_area(1952), Some(200.0));
    assert_eq!(pattern.crop_area("ALFALFA", 1952), Some(50.0));
    assert_eq!(pattern.crop_area("CORN", 1952), Some(150.0));
}

#[test]
fn test_refresh_after_direct_series_edit() {
    let mut pattern = create_test_pattern("0100501", 1950);
    pattern.crop_mut("CORN").unwrap().set(1950, 10.0);
    // Not refreshed yet
    assert_eq!(pattern.total_area(1950), Some(100.0));
    pattern.refresh();
    assert_eq!(pattern.total_area(1950), Some(70.0));
    // Every crop missing in 1951
    assert_eq!(pattern.total_area(1951), None);
}

#[test]
fn test_refresh_skips_missing_crops() {
    let mut pattern = create_test_pattern("0100501", 1950);
    pattern.crop_mut("CORN").unwrap().set_missing(1950);
    pattern.refresh();
    assert_eq!(pattern.total_area(1950), Some(60.0));
}

#[test]
fn test_add_or_replace_crop() {
    let mut pattern = create_test_pattern("0100501", 1950);
    pattern.add_or_replace_crop("CORN", false);
    assert_eq!(pattern.crop_area("CORN", 1950), Some(40.0));
    pattern.add_or_replace_crop("CORN", true);
    assert_eq!(pattern.crop_area("CORN", 1950), None);
    let added = pattern.add_or_replace_crop("BEANS", false);
    assert_eq!(added.period(), (1950, 1955));
    assert_eq!(added.location(), "0100501");
    assert_eq!(pattern.crops().len(), 3);
}

#[test]
fn test_remove_crop_refreshes_total() {
    let mut pattern = create_test_pattern("0100501", 1950);
    let removed = pattern.remove_crop("CORN").unwrap();
    assert_eq!(removed.name(), "CORN");
    assert_eq!(pattern.total_area(1950), Some(60.0));
    assert!(pattern.remove_crop("CORN").is_none());
    pattern.remove_all_crops();
    assert!(pattern.crops().is_empty());
    assert_eq!(pattern.total_area(1950), None);
}

#[test]
fn test_translate_crop_name_renames() {
    let mut pattern = create_test_pattern("0100501", 1950);
    pattern.translate_crop_name("CORN", "CORN_GRAIN").unwrap();
    assert_eq!(pattern.crop_names(), vec!["ALFALFA", "CORN_GRAIN"]);
    assert_eq!(pattern.crop_area("CORN_GRAIN", 1950), Some(40.0));
    assert_eq!(pattern.total_area(1950), Some(100.0));
}

#[test]
fn test_translate_crop_name_merges_without_double_counting() {
    let mut pattern = create_test_pattern("0100501", 1950);
    pattern.set_pattern_by_areas(1951, &[("CORN", 5.0)]);
    pattern.translate_crop_name("CORN", "ALFALFA").unwrap();
    assert_eq!(pattern.crop_names(), vec!["ALFALFA"]);
    assert_eq!(pattern.crop_area("ALFALFA", 1950), Some(100.0));
    assert_eq!(pattern.crop_area("ALFALFA", 1951), Some(5.0));
    assert_eq!(pattern.total_area(1950), Some(100.0));
    assert_eq!(pattern.total_area(1951), Some(5.0));
}

#[test]
fn test_translate_unknown_crop_is_error() {
    let mut pattern = create_test_pattern("0100501", 1950);
    let err = pattern.translate_crop_name("WHEAT", "GRAIN").unwrap_err();
    assert!(matches!(err, CuError::UnknownCrop { ref crop, .. } if crop == "WHEAT"));
}

#[test]
fn test_set_total_area_prorates() {
    let mut pattern = create_test_pattern("0100501", 1950);
    pattern.set_total_area(1950, 50.0).unwrap();
    assert_eq!(pattern.total_area(1950), Some(50.0));
    assert_eq!(pattern.crop_area("ALFALFA", 1950), Some(30.0));
    assert_eq!(pattern.crop_area("CORN", 1950), Some(20.0));
}

#[test]
fn test_set_total_area_splits_evenly_from_zero() {
    let mut pattern = CropPatternTs::new("0100501", 1950, 1955, "ACRE");
    pattern.set_pattern_by_areas(1950, &[("ALFALFA", 0.0), ("CORN", 0.0)]);
    pattern.set_total_area(1950, 10.0).unwrap();
    assert_eq!(pattern.crop_area("ALFALFA", 1950), Some(5.0));
    assert_eq!(pattern.crop_area("CORN", 1950), Some(5.0));
}

#[test]
fn test_set_total_area_without_crops_fails() {
    let mut pattern = CropPatternTs::new("0100501", 1950, 1955, "ACRE");
    let err = pattern.set_total_area(1950, 10.0).unwrap_err();
    assert!(matches!(err, CuError::Proration { year: 1950, .. }));
}

#[test]
fn test_set_crop_areas_to_zero() {
    let mut pattern = create_test_pattern("0100501", 1950);
    pattern.crop_mut("CORN").unwrap().set_missing(1950);
    pattern.set_crop_areas_to_zero(1950, false);
    assert_eq!(pattern.crop_area("ALFALFA", 1950), Some(60.0));
    assert_eq!(pattern.crop_area("CORN", 1950), Some(0.0));
    pattern.set_crop_areas_to_zero(1950, true);
    assert_eq!(pattern.total_area(1950), Some(0.0));
}

#[test]
fn test_add_to_crop_area() {
    let mut pattern = create_test_pattern("0100501", 1950);
    pattern.add_to_crop_area("CORN", 1950, 5.0);
    pattern.add_to_crop_area("BEANS", 1950, 2.5);
    assert_eq!(pattern.crop_area("CORN", 1950), Some(45.0));
    assert_eq!(pattern.total_area(1950), Some(107.5));
}

#[test]
fn test_to_series_list_starts_with_total() {
    let pattern = create_test_pattern("0100501", 1950);
    let list = pattern.to_series_list();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].name(), crate::crop_pattern::TOTAL_SERIES_NAME);
    assert_eq!(list[0].value(1950), Some(100.0));
    assert!(is_missing(list[0].get(1951)));
    assert_eq!(list[2].name(), "CORN");
}

proptest! {
    #[test]
    fn prop_refresh_total_is_sum_of_present_crops(
        areas in proptest::collection::vec(proptest::option::of(0.0f64..10_000.0), 1..8),
    ) {
        let mut pattern = CropPatternTs::new("X", 2000, 2000, "ACRE");
        for (i, area) in areas.iter().enumerate() {
            let series = pattern.add_or_replace_crop(&format!("CROP{}", i), false);
            if let Some(area) = area {
                series.set(2000, *area);
            }
        }
        pattern.refresh();
        let present: Vec<f64> = areas.iter().flatten().copied().collect();
        if present.is_empty() {
            prop_assert_eq!(pattern.total_area(2000), None);
        } else {
            let expected: f64 = present.iter().sum();
            prop_assert_eq!(pattern.total_area(2000), Some(expected));
        }
    }
}
