//! Consistency checks over in-memory aggregates.
//!
//! Validation never fails: every check that does not hold becomes a
//! [`Problem`] in the returned list. Sums are compared the way they would
//! appear on disk, after rounding to the compare precision, because the file
//! formats lose precision on write.

use crate::constants::{ACRE_UNITS, DEFAULT_COMPARE_PRECISION};
use crate::crop_pattern::CropPatternTs;
use crate::format::layout::{Dialect, FileKind, fields, layout};
use crate::format::number::formatted_equal;
use crate::irrigation::{IrrigationPracticeTs, PracticeSeries};
use crate::models::{GroundwaterMode, IrrigationMethod, SupplyType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a validation problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Data is written, but not as held in memory
    Warning,
    /// Data is inconsistent or out of range
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One failed check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub location: String,
    /// Year the check applies to, `None` for whole-location checks
    pub year: Option<i32>,
    pub severity: Severity,
    pub message: String,
}

impl Problem {
    fn error(location: &str, year: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            location: location.to_string(),
            year,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(location: &str, year: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(location, year, message)
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(
                f,
                "{} {} {}: {}",
                self.severity, self.location, year, self.message
            ),
            None => write!(f, "{} {}: {}", self.severity, self.location, self.message),
        }
    }
}

/// Consistency checks for one aggregate kind
pub trait Validate {
    /// Check the aggregate as it would be written in `dialect`
    fn validate(&self, dialect: Dialect) -> Vec<Problem>;
}

/// Validate every aggregate of a collection
pub fn validate_all<T: Validate>(items: &[T], dialect: Dialect) -> Vec<Problem> {
    items.iter().flat_map(|item| item.validate(dialect)).collect()
}

fn years((year1, year2): (i32, i32)) -> std::ops::RangeInclusive<i32> {
    year1..=year2
}

impl Validate for CropPatternTs {
    fn validate(&self, dialect: Dialect) -> Vec<Problem> {
        let mut problems = Vec::new();
        let id = self.id();

        let name_width = layout(FileKind::CropPattern, dialect)
            .detail
            .as_ref()
            .and_then(|detail| detail.column(fields::NAME))
            .map(|column| column.width);
        for name in self.crop_names() {
            if name.trim().is_empty() {
                problems.push(Problem::error(id, None, "crop name is empty"));
            } else if let Some(width) = name_width.filter(|w| name.chars().count() > *w) {
                problems.push(Problem::warning(
                    id,
                    None,
                    format!(
                        "crop name \"{}\" is wider than {} characters and will be truncated",
                        name, width
                    ),
                ));
            }
        }

        for year in years(self.period()) {
            let mut sum = 0.0;
            let mut any = false;
            for crop in self.crops() {
                if let Some(area) = crop.value(year) {
                    if area < 0.0 {
                        problems.push(Problem::error(
                            id,
                            Some(year),
                            format!("{} area {} is negative", crop.name(), area),
                        ));
                    }
                    sum += area;
                    any = true;
                }
            }
            if let (Some(total), true) = (self.total_area(year), any) {
                if !formatted_equal(total, sum, DEFAULT_COMPARE_PRECISION) {
                    problems.push(Problem::error(
                        id,
                        Some(year),
                        format!(
                            "total area {:.prec$} does not match sum of crops {:.prec$}",
                            total,
                            sum,
                            prec = DEFAULT_COMPARE_PRECISION
                        ),
                    ));
                }
            }
        }
        problems
    }
}

impl Validate for IrrigationPracticeTs {
    fn validate(&self, _dialect: Dialect) -> Vec<Problem> {
        let mut problems = Vec::new();
        let id = self.id();

        for year in years(self.period()) {
            for kind in PracticeSeries::EFFICIENCIES {
                if let Some(value) = self.get(kind, year) {
                    if !(0.0..=1.0).contains(&value) {
                        problems.push(Problem::error(
                            id,
                            Some(year),
                            format!("{} {} is outside [0, 1]", kind, value),
                        ));
                    }
                }
            }

            if let Some(code) = self.gw_mode_code(year) {
                if GroundwaterMode::from_code(code).is_none() {
                    problems.push(Problem::error(
                        id,
                        Some(year),
                        format!("groundwater mode {} is not 1, 2 or 3", code),
                    ));
                }
            }

            for kind in PracticeSeries::ALL {
                if kind.units() != ACRE_UNITS {
                    continue;
                }
                if let Some(value) = self.get(kind, year) {
                    if value < 0.0 {
                        problems.push(Problem::error(
                            id,
                            Some(year),
                            format!("{} {} is negative", kind, value),
                        ));
                    }
                }
            }

            let parts: Option<Vec<f64>> = PracticeSeries::PARTS
                .iter()
                .map(|kind| self.get(*kind, year))
                .collect();
            if let (Some(total), Some(parts)) = (self.total(year), parts) {
                let sum: f64 = parts.iter().sum();
                if !formatted_equal(total, sum, DEFAULT_COMPARE_PRECISION) {
                    problems.push(Problem::error(
                        id,
                        Some(year),
                        format!(
                            "total acreage {:.prec$} does not match sum of parts {:.prec$}",
                            total,
                            sum,
                            prec = DEFAULT_COMPARE_PRECISION
                        ),
                    ));
                }
            }

            for supply in [SupplyType::Groundwater, SupplyType::Surface] {
                let subtotal = self.get(PracticeSeries::subtotal(supply), year);
                let flood = self.part(supply, IrrigationMethod::Flood, year);
                let sprinkler = self.part(supply, IrrigationMethod::Sprinkler, year);
                if let (Some(subtotal), Some(flood), Some(sprinkler)) = (subtotal, flood, sprinkler)
                {
                    if !formatted_equal(subtotal, flood + sprinkler, DEFAULT_COMPARE_PRECISION) {
                        problems.push(Problem::error(
                            id,
                            Some(year),
                            format!(
                                "{} acreage {:.prec$} does not match flood + sprinkler {:.prec$}",
                                supply,
                                subtotal,
                                flood + sprinkler,
                                prec = DEFAULT_COMPARE_PRECISION
                            ),
                        ));
                    }
                }
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crop_pattern() -> CropPatternTs {
        let mut pattern = CropPatternTs::new("0100501", 1950, 1951, ACRE_UNITS);
        pattern.set_pattern_by_areas(1950, &[("ALFALFA", 60.0), ("CORN", 40.0)]);
        pattern
    }

    fn practice() -> IrrigationPracticeTs {
        let mut practice = IrrigationPracticeTs::new("0100501", 2000, 2000);
        for (kind, value) in [
            (PracticeSeries::ConveyanceEfficiency, 0.6),
            (PracticeSeries::SurfaceFlood, 40.0),
            (PracticeSeries::SurfaceSprinkler, 10.0),
            (PracticeSeries::GroundwaterFlood, 30.0),
            (PracticeSeries::GroundwaterSprinkler, 20.0),
            (PracticeSeries::Total, 100.0),
        ] {
            practice.set(kind, 2000, value);
        }
        practice.refresh_subtotals(2000);
        practice.set_gw_mode(2000, GroundwaterMode::Maximize);
        practice
    }

    #[test]
    fn test_consistent_crop_pattern_has_no_problems() {
        assert!(crop_pattern().validate(Dialect::V12Plus).is_empty());
    }

    #[test]
    fn test_stale_total_is_reported() {
        let mut pattern = crop_pattern();
        pattern.crop_mut("CORN").unwrap().set(1950, 50.0);
        let problems = pattern.validate(Dialect::V12Plus);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].year, Some(1950));
        assert!(problems[0].message.contains("sum of crops"));

        pattern.refresh();
        assert!(pattern.validate(Dialect::V12Plus).is_empty());
    }

    #[test]
    fn test_rounding_differences_are_tolerated() {
        let mut pattern = crop_pattern();
        pattern.crop_mut("CORN").unwrap().set(1950, 40.01);
        assert!(pattern.validate(Dialect::V12Plus).is_empty());
    }

    #[test]
    fn test_negative_crop_area() {
        let mut pattern = CropPatternTs::new("0100501", 1950, 1950, ACRE_UNITS);
        pattern.set_pattern_by_areas(1950, &[("ALFALFA", -5.0)]);
        let problems = pattern.validate(Dialect::V12Plus);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].message.contains("negative"));
    }

    #[test]
    fn test_crop_name_width_depends_on_dialect() {
        let mut pattern = CropPatternTs::new("0100501", 1950, 1950, ACRE_UNITS);
        pattern.set_pattern_by_areas(1950, &[("GRASS_PASTURE_IRRIGATED_2", 5.0)]);
        assert!(pattern.validate(Dialect::V12Plus).is_empty());
        let problems = pattern.validate(Dialect::V10);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].severity, Severity::Warning);
    }

    #[test]
    fn test_consistent_practice_has_no_problems() {
        assert!(practice().validate(Dialect::V12Plus).is_empty());
    }

    #[test]
    fn test_practice_range_checks() {
        let mut practice = practice();
        practice.set(PracticeSeries::FloodEfficiency, 2000, 1.2);
        practice.set_gw_mode_code(2000, Some(5));
        let problems = practice.validate(Dialect::V12Plus);
        assert_eq!(problems.len(), 2);
        assert!(problems.iter().all(|p| p.severity == Severity::Error));
    }

    #[test]
    fn test_practice_sum_checks() {
        let mut practice = practice();
        practice.set(PracticeSeries::Total, 2000, 90.0);
        practice.set(PracticeSeries::Groundwater, 2000, 45.0);
        let messages: Vec<String> = practice
            .validate(Dialect::V12Plus)
            .into_iter()
            .map(|p| p.message)
            .collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("sum of parts"));
        assert!(messages[1].starts_with("groundwater acreage"));
    }

    #[test]
    fn test_negative_acreage() {
        let mut practice = IrrigationPracticeTs::new("0100501", 2000, 2000);
        practice.set(PracticeSeries::Total, 2000, -1.0);
        let problems = practice.validate(Dialect::V12Plus);
        assert_eq!(problems.len(), 1);
        assert_eq!(
            problems[0].to_string(),
            "error 0100501 2000: AcTotal -1 is negative"
        );
    }

    #[test]
    fn test_validate_all_collects_every_location() {
        let mut second = crop_pattern();
        second.crop_mut("CORN").unwrap().set(1950, 80.0);
        let problems = validate_all(&[crop_pattern(), second], Dialect::V12Plus);
        assert_eq!(problems.len(), 1);
    }
}
