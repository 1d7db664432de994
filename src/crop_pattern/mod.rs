//! Crop pattern time series for CU locations.
//!
//! A [`CropPatternTs`] holds one [`AnnualSeries`] of planted acreage per
//! crop and a cached per-year total derived from them. The cache is only
//! brought up to date by [`CropPatternTs::refresh`] and by the pattern
//! setters, so callers must refresh after editing member series directly.
//!
//! The module is organized into:
//! - [`reader`] - crop pattern (`.cds`) file reading
//! - [`writer`] - crop pattern file writing

pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use reader::{read_crop_pattern, read_crop_pattern_file};
pub use writer::{format_crop_patterns, write_crop_pattern_file};

use crate::constants::{ACRE_UNITS, MISSING_VALUE};
use crate::error::{CuError, Result};
use crate::series::{AnnualSeries, is_missing};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Name of the materialized total series
pub const TOTAL_SERIES_NAME: &str = "CropArea-AllCrops";

/// Crop pattern for one CU location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropPatternTs {
    id: String,
    year1: i32,
    year2: i32,
    units: String,
    crops: Vec<AnnualSeries>,
    totals: Vec<f64>,
}

impl CropPatternTs {
    pub fn new(id: impl Into<String>, year1: i32, year2: i32, units: impl Into<String>) -> Self {
        let (year1, year2) = (year1.min(year2), year1.max(year2));
        let units = units.into();
        Self {
            id: id.into(),
            year1,
            year2,
            units: if units.is_empty() {
                ACRE_UNITS.to_string()
            } else {
                units
            },
            crops: Vec::new(),
            totals: vec![MISSING_VALUE; (year2 - year1 + 1) as usize],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn period(&self) -> (i32, i32) {
        (self.year1, self.year2)
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn crops(&self) -> &[AnnualSeries] {
        &self.crops
    }

    pub fn crop_names(&self) -> Vec<&str> {
        self.crops.iter().map(|c| c.name()).collect()
    }

    pub fn crop(&self, name: &str) -> Option<&AnnualSeries> {
        self.crops.iter().find(|c| c.name() == name)
    }

    /// Mutable access to a crop series; the total is not refreshed
    pub fn crop_mut(&mut self, name: &str) -> Option<&mut AnnualSeries> {
        self.crops.iter_mut().find(|c| c.name() == name)
    }

    fn crop_index(&self, name: &str) -> Option<usize> {
        self.crops.iter().position(|c| c.name() == name)
    }

    fn total_index(&self, year: i32) -> Option<usize> {
        if year < self.year1 || year > self.year2 {
            None
        } else {
            Some((year - self.year1) as usize)
        }
    }

    fn set_cached_total(&mut self, year: i32, value: f64) {
        if let Some(i) = self.total_index(year) {
            self.totals[i] = value;
        }
    }

    /// Add a crop series, or reset an existing one when `overwrite` is set.
    ///
    /// An existing crop is returned untouched when `overwrite` is false.
    pub fn add_or_replace_crop(&mut self, name: &str, overwrite: bool) -> &mut AnnualSeries {
        let index = match self.crop_index(name) {
            Some(i) => {
                if overwrite {
                    let series = self.empty_crop(name);
                    self.crops[i] = series;
                }
                i
            }
            None => {
                debug!("{}: adding crop {}", self.id, name);
                let series = self.empty_crop(name);
                self.crops.push(series);
                self.crops.len() - 1
            }
        };
        &mut self.crops[index]
    }

    fn empty_crop(&self, name: &str) -> AnnualSeries {
        AnnualSeries::new(&self.id, name, &self.units, self.year1, self.year2)
    }

    pub fn remove_crop(&mut self, name: &str) -> Option<AnnualSeries> {
        let index = self.crop_index(name)?;
        let removed = self.crops.remove(index);
        if self.crops.is_empty() {
            self.clear_totals();
        } else {
            self.refresh();
        }
        Some(removed)
    }

    pub fn remove_all_crops(&mut self) {
        self.crops.clear();
        self.clear_totals();
    }

    fn clear_totals(&mut self) {
        self.totals.iter_mut().for_each(|t| *t = MISSING_VALUE);
    }

    pub fn crop_area(&self, name: &str, year: i32) -> Option<f64> {
        self.crop(name)?.value(year)
    }

    /// Fraction of the cached total planted in a crop.
    ///
    /// `None` when the area or total is missing or the total is zero.
    pub fn crop_fraction(&self, name: &str, year: i32) -> Option<f64> {
        let area = self.crop_area(name, year)?;
        let total = self.total_area(year)?;
        if total > 0.0 { Some(area / total) } else { None }
    }

    /// Cached total for a year
    pub fn total_area(&self, year: i32) -> Option<f64> {
        let value = self.total_index(year).map(|i| self.totals[i])?;
        if is_missing(value) { None } else { Some(value) }
    }

    /// Set crop areas for a year to zero.
    ///
    /// With `set_all` every crop is zeroed; otherwise only missing values are
    /// filled with zero.
    pub fn set_crop_areas_to_zero(&mut self, year: i32, set_all: bool) {
        for crop in &mut self.crops {
            if set_all || crop.value(year).is_none() {
                crop.set(year, 0.0);
            }
        }
        self.refresh_year(year);
    }

    /// Add acreage to a crop, creating the crop when it does not exist
    pub fn add_to_crop_area(&mut self, name: &str, year: i32, area: f64) {
        self.add_or_replace_crop(name, false).add(year, area);
        self.refresh_year(year);
    }

    /// Assign crop areas for a year.
    ///
    /// The total becomes the sum of the non-missing areas, and zero when no
    /// crops are given.
    pub fn set_pattern_by_areas(&mut self, year: i32, crops: &[(&str, f64)]) {
        let mut total = 0.0;
        for (name, area) in crops {
            self.add_or_replace_crop(name, false).set(year, *area);
            if !is_missing(*area) {
                total += area;
            }
        }
        self.set_cached_total(year, total);
    }

    /// Assign a total and crop fractions for a year; area = total × fraction
    pub fn set_pattern_by_fractions(&mut self, year: i32, total: f64, crops: &[(&str, f64)]) {
        for (name, fraction) in crops {
            let area = if is_missing(total) || is_missing(*fraction) {
                MISSING_VALUE
            } else {
                total * fraction
            };
            self.add_or_replace_crop(name, false).set(year, area);
        }
        self.set_cached_total(year, total);
    }

    fn computed_total(&self, year: i32) -> f64 {
        let mut total = 0.0;
        let mut any = false;
        for value in self.crops.iter().filter_map(|c| c.value(year)) {
            total += value;
            any = true;
        }
        if any { total } else { MISSING_VALUE }
    }

    fn refresh_year(&mut self, year: i32) {
        if self.crops.is_empty() {
            return;
        }
        let total = self.computed_total(year);
        self.set_cached_total(year, total);
    }

    /// Fill missing crop values for a year with zero, leaving the total alone
    pub(crate) fn fill_missing_crops(&mut self, year: i32) {
        for crop in &mut self.crops {
            if crop.value(year).is_none() {
                crop.set(year, 0.0);
            }
        }
    }

    /// Recompute the cached total for every year from the crop series.
    ///
    /// A location without any crop series keeps its totals, which is how
    /// total-only files survive a rewrite.
    pub fn refresh(&mut self) {
        for year in self.year1..=self.year2 {
            self.refresh_year(year);
        }
    }

    /// Rename a crop.
    ///
    /// When `new` already exists the old series is added into it and
    /// dropped, so overlapping years are summed once.
    pub fn translate_crop_name(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let old_index = self.crop_index(old).ok_or_else(|| CuError::UnknownCrop {
            location: self.id.clone(),
            crop: old.to_string(),
        })?;

        match self.crop_index(new) {
            Some(_) => {
                let merged = self.crops.remove(old_index);
                info!("{}: merging crop {} into existing {}", self.id, old, new);
                if let Some(target) = self.crop_mut(new) {
                    for (year, value) in merged.iter() {
                        target.add(year, value);
                    }
                }
                self.refresh();
            }
            None => {
                debug!("{}: renaming crop {} to {}", self.id, old, new);
                self.crops[old_index].rename(new);
            }
        }
        Ok(())
    }

    /// Change the total for a year, prorating crop areas.
    ///
    /// Crop areas are scaled by `new_total / old_total`. When the old total
    /// is missing or not positive the new total is split evenly over the
    /// crops, which fails if there are none.
    pub fn set_total_area(&mut self, year: i32, new_total: f64) -> Result<()> {
        let proration_error = |reason: &str| CuError::Proration {
            location: self.id.clone(),
            year,
            reason: reason.to_string(),
        };
        if is_missing(new_total) {
            return Err(proration_error("new total is missing"));
        }
        if self.total_index(year).is_none() {
            return Err(proration_error("year is outside the period"));
        }

        match self.total_area(year) {
            Some(old_total) if old_total > 0.0 => {
                let factor = new_total / old_total;
                for crop in &mut self.crops {
                    crop.scale(year, factor);
                }
            }
            _ if self.crops.is_empty() => {
                return Err(proration_error(
                    "no crops to prorate and the previous total is not positive",
                ));
            }
            _ => {
                let share = new_total / self.crops.len() as f64;
                debug!(
                    "{} {}: previous total not positive, splitting {} evenly",
                    self.id, year, new_total
                );
                for crop in &mut self.crops {
                    crop.set(year, share);
                }
            }
        }
        self.set_cached_total(year, new_total);
        Ok(())
    }

    /// Cached totals as a series
    pub fn total_series(&self) -> AnnualSeries {
        let mut series =
            AnnualSeries::new(&self.id, TOTAL_SERIES_NAME, &self.units, self.year1, self.year2);
        for (i, value) in self.totals.iter().enumerate() {
            series.set(self.year1 + i as i32, *value);
        }
        series
    }

    /// Total followed by every crop, for flat export
    pub fn to_series_list(&self) -> Vec<AnnualSeries> {
        std::iter::once(self.total_series())
            .chain(self.crops.iter().cloned())
            .collect()
    }
}
