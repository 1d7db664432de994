//! Year-indexed numeric series with an explicit period.
//!
//! Every year in `[year1, year2]` owns a slot. Missing slots hold
//! [`MISSING_VALUE`] rather than a null, because values are read back from
//! formatted text and compared against a tolerance band.

use crate::constants::{MISSING_BAND_HIGH, MISSING_BAND_LOW, MISSING_VALUE};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Check whether a value is the missing sentinel (or NaN)
pub fn is_missing(value: f64) -> bool {
    value.is_nan() || (MISSING_BAND_LOW..=MISSING_BAND_HIGH).contains(&value)
}

/// Annual series for one variable of one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSeries {
    location: String,
    name: String,
    units: String,
    year1: i32,
    year2: i32,
    values: Vec<f64>,
}

impl AnnualSeries {
    /// Create a series with every year of `[year1, year2]` missing.
    ///
    /// A reversed period is normalized so that `year1 <= year2`.
    pub fn new(
        location: impl Into<String>,
        name: impl Into<String>,
        units: impl Into<String>,
        year1: i32,
        year2: i32,
    ) -> Self {
        let (year1, year2) = if year1 <= year2 {
            (year1, year2)
        } else {
            (year2, year1)
        };
        let len = (i64::from(year2) - i64::from(year1) + 1) as usize;
        Self {
            location: location.into(),
            name: name.into(),
            units: units.into(),
            year1,
            year2,
            values: vec![MISSING_VALUE; len],
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn year1(&self) -> i32 {
        self.year1
    }

    pub fn year2(&self) -> i32 {
        self.year2
    }

    pub fn period(&self) -> (i32, i32) {
        (self.year1, self.year2)
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    fn index(&self, year: i32) -> Option<usize> {
        if year < self.year1 || year > self.year2 {
            None
        } else {
            Some((year - self.year1) as usize)
        }
    }

    /// Value for a year, [`MISSING_VALUE`] when missing or outside the period
    pub fn get(&self, year: i32) -> f64 {
        self.index(year)
            .map(|i| self.values[i])
            .unwrap_or(MISSING_VALUE)
    }

    /// Value for a year, `None` when missing or outside the period
    pub fn value(&self, year: i32) -> Option<f64> {
        let value = self.get(year);
        if is_missing(value) { None } else { Some(value) }
    }

    /// Set the value for a year.
    ///
    /// Years outside the period are ignored; the period never grows on write.
    pub fn set(&mut self, year: i32, value: f64) {
        match self.index(year) {
            Some(i) => self.values[i] = value,
            None => trace!(
                "Ignoring {} {} value for {} outside period {}-{}",
                self.location, self.name, year, self.year1, self.year2
            ),
        }
    }

    /// Mark a year as missing
    pub fn set_missing(&mut self, year: i32) {
        self.set(year, MISSING_VALUE);
    }

    /// Add to the value for a year, treating a missing slot as zero.
    ///
    /// Adding a missing value leaves the slot unchanged.
    pub fn add(&mut self, year: i32, value: f64) {
        if is_missing(value) {
            return;
        }
        let current = self.get(year);
        if is_missing(current) {
            self.set(year, value);
        } else {
            self.set(year, current + value);
        }
    }

    /// Multiply every non-missing value in a year by a factor
    pub fn scale(&mut self, year: i32, factor: f64) {
        if let Some(value) = self.value(year) {
            self.set(year, value * factor);
        }
    }

    /// Iterate over `(year, value)` pairs including missing slots
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (self.year1 + i as i32, *v))
    }

    /// Years holding a non-missing value
    pub fn non_missing_count(&self) -> usize {
        self.values.iter().filter(|v| !is_missing(**v)).count()
    }

    pub fn has_data(&self) -> bool {
        self.non_missing_count() > 0
    }
}
