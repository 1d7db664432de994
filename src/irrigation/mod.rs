//! Irrigation practice time series for CU locations.
//!
//! An [`IrrigationPracticeTs`] keeps a fixed set of annual series per
//! location: maximum efficiencies, acreage by supply and method, the two
//! supply subtotals, the total, maximum pumping and the groundwater mode
//! code. The subtotals and total are only kept consistent by the
//! algorithms in [`reconcile`]; individual setters do not cascade.
//!
//! The module is organized into:
//! - [`reconcile`] - total, subtotal and part reconciliation
//! - [`reader`] - irrigation practice (`.ipy`) file reading
//! - [`writer`] - irrigation practice file writing

pub mod reader;
pub mod reconcile;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use reader::{read_irrigation_practice, read_irrigation_practice_file};
pub use reconcile::{GroundwaterOutcome, PartOutcome, SurfaceOutcome};
pub use writer::{format_irrigation_practices, write_irrigation_practice_file};

use crate::constants::{ACRE_UNITS, FRACTION_UNITS, PUMPING_UNITS};
use crate::models::{GroundwaterMode, IrrigationMethod, ParcelObservation, SupplyType};
use crate::series::AnnualSeries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named series of an irrigation practice aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PracticeSeries {
    ConveyanceEfficiency,
    FloodEfficiency,
    SprinklerEfficiency,
    SurfaceFlood,
    SurfaceSprinkler,
    GroundwaterFlood,
    GroundwaterSprinkler,
    Surface,
    Groundwater,
    Total,
    PumpingMax,
}

impl PracticeSeries {
    pub const ALL: [PracticeSeries; 11] = [
        PracticeSeries::ConveyanceEfficiency,
        PracticeSeries::FloodEfficiency,
        PracticeSeries::SprinklerEfficiency,
        PracticeSeries::SurfaceFlood,
        PracticeSeries::SurfaceSprinkler,
        PracticeSeries::GroundwaterFlood,
        PracticeSeries::GroundwaterSprinkler,
        PracticeSeries::Surface,
        PracticeSeries::Groundwater,
        PracticeSeries::Total,
        PracticeSeries::PumpingMax,
    ];

    /// Acreage series by supply and method
    pub const PARTS: [PracticeSeries; 4] = [
        PracticeSeries::SurfaceFlood,
        PracticeSeries::SurfaceSprinkler,
        PracticeSeries::GroundwaterFlood,
        PracticeSeries::GroundwaterSprinkler,
    ];

    pub const EFFICIENCIES: [PracticeSeries; 3] = [
        PracticeSeries::ConveyanceEfficiency,
        PracticeSeries::FloodEfficiency,
        PracticeSeries::SprinklerEfficiency,
    ];

    fn index(&self) -> usize {
        *self as usize
    }

    /// Series name used in exports
    pub fn name(&self) -> &'static str {
        match self {
            PracticeSeries::ConveyanceEfficiency => "CEFF",
            PracticeSeries::FloodEfficiency => "FEFF",
            PracticeSeries::SprinklerEfficiency => "SEFF",
            PracticeSeries::SurfaceFlood => "AcswFL",
            PracticeSeries::SurfaceSprinkler => "AcswSPR",
            PracticeSeries::GroundwaterFlood => "AcgwFL",
            PracticeSeries::GroundwaterSprinkler => "AcgwSPR",
            PracticeSeries::Surface => "AcSWOnly",
            PracticeSeries::Groundwater => "AcGW",
            PracticeSeries::Total => "AcTotal",
            PracticeSeries::PumpingMax => "PumpingMax",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            PracticeSeries::ConveyanceEfficiency
            | PracticeSeries::FloodEfficiency
            | PracticeSeries::SprinklerEfficiency => FRACTION_UNITS,
            PracticeSeries::PumpingMax => PUMPING_UNITS,
            _ => ACRE_UNITS,
        }
    }

    /// Acreage part for a supply type and method
    pub fn part(supply: SupplyType, method: IrrigationMethod) -> Self {
        match (supply, method) {
            (SupplyType::Surface, IrrigationMethod::Flood) => PracticeSeries::SurfaceFlood,
            (SupplyType::Surface, IrrigationMethod::Sprinkler) => PracticeSeries::SurfaceSprinkler,
            (SupplyType::Groundwater, IrrigationMethod::Flood) => PracticeSeries::GroundwaterFlood,
            (SupplyType::Groundwater, IrrigationMethod::Sprinkler) => {
                PracticeSeries::GroundwaterSprinkler
            }
        }
    }

    /// Subtotal for a supply type
    pub fn subtotal(supply: SupplyType) -> Self {
        match supply {
            SupplyType::Surface => PracticeSeries::Surface,
            SupplyType::Groundwater => PracticeSeries::Groundwater,
        }
    }
}

impl fmt::Display for PracticeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of the exported groundwater mode series
pub const GW_MODE_SERIES_NAME: &str = "GWMode";

/// Irrigation practice for one CU location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationPracticeTs {
    id: String,
    year1: i32,
    year2: i32,
    series: Vec<AnnualSeries>,
    gw_mode: Vec<Option<i32>>,
    parcels: Vec<ParcelObservation>,
}

impl IrrigationPracticeTs {
    pub fn new(id: impl Into<String>, year1: i32, year2: i32) -> Self {
        let id = id.into();
        let (year1, year2) = (year1.min(year2), year1.max(year2));
        let series = PracticeSeries::ALL
            .iter()
            .map(|kind| AnnualSeries::new(&id, kind.name(), kind.units(), year1, year2))
            .collect();
        Self {
            id,
            year1,
            year2,
            series,
            gw_mode: vec![None; (year2 - year1 + 1) as usize],
            parcels: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn period(&self) -> (i32, i32) {
        (self.year1, self.year2)
    }

    pub fn series(&self, kind: PracticeSeries) -> &AnnualSeries {
        &self.series[kind.index()]
    }

    /// Value of one series, `None` when missing or outside the period
    pub fn get(&self, kind: PracticeSeries, year: i32) -> Option<f64> {
        self.series[kind.index()].value(year)
    }

    /// Set one series; no other series is adjusted
    pub fn set(&mut self, kind: PracticeSeries, year: i32, value: f64) {
        self.series[kind.index()].set(year, value);
    }

    pub fn set_missing(&mut self, kind: PracticeSeries, year: i32) {
        self.series[kind.index()].set_missing(year);
    }

    pub fn total(&self, year: i32) -> Option<f64> {
        self.get(PracticeSeries::Total, year)
    }

    pub fn groundwater(&self, year: i32) -> Option<f64> {
        self.get(PracticeSeries::Groundwater, year)
    }

    pub fn surface(&self, year: i32) -> Option<f64> {
        self.get(PracticeSeries::Surface, year)
    }

    pub fn part(&self, supply: SupplyType, method: IrrigationMethod, year: i32) -> Option<f64> {
        self.get(PracticeSeries::part(supply, method), year)
    }

    fn mode_index(&self, year: i32) -> Option<usize> {
        if year < self.year1 || year > self.year2 {
            None
        } else {
            Some((year - self.year1) as usize)
        }
    }

    /// Raw groundwater mode code as read, which may be invalid
    pub fn gw_mode_code(&self, year: i32) -> Option<i32> {
        self.mode_index(year).and_then(|i| self.gw_mode[i])
    }

    pub fn gw_mode(&self, year: i32) -> Option<GroundwaterMode> {
        self.gw_mode_code(year).and_then(GroundwaterMode::from_code)
    }

    pub fn set_gw_mode_code(&mut self, year: i32, code: Option<i32>) {
        if let Some(i) = self.mode_index(year) {
            self.gw_mode[i] = code;
        }
    }

    pub fn set_gw_mode(&mut self, year: i32, mode: GroundwaterMode) {
        self.set_gw_mode_code(year, Some(mode.code()));
    }

    /// Recompute each supply subtotal from its parts when both are known
    pub fn refresh_subtotals(&mut self, year: i32) {
        for supply in [SupplyType::Surface, SupplyType::Groundwater] {
            let flood = self.part(supply, IrrigationMethod::Flood, year);
            let sprinkler = self.part(supply, IrrigationMethod::Sprinkler, year);
            if let (Some(flood), Some(sprinkler)) = (flood, sprinkler) {
                self.set(PracticeSeries::subtotal(supply), year, flood + sprinkler);
            }
        }
    }

    /// Sprinkler acreage over both supplies, `None` when neither is known
    pub fn sprinkler_acreage(&self, year: i32) -> Option<f64> {
        let surface = self.get(PracticeSeries::SurfaceSprinkler, year);
        let groundwater = self.get(PracticeSeries::GroundwaterSprinkler, year);
        match (surface, groundwater) {
            (None, None) => None,
            (s, g) => Some(s.unwrap_or(0.0) + g.unwrap_or(0.0)),
        }
    }

    /// Record a raw parcel observation for later data filling
    pub fn add_parcel(&mut self, parcel: ParcelObservation) {
        self.parcels.push(parcel);
    }

    pub fn parcels(&self) -> &[ParcelObservation] {
        &self.parcels
    }

    pub fn parcels_for_year(&self, year: i32) -> impl Iterator<Item = &ParcelObservation> {
        self.parcels.iter().filter(move |p| p.year == year)
    }

    /// Every series plus the mode code series, for flat export
    pub fn to_series_list(&self) -> Vec<AnnualSeries> {
        let mut mode = AnnualSeries::new(&self.id, GW_MODE_SERIES_NAME, "", self.year1, self.year2);
        for (i, code) in self.gw_mode.iter().enumerate() {
            if let Some(code) = code {
                mode.set(self.year1 + i as i32, *code as f64);
            }
        }
        self.series.iter().cloned().chain(std::iter::once(mode)).collect()
    }
}
