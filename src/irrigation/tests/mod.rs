//! Tests for irrigation practice aggregates, reconciliation, reading and writing


use crate::config::ReadOptions;
use crate::error::ReadOutcome;
use crate::format::LocationFile;
use crate::irrigation::{IrrigationPracticeTs, PracticeSeries, read_irrigation_practice};
use std::io::Cursor;
use std::path::Path;

/// Acreage and efficiency values of one version 12+ record
#[derive(Debug, Clone, Copy)]
pub struct V12Values {
    pub efficiencies: (f64, f64, f64),
    pub surface_flood: f64,
    pub surface_sprinkler: f64,
    pub groundwater_flood: f64,
    pub groundwater_sprinkler: f64,
    pub pumping_max: f64,
    pub gw_mode: i32,
    pub total: f64,
}

impl Default for V12Values {
    fn default() -> Self {
        Self {
            efficiencies: (0.6, 0.55, 0.8),
            surface_flood: 40.0,
            surface_sprinkler: 10.0,
            groundwater_flood: 30.0,
            groundwater_sprinkler: 20.0,
            pumping_max: 0.0,
            gw_mode: 1,
            total: 100.0,
        }
    }
}

/// Version 12+ record line
pub fn v12_line(year: i32, id: &str, v: &V12Values) -> String {
    format!(
        "{:<4} {:<12}{:>6.2}{:>6.2}{:>6.2}{:>8.1}{:>8.1}{:>8.1}{:>8.1}{:>12.0}{:>3}{:>10.1}",
        year,
        id,
        v.efficiencies.0,
        v.efficiencies.1,
        v.efficiencies.2,
        v.surface_flood,
        v.surface_sprinkler,
        v.groundwater_flood,
        v.groundwater_sprinkler,
        v.pumping_max,
        v.gw_mode,
        v.total
    )
}

/// Version 10 record line: groundwater acreage and total sprinkler acreage
pub fn v10_line(year: i32, id: &str, groundwater: f64, sprinkler: f64, total: f64) -> String {
    format!(
        "{:<4} {:<12}{:>6.2}{:>6.2}{:>6.2}{:>8.0}{:>8.0}{:>12.0}{:>3}{:>8.0}",
        year, id, 0.6, 0.55, 0.8, groundwater, sprinkler, 0.0, 1, total
    )
}

pub fn file_text(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Read irrigation practice text, failing the test on format errors
pub fn read_text(
    text: &str,
    options: &ReadOptions,
) -> ReadOutcome<LocationFile<IrrigationPracticeTs>> {
    read_irrigation_practice(
        Cursor::new(text.as_bytes().to_vec()),
        Path::new("test.ipy"),
        options,
    )
    .unwrap()
}

/// Location with one year of consistent acreage: 40/10 surface, 30/20 groundwater
pub fn create_test_practice(id: &str, year: i32) -> IrrigationPracticeTs {
    let mut practice = IrrigationPracticeTs::new(id, 2000, 2005);
    practice.set(PracticeSeries::ConveyanceEfficiency, year, 0.6);
    practice.set(PracticeSeries::FloodEfficiency, year, 0.55);
    practice.set(PracticeSeries::SprinklerEfficiency, year, 0.8);
    practice.set(PracticeSeries::SurfaceFlood, year, 40.0);
    practice.set(PracticeSeries::SurfaceSprinkler, year, 10.0);
    practice.set(PracticeSeries::GroundwaterFlood, year, 30.0);
    practice.set(PracticeSeries::GroundwaterSprinkler, year, 20.0);
    practice.set(PracticeSeries::Total, year, 100.0);
    practice.set(PracticeSeries::PumpingMax, year, 0.0);
    practice.set_gw_mode_code(year, Some(1));
    practice.refresh_subtotals(year);
    practice
}
