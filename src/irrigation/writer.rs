//! Irrigation practice (`.ipy`) file writer.

use super::{IrrigationPracticeTs, PracticeSeries};
use crate::config::WriteOptions;
use crate::constants::{ACRE_UNITS, MISSING_VALUE};
use crate::error::Result;
use crate::format::layout::{FileKind, RecordLayout, fields, layout};
use crate::format::record::{Cell, format_fields};
use crate::format::{output_period, write_lines, written_by_line};
use crate::header::{DocumentationHeader, format_period_header};
use std::path::Path;
use tracing::{debug, info};

/// Write irrigation practices to a file, refreshing subtotals first
pub fn write_irrigation_practice_file(
    path: &Path,
    locations: &mut [IrrigationPracticeTs],
    options: &WriteOptions,
) -> Result<()> {
    info!(
        "Writing {} irrigation practice locations to {} ({})",
        locations.len(),
        path.display(),
        options.dialect
    );
    let lines = format_irrigation_practices(locations, options);
    write_lines(path, &lines)
}

/// Format irrigation practices as file lines.
///
/// Subtotals are recomputed from their parts, where both are known,
/// before anything is written.
pub fn format_irrigation_practices(
    locations: &mut [IrrigationPracticeTs],
    options: &WriteOptions,
) -> Vec<String> {
    for location in locations.iter_mut() {
        let (year1, year2) = location.period();
        for year in year1..=year2 {
            location.refresh_subtotals(year);
        }
    }

    let layout = layout(FileKind::IrrigationPractice, options.dialect);
    let mut header = DocumentationHeader::new("Irrigation practice time series (yearly)");
    header.push(&written_by_line());
    header.push("");
    header.describe_layout(layout, true);
    header.push("");
    header.push("Groundwater mode: 1 = maximize supply, 2 = supplemental, 3 = sprinkler only");
    for comment in &options.comments {
        header.push_user_comment(comment);
    }
    let mut lines = header.into_lines();

    let Some((year1, year2)) = output_period(options.period, locations.iter().map(|l| l.period()))
    else {
        debug!("No locations and no output period, writing header only");
        return lines;
    };
    if let Some(period_line) = format_period_header(year1, year2, ACRE_UNITS, options.dialect) {
        lines.push(period_line);
    }

    for year in year1..=year2 {
        for location in locations.iter() {
            lines.push(format_record(&layout.primary, location, year));
        }
    }
    lines
}

/// Groundwater subtotal, from its parts when the subtotal itself is missing
fn groundwater_acreage(location: &IrrigationPracticeTs, year: i32) -> Option<f64> {
    location.groundwater(year).or_else(|| {
        let flood = location.get(PracticeSeries::GroundwaterFlood, year);
        let sprinkler = location.get(PracticeSeries::GroundwaterSprinkler, year);
        match (flood, sprinkler) {
            (None, None) => None,
            (f, s) => Some(f.unwrap_or(0.0) + s.unwrap_or(0.0)),
        }
    })
}

fn format_record(primary: &RecordLayout, location: &IrrigationPracticeTs, year: i32) -> String {
    let real = |kind: PracticeSeries| Cell::Real(location.get(kind, year).unwrap_or(MISSING_VALUE));
    format_fields(primary, |name| match name {
        fields::YEAR => Cell::Int(year as i64),
        fields::LOCATION => Cell::Text(location.id().to_string()),
        fields::CEFF => real(PracticeSeries::ConveyanceEfficiency),
        fields::FEFF => real(PracticeSeries::FloodEfficiency),
        fields::SEFF => real(PracticeSeries::SprinklerEfficiency),
        fields::SURFACE_FLOOD => real(PracticeSeries::SurfaceFlood),
        fields::SURFACE_SPRINKLER => real(PracticeSeries::SurfaceSprinkler),
        fields::GROUNDWATER_FLOOD => real(PracticeSeries::GroundwaterFlood),
        fields::GROUNDWATER_SPRINKLER => real(PracticeSeries::GroundwaterSprinkler),
        fields::GROUNDWATER => {
            Cell::Real(groundwater_acreage(location, year).unwrap_or(MISSING_VALUE))
        }
        fields::SPRINKLER => {
            Cell::Real(location.sprinkler_acreage(year).unwrap_or(MISSING_VALUE))
        }
        fields::PUMPING_MAX => real(PracticeSeries::PumpingMax),
        // Zero marks an unset mode; a blank would change the token count
        fields::GW_MODE => Cell::Int(location.gw_mode_code(year).unwrap_or(0) as i64),
        fields::TOTAL => real(PracticeSeries::Total),
        _ => Cell::Blank,
    })
}
