//! Irrigation practice (`.ipy`) file reader.
//!
//! Every record is a single year/location line. Version 12+ lines carry the
//! four acreage parts directly. Older lines carry only the groundwater
//! acreage and the total sprinkler acreage; the parts are rebuilt by giving
//! sprinkler acreage to groundwater land first and letting reconciliation
//! fill the rest.

use super::{IrrigationPracticeTs, PracticeSeries};
use crate::config::ReadOptions;
use crate::error::{ReadOutcome, Result};
use crate::format::layout::{Dialect, FileKind, fields, layout};
use crate::format::record::PrimaryRecord;
use crate::format::{Detection, LocationFile, LocationIndex, RecordReader, detect, open_reader};
use crate::series::is_missing;
use std::io::{BufRead, Seek};
use std::path::Path;
use tracing::{debug, info, warn};

/// Read an irrigation practice file.
///
/// Format problems are returned as `Err`; a bad record stops the read and
/// the locations read before it are kept in the returned outcome.
pub fn read_irrigation_practice_file(
    path: &Path,
    options: &ReadOptions,
) -> Result<ReadOutcome<LocationFile<IrrigationPracticeTs>>> {
    info!("Reading irrigation practice file {}", path.display());
    read_irrigation_practice(open_reader(path)?, path, options)
}

/// Read irrigation practice records from any seekable reader
pub fn read_irrigation_practice<R: BufRead + Seek>(
    mut reader: R,
    path: &Path,
    options: &ReadOptions,
) -> Result<ReadOutcome<LocationFile<IrrigationPracticeTs>>> {
    let detection = detect(&mut reader, FileKind::IrrigationPractice, options.version, path)?;
    Ok(read_records(reader, &detection, path))
}

fn read_records<R: BufRead>(
    reader: R,
    detection: &Detection,
    path: &Path,
) -> ReadOutcome<LocationFile<IrrigationPracticeTs>> {
    let (year1, year2) = detection.period;
    let mut file = LocationFile::empty(path, detection.dialect, detection.period, detection.units());
    let mut index = LocationIndex::default();

    let mut records = RecordReader::new(
        reader,
        layout(FileKind::IrrigationPractice, detection.dialect),
        path,
    );
    let mut error = None;
    for group in records.by_ref() {
        let group = match group {
            Ok(group) => group,
            Err(e) => {
                error = Some(e);
                break;
            }
        };
        let primary = &group.primary;
        if primary.year < year1 || primary.year > year2 {
            warn!(
                "{} line {}: year {} is outside the period {}-{}, ignored",
                path.display(),
                primary.line_number,
                primary.year,
                year1,
                year2
            );
            continue;
        }

        let position = index.position(
            &mut file.locations,
            &primary.location,
            primary.year,
            path,
            || IrrigationPracticeTs::new(&primary.location, year1, year2),
        );
        let location = &mut file.locations[position];
        match detection.dialect {
            Dialect::V12Plus => apply_parts_record(location, primary),
            Dialect::V10 | Dialect::NoPeriod => apply_sprinkler_record(location, primary),
        }
    }
    file.comments = records.into_comments();

    debug!(
        "{}: read {} locations",
        path.display(),
        file.locations.len()
    );
    match error {
        Some(e) => ReadOutcome::failed(file, e),
        None => ReadOutcome::complete(file),
    }
}

/// Efficiencies, pumping, mode and total shared by every layout
fn apply_common(location: &mut IrrigationPracticeTs, record: &PrimaryRecord) {
    let year = record.year;
    let values = &record.fields;
    location.set(PracticeSeries::ConveyanceEfficiency, year, values.real(fields::CEFF));
    location.set(PracticeSeries::FloodEfficiency, year, values.real(fields::FEFF));
    location.set(PracticeSeries::SprinklerEfficiency, year, values.real(fields::SEFF));
    location.set(PracticeSeries::PumpingMax, year, values.real(fields::PUMPING_MAX));
    location.set(PracticeSeries::Total, year, record.total);
    let mode = values.int(fields::GW_MODE).filter(|code| *code != 0);
    location.set_gw_mode_code(year, mode.map(|code| code as i32));
}

fn apply_parts_record(location: &mut IrrigationPracticeTs, record: &PrimaryRecord) {
    let year = record.year;
    apply_common(location, record);
    for (kind, field) in [
        (PracticeSeries::SurfaceFlood, fields::SURFACE_FLOOD),
        (PracticeSeries::SurfaceSprinkler, fields::SURFACE_SPRINKLER),
        (PracticeSeries::GroundwaterFlood, fields::GROUNDWATER_FLOOD),
        (PracticeSeries::GroundwaterSprinkler, fields::GROUNDWATER_SPRINKLER),
    ] {
        location.set(kind, year, record.fields.real(field));
    }
    location.refresh_subtotals(year);
}

fn apply_sprinkler_record(location: &mut IrrigationPracticeTs, record: &PrimaryRecord) {
    let year = record.year;
    apply_common(location, record);

    let groundwater = record.fields.real(fields::GROUNDWATER);
    let sprinkler = record.fields.real(fields::SPRINKLER);
    location.set(PracticeSeries::Groundwater, year, groundwater);

    for kind in PracticeSeries::PARTS {
        location.set_missing(kind, year);
    }
    if !is_missing(sprinkler) {
        // Sprinkler acreage goes to groundwater land first
        let gw_sprinkler = if is_missing(groundwater) {
            0.0
        } else {
            sprinkler.min(groundwater)
        };
        if !is_missing(groundwater) {
            location.set(PracticeSeries::GroundwaterSprinkler, year, gw_sprinkler);
        }
        location.set(PracticeSeries::SurfaceSprinkler, year, sprinkler - gw_sprinkler);
    }

    location.adjust_groundwater_to_total(year, false);
}
