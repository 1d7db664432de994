//! Crop pattern (`.cds`) file reader.

use super::CropPatternTs;
use crate::config::{ReadDataFrom, ReadOptions};
use crate::constants::MISSING_VALUE;
use crate::error::{ReadOutcome, Result};
use crate::format::layout::{FileKind, fields, layout};
use crate::format::record::{DetailRecord, RecordGroup};
use crate::format::{Detection, LocationFile, LocationIndex, RecordReader, detect, open_reader};
use crate::series::is_missing;
use std::collections::BTreeSet;
use std::io::{BufRead, Seek};
use std::path::Path;
use tracing::{debug, info, warn};

/// Read a crop pattern file.
///
/// Format problems (unreadable file, no data, impossible forced version)
/// are returned as `Err`. A bad record stops the read but everything read
/// before it is kept in the returned outcome.
pub fn read_crop_pattern_file(
    path: &Path,
    options: &ReadOptions,
) -> Result<ReadOutcome<LocationFile<CropPatternTs>>> {
    info!("Reading crop pattern file {}", path.display());
    read_crop_pattern(open_reader(path)?, path, options)
}

/// Read crop pattern records from any seekable reader
pub fn read_crop_pattern<R: BufRead + Seek>(
    mut reader: R,
    path: &Path,
    options: &ReadOptions,
) -> Result<ReadOutcome<LocationFile<CropPatternTs>>> {
    let detection = detect(&mut reader, FileKind::CropPattern, options.version, path)?;
    Ok(read_records(reader, &detection, path, options))
}

fn read_records<R: BufRead>(
    reader: R,
    detection: &Detection,
    path: &Path,
    options: &ReadOptions,
) -> ReadOutcome<LocationFile<CropPatternTs>> {
    let mode = options.effective_read_data_from(detection.dialect);
    if mode != options.read_data_from {
        info!(
            "{}: {} files carry no crop acreage, reading {}",
            path.display(),
            detection.dialect,
            mode
        );
    }

    let (year1, year2) = detection.period;
    let units = detection.units().to_string();
    let mut file = LocationFile::empty(path, detection.dialect, detection.period, &units);
    let mut index = LocationIndex::default();
    let mut years_read: Vec<BTreeSet<i32>> = Vec::new();

    let mut records = RecordReader::new(
        reader,
        layout(FileKind::CropPattern, detection.dialect),
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
            || CropPatternTs::new(&primary.location, year1, year2, &units),
        );
        if years_read.len() <= position {
            years_read.resize_with(position + 1, BTreeSet::new);
        }
        years_read[position].insert(primary.year);
        apply_group(&mut file.locations[position], &group, mode, options);
    }
    file.comments = records.into_comments();

    // Crops that first appear in a later year leave holes in earlier ones
    for (location, years) in file.locations.iter_mut().zip(&years_read) {
        for &year in years {
            location.fill_missing_crops(year);
        }
    }

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

/// Acreage of one detail record in `CropArea` mode
fn detail_area(detail: &DetailRecord, total: f64) -> f64 {
    if detail.fields.has_value(fields::AREA) {
        return detail.fields.real(fields::AREA);
    }
    let fraction = detail.fields.real(fields::FRACTION);
    if is_missing(total) || is_missing(fraction) {
        MISSING_VALUE
    } else {
        total * fraction
    }
}

fn apply_group(
    location: &mut CropPatternTs,
    group: &RecordGroup,
    mode: ReadDataFrom,
    options: &ReadOptions,
) {
    let year = group.primary.year;
    let total = group.primary.total;

    // The year's record replaces whatever was known for the year
    location.set_crop_areas_to_zero(year, true);

    if group.details.is_empty() {
        location.set_pattern_by_fractions(year, total, &[]);
        return;
    }

    let names: Vec<String> = group
        .details
        .iter()
        .map(|d| options.adjust_name(&d.name))
        .collect();

    match mode {
        ReadDataFrom::CropArea => {
            let crops: Vec<(&str, f64)> = names
                .iter()
                .zip(&group.details)
                .map(|(name, detail)| (name.as_str(), detail_area(detail, total)))
                .collect();
            location.set_pattern_by_areas(year, &crops);
        }
        ReadDataFrom::TotalAndCropFraction => {
            let crops: Vec<(&str, f64)> = names
                .iter()
                .zip(&group.details)
                .map(|(name, detail)| (name.as_str(), detail.fields.real(fields::FRACTION)))
                .collect();
            location.set_pattern_by_fractions(year, total, &crops);
        }
    }
}
