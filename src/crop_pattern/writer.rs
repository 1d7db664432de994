//! Crop pattern (`.cds`) file writer.

use super::CropPatternTs;
use crate::config::WriteOptions;
use crate::constants::{ACRE_UNITS, MISSING_VALUE};
use crate::error::Result;
use crate::format::layout::{FileKind, Layout, fields, layout};
use crate::format::record::{Cell, format_fields};
use crate::format::{output_period, write_lines, written_by_line};
use crate::header::{DocumentationHeader, format_period_header};
use crate::series::AnnualSeries;
use std::path::Path;
use tracing::{debug, info};

/// Write crop patterns to a file, refreshing every total first
pub fn write_crop_pattern_file(
    path: &Path,
    locations: &mut [CropPatternTs],
    options: &WriteOptions,
) -> Result<()> {
    info!(
        "Writing {} crop pattern locations to {} ({})",
        locations.len(),
        path.display(),
        options.dialect
    );
    let lines = format_crop_patterns(locations, options);
    write_lines(path, &lines)
}

/// Format crop patterns as file lines.
///
/// Totals are refreshed from the crop series before anything is written.
pub fn format_crop_patterns(locations: &mut [CropPatternTs], options: &WriteOptions) -> Vec<String> {
    for location in locations.iter_mut() {
        location.refresh();
    }

    let layout = layout(FileKind::CropPattern, options.dialect);
    let include_area = options.write_crop_area
        && layout
            .detail
            .as_ref()
            .is_some_and(|d| d.column(fields::AREA).is_some());

    let mut header = DocumentationHeader::new("Crop pattern time series (yearly)");
    header.push(&written_by_line());
    header.push("");
    header.describe_layout(layout, include_area);
    if options.write_only_total {
        header.push("");
        header.push("Only location totals are written; crop records are omitted.");
    }
    for comment in &options.comments {
        header.push_user_comment(comment);
    }
    let mut lines = header.into_lines();

    let Some((year1, year2)) = output_period(options.period, locations.iter().map(|l| l.period()))
    else {
        debug!("No locations and no output period, writing header only");
        return lines;
    };

    let units = locations
        .first()
        .map(|l| l.units().to_string())
        .unwrap_or_else(|| ACRE_UNITS.to_string());
    if let Some(period_line) = format_period_header(year1, year2, &units, options.dialect) {
        lines.push(period_line);
    }

    for year in year1..=year2 {
        for location in locations.iter() {
            format_year(&mut lines, layout, location, year, include_area, options);
        }
    }
    lines
}

fn format_year(
    lines: &mut Vec<String>,
    layout: &Layout,
    location: &CropPatternTs,
    year: i32,
    include_area: bool,
    options: &WriteOptions,
) {
    let total = location.total_area(year);
    let crops: &[AnnualSeries] = match total {
        Some(_) if !options.write_only_total => location.crops(),
        _ => &[],
    };

    lines.push(format_fields(&layout.primary, |name| match name {
        fields::YEAR => Cell::Int(year as i64),
        fields::LOCATION => Cell::Text(location.id().to_string()),
        fields::TOTAL => Cell::Real(total.unwrap_or(MISSING_VALUE)),
        fields::COUNT => Cell::Int(crops.len() as i64),
        _ => Cell::Blank,
    }));

    let Some(detail) = &layout.detail else {
        return;
    };
    let total = total.unwrap_or(0.0);
    for crop in crops {
        let area = crop.value(year);
        let fraction = match area {
            Some(area) if total > 0.0 => area / total,
            _ => 0.0,
        };
        lines.push(format_fields(detail, |name| match name {
            fields::NAME => Cell::Text(crop.name().to_string()),
            fields::FRACTION => Cell::Real(fraction),
            fields::AREA if include_area => Cell::Real(area.unwrap_or(0.0)),
            _ => Cell::Blank,
        }));
    }
}
