//! Format detection for crop pattern and irrigation practice files.
//!
//! Classifies a file as one of the [`Dialect`]s without being told the
//! version. The first non-comment line decides whether the period is
//! stated in a header; if it is, the first data record decides between
//! version 10 and version 12+. Files with no header get their period from
//! the year tokens found near the start and end of the file.

use super::layout::{Dialect, FileKind};
use crate::constants::{
    CDS_V12_MIN_PRIMARY_LENGTH, COMMENT_CHAR, IPY_V12_MIN_TOKENS, MAX_REASONABLE_YEAR,
    MIN_REASONABLE_YEAR, PERIOD_SCAN_WINDOW_BYTES,
};
use crate::error::{CuError, Result};
use crate::header::{PeriodHeader, ordered_period, parse_period_header};
use regex::Regex;
use std::io::{BufRead, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info};

/// Outcome of format detection
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub dialect: Dialect,
    /// Period from the header, or inferred when the file has none
    pub period: (i32, i32),
    pub header: Option<PeriodHeader>,
    /// True when the period came from scanning the records
    pub period_inferred: bool,
}

impl Detection {
    pub fn units(&self) -> &str {
        self.header
            .as_ref()
            .map(|h| h.units.as_str())
            .unwrap_or(crate::constants::ACRE_UNITS)
    }
}

fn is_skippable(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with(COMMENT_CHAR)
}

/// Period-in-header test on the first non-comment line
pub fn has_period_header(first_line: &str) -> bool {
    first_line.len() > 2 && first_line.starts_with("  ")
}

/// Version-10 vs version-12+ test on the first data record
pub fn classify_data_line(kind: FileKind, line: &str) -> Dialect {
    let is_v12 = match kind {
        FileKind::CropPattern => line.trim_end().len() >= CDS_V12_MIN_PRIMARY_LENGTH,
        FileKind::IrrigationPractice => line.split_whitespace().count() >= IPY_V12_MIN_TOKENS,
    };
    if is_v12 { Dialect::V12Plus } else { Dialect::V10 }
}

/// Detect the dialect and period of a file.
///
/// `forced` overrides the version heuristic but cannot invent a missing
/// period header. The reader is rewound before returning.
pub fn detect<R: BufRead + Seek>(
    reader: &mut R,
    kind: FileKind,
    forced: Option<Dialect>,
    path: &Path,
) -> Result<Detection> {
    reader
        .seek(SeekFrom::Start(0))
        .map_err(|e| CuError::io(path, e))?;

    let mut first_line = None;
    let mut data_line = None;
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).map_err(|e| CuError::io(path, e))?;
        if read == 0 {
            break;
        }
        let text = line.trim_end_matches(['\n', '\r']);
        if is_skippable(text) {
            continue;
        }
        if first_line.is_none() {
            first_line = Some(text.to_string());
            if !has_period_header(text) {
                break;
            }
        } else {
            data_line = Some(text.to_string());
            break;
        }
    }

    let first_line = first_line
        .ok_or_else(|| CuError::format(path, "file has no non-comment lines"))?;

    let detection = if has_period_header(&first_line) {
        let header = parse_period_header(&first_line).map_err(|reason| {
            CuError::format(path, format!("cannot read period header: {}", reason))
        })?;
        let detected = match &data_line {
            Some(data) => classify_data_line(kind, data),
            None => Dialect::V12Plus,
        };
        let dialect = match forced {
            Some(Dialect::NoPeriod) => {
                return Err(CuError::format(
                    path,
                    "legacy format requested but the file states its period in a header",
                ));
            }
            Some(dialect) => dialect,
            None => detected,
        };
        if forced.is_some() && dialect != detected {
            info!(
                "{}: using configured {} instead of detected {}",
                path.display(),
                dialect,
                detected
            );
        }
        Detection {
            dialect,
            period: ordered_period(&header),
            header: Some(header),
            period_inferred: false,
        }
    } else {
        if forced == Some(Dialect::V12Plus) {
            return Err(CuError::format(
                path,
                "version 12 format requested but the file has no period header",
            ));
        }
        let period = infer_period(reader, path)?;
        Detection {
            dialect: Dialect::NoPeriod,
            period,
            header: None,
            period_inferred: true,
        }
    };

    debug!(
        "{}: detected {} with period {}-{}",
        path.display(),
        detection.dialect,
        detection.period.0,
        detection.period.1
    );

    reader
        .seek(SeekFrom::Start(0))
        .map_err(|e| CuError::io(path, e))?;
    Ok(detection)
}

/// Plausible record years found at the start of lines in a text window
fn window_years(year: &Regex, window: &str) -> Vec<i32> {
    year.captures_iter(window)
        .filter_map(|c| c[1].parse::<i32>().ok())
        .filter(|y| (MIN_REASONABLE_YEAR..MAX_REASONABLE_YEAR).contains(y))
        .collect()
}

/// Infer the period of a file without a header from sampled byte windows
pub fn infer_period<R: Read + Seek>(reader: &mut R, path: &Path) -> Result<(i32, i32)> {
    let len = reader
        .seek(SeekFrom::End(0))
        .map_err(|e| CuError::io(path, e))?;

    let head = read_window(reader, 0, path)?;
    let tail_start = len.saturating_sub(PERIOD_SCAN_WINDOW_BYTES);
    let mut tail = read_window(reader, tail_start, path)?;
    if tail_start > 0 {
        // First line of the tail window is probably cut in the middle
        tail = match tail.find('\n') {
            Some(i) => tail[i + 1..].to_string(),
            None => String::new(),
        };
    }

    let year = Regex::new(r"(?m)^(\d{4})\s")
        .map_err(|e| CuError::format(path, format!("bad year pattern: {}", e)))?;
    let years: Vec<i32> = window_years(&year, &head)
        .into_iter()
        .chain(window_years(&year, &tail))
        .collect();

    match (years.iter().min(), years.iter().max()) {
        (Some(&year1), Some(&year2)) => Ok((year1, year2)),
        _ => Err(CuError::format(
            path,
            "no period header and no plausible record years found",
        )),
    }
}

fn read_window<R: Read + Seek>(reader: &mut R, start: u64, path: &Path) -> Result<String> {
    reader
        .seek(SeekFrom::Start(start))
        .map_err(|e| CuError::io(path, e))?;
    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take(PERIOD_SCAN_WINDOW_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| CuError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
