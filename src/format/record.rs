//! Fixed-column record tokenizer and record grouping.
//!
//! A line whose first character is blank is a detail record; anything else
//! is a primary (year/location) record. [`RecordReader`] groups each primary
//! record with the detail records that follow it and hands out one
//! [`RecordGroup`] per (year, location) pair.

use super::layout::{FieldType, Layout, RecordLayout, fields};
use super::number::{format_int, format_real, format_text};
use crate::constants::{COMMENT_CHAR, MISSING_VALUE};
use crate::error::{CuError, Result};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Decoded value of one column
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(Option<i64>),
    Real(Option<f64>),
}

/// Decoded columns of one line, in layout order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: Vec<(&'static str, FieldValue)>,
}

impl Fields {
    fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(FieldValue::Int(v)) => *v,
            _ => None,
        }
    }

    /// Real value, [`MISSING_VALUE`] when the column is blank or absent
    pub fn real(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(FieldValue::Real(Some(v))) => *v,
            _ => MISSING_VALUE,
        }
    }

    pub fn has_value(&self, name: &str) -> bool {
        match self.get(name) {
            Some(FieldValue::Text(s)) => !s.is_empty(),
            Some(FieldValue::Int(v)) => v.is_some(),
            Some(FieldValue::Real(v)) => v.is_some(),
            None => false,
        }
    }
}

/// Slice `line` into the layout's columns and decode each one.
///
/// Columns past the end of a short line decode as blank. The error string
/// names the offending column.
pub fn parse_fields(line: &str, layout: &RecordLayout) -> std::result::Result<Fields, String> {
    let chars: Vec<char> = line.chars().collect();
    let mut start = 0;
    let mut values = Vec::with_capacity(layout.columns.len());

    for column in layout.columns {
        let end = (start + column.width).min(chars.len());
        let raw: String = if start < chars.len() {
            chars[start..end].iter().collect()
        } else {
            String::new()
        };
        start += column.width;

        let token = raw.trim();
        let value = match column.field {
            FieldType::Skip => continue,
            FieldType::Text => FieldValue::Text(token.to_string()),
            FieldType::Int if token.is_empty() => FieldValue::Int(None),
            FieldType::Int => FieldValue::Int(Some(token.parse::<i64>().map_err(|_| {
                format!("expected integer for {} but found \"{}\"", column.name, token)
            })?)),
            FieldType::Real { .. } if token.is_empty() => FieldValue::Real(None),
            FieldType::Real { .. } => FieldValue::Real(Some(token.parse::<f64>().map_err(
                |_| format!("expected number for {} but found \"{}\"", column.name, token),
            )?)),
        };
        values.push((column.name, value));
    }

    Ok(Fields { values })
}

/// Value handed to [`format_fields`] for one column
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Real(f64),
    /// Column left blank
    Blank,
}

/// Format one line from the layout, asking `cell` for each named column.
///
/// Trailing blanks are trimmed so that omitted optional columns leave no
/// padding behind.
pub fn format_fields(layout: &RecordLayout, mut cell: impl FnMut(&str) -> Cell) -> String {
    let mut line = String::with_capacity(layout.width());
    for column in layout.columns {
        let formatted = match (column.field, cell(column.name)) {
            (FieldType::Skip, _) | (_, Cell::Blank) => " ".repeat(column.width),
            (FieldType::Real { precision }, Cell::Real(v)) => {
                format_real(v, column.width, precision)
            }
            (FieldType::Real { precision }, Cell::Int(v)) => {
                format_real(v as f64, column.width, precision)
            }
            (FieldType::Int, Cell::Int(v)) => format_int(v, column.width),
            (FieldType::Int, Cell::Real(v)) => format_int(v.round() as i64, column.width),
            (_, Cell::Text(s)) => format_text(&s, column.width),
            (FieldType::Text, Cell::Int(v)) => format_text(&v.to_string(), column.width),
            (FieldType::Text, Cell::Real(v)) => format_text(&v.to_string(), column.width),
        };
        line.push_str(&formatted);
    }
    line.truncate(line.trim_end().len());
    line
}

/// Year/location record
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryRecord {
    pub line_number: usize,
    pub year: i32,
    pub location: String,
    /// Total or placeholder, may be missing
    pub total: f64,
    /// Number of detail records announced, zero for single-line layouts
    pub count: usize,
    pub fields: Fields,
}

/// Continuation record for one item of the current primary record
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub line_number: usize,
    pub name: String,
    pub fields: Fields,
}

/// A primary record and the detail records that followed it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordGroup {
    pub primary: PrimaryRecord,
    pub details: Vec<DetailRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    AwaitingHeader,
    ReadingRecords,
    Finished,
}

/// Streams [`RecordGroup`]s out of a classified file.
///
/// A primary record flushes the group accumulated so far; end of input
/// flushes the last one. The first error ends iteration. A bad year record
/// still flushes the complete group before it, then yields the error.
pub struct RecordReader<R> {
    lines: std::io::Lines<R>,
    layout: &'static Layout,
    path: PathBuf,
    line_number: usize,
    state: ReaderState,
    pending: Option<RecordGroup>,
    deferred: Option<CuError>,
    comments: Vec<String>,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R, layout: &'static Layout, path: &Path) -> Self {
        let state = if layout.dialect.has_period_header() {
            ReaderState::AwaitingHeader
        } else {
            ReaderState::ReadingRecords
        };
        Self {
            lines: reader.lines(),
            layout,
            path: path.to_path_buf(),
            line_number: 0,
            state,
            pending: None,
            deferred: None,
            comments: Vec::new(),
        }
    }

    /// Comment lines seen so far, without the leading `#`
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn into_comments(self) -> Vec<String> {
        self.comments
    }

    fn parse_error(&self, line: &str, reason: impl Into<String>) -> CuError {
        CuError::parse(&self.path, self.line_number, line, reason)
    }

    fn parse_primary(&self, line: &str) -> Result<PrimaryRecord> {
        let fields =
            parse_fields(line, &self.layout.primary).map_err(|e| self.parse_error(line, e))?;

        let year = fields
            .int(fields::YEAR)
            .ok_or_else(|| self.parse_error(line, "missing year"))?;
        let location = fields
            .text(fields::LOCATION)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| self.parse_error(line, "missing location identifier"))?
            .to_string();
        let count = fields.int(fields::COUNT).unwrap_or(0);
        if count < 0 {
            return Err(self.parse_error(line, format!("negative record count {}", count)));
        }

        Ok(PrimaryRecord {
            line_number: self.line_number,
            year: year as i32,
            location,
            total: fields.real(fields::TOTAL),
            count: count as usize,
            fields,
        })
    }

    fn parse_detail(&self, line: &str) -> Result<DetailRecord> {
        let layout = self.layout.detail.as_ref().ok_or_else(|| {
            self.parse_error(line, "continuation line in a file with single-line records")
        })?;
        let fields = parse_fields(line, layout).map_err(|e| self.parse_error(line, e))?;
        let name = fields
            .text(fields::NAME)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| self.parse_error(line, "missing item name"))?
            .to_string();

        Ok(DetailRecord {
            line_number: self.line_number,
            name,
            fields,
        })
    }

    fn flush(&mut self) -> Option<RecordGroup> {
        let group = self.pending.take()?;
        if group.details.len() != group.primary.count {
            warn!(
                "{} line {}: {} {} announces {} records but {} follow",
                self.path.display(),
                group.primary.line_number,
                group.primary.year,
                group.primary.location,
                group.primary.count,
                group.details.len()
            );
        }
        Some(group)
    }

    fn fail(&mut self, error: CuError) -> Option<Result<RecordGroup>> {
        self.state = ReaderState::Finished;
        self.pending = None;
        Some(Err(error))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<RecordGroup>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state == ReaderState::Finished {
                return self.deferred.take().map(Err);
            }

            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    let error = CuError::io(&self.path, e);
                    return self.fail(error);
                }
                None => {
                    self.state = ReaderState::Finished;
                    return self.flush().map(Ok);
                }
            };
            self.line_number += 1;
            let line = line.trim_end_matches('\r');

            if let Some(comment) = line.strip_prefix(COMMENT_CHAR) {
                self.comments.push(comment.to_string());
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            if self.state == ReaderState::AwaitingHeader {
                debug!("Skipping period header at line {}", self.line_number);
                self.state = ReaderState::ReadingRecords;
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                match self.parse_detail(line) {
                    Ok(detail) => match self.pending.as_mut() {
                        Some(group) => group.details.push(detail),
                        None => {
                            let error =
                                self.parse_error(line, "continuation line before any year record");
                            return self.fail(error);
                        }
                    },
                    Err(e) => return self.fail(e),
                }
            } else {
                match self.parse_primary(line) {
                    Ok(primary) => {
                        let previous = self.flush();
                        self.pending = Some(RecordGroup {
                            primary,
                            details: Vec::new(),
                        });
                        if previous.is_some() {
                            return previous.map(Ok);
                        }
                    }
                    Err(e) => {
                        self.state = ReaderState::Finished;
                        return match self.flush() {
                            Some(group) => {
                                self.deferred = Some(e);
                                Some(Ok(group))
                            }
                            None => Some(Err(e)),
                        };
                    }
                }
            }
        }
    }
}
