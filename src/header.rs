//! Period header parsing and generated documentation headers.
//!
//! Parses the line that states a file's period, in either the fixed-column
//! form (`  1950  2005 ACRE  CYR`) or the newest tokenized form introduced
//! by six leading spaces (`      1/1950  -     12/2005 ACRE  CYR`), and
//! builds the `#>` comment block that documents every column on write.

use crate::constants::{
    ACRE_UNITS, END_HEADER_MARKER, GENERATED_COMMENT_PREFIX, MAX_HEADER_YEAR, MIN_HEADER_YEAR,
    YEAR_TYPE_CALENDAR,
};
use crate::format::layout::{
    Dialect, FieldType, FileKind, Layout, PERIOD_HEADER, RecordLayout, fields,
};
use crate::format::record::parse_fields;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How the period header was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderForm {
    /// Fixed columns, years only
    Fixed,
    /// Six leading spaces, whitespace separated, `MM/YYYY` dates allowed
    Tokenized,
}

/// Period stated in a file header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodHeader {
    pub year1: i32,
    pub year2: i32,
    pub units: String,
    pub year_type: String,
    pub form: HeaderForm,
}

/// Check whether a line uses the tokenized header form
pub fn is_tokenized_header(line: &str) -> bool {
    line.len() > 6 && line.starts_with("      ")
}

/// Parse a period header line
pub fn parse_period_header(line: &str) -> std::result::Result<PeriodHeader, String> {
    if is_tokenized_header(line) {
        return parse_tokenized(line);
    }

    match parse_fixed(line) {
        Ok(header) => Ok(header),
        Err(reason) => {
            debug!("Fixed-column header parse failed ({}), trying tokens", reason);
            parse_tokenized(line).map_err(|_| reason)
        }
    }
}

fn parse_fixed(line: &str) -> std::result::Result<PeriodHeader, String> {
    let values = parse_fields(line, &PERIOD_HEADER)?;
    let year1 = values
        .int(fields::YEAR1)
        .ok_or_else(|| "header has no first year".to_string())?;
    let year2 = values
        .int(fields::YEAR2)
        .ok_or_else(|| "header has no last year".to_string())?;

    Ok(PeriodHeader {
        year1: check_header_year(year1)?,
        year2: check_header_year(year2)?,
        units: non_empty_or(values.text(fields::UNITS), ACRE_UNITS),
        year_type: non_empty_or(values.text(fields::YEAR_TYPE), YEAR_TYPE_CALENDAR),
        form: HeaderForm::Fixed,
    })
}

fn parse_tokenized(line: &str) -> std::result::Result<PeriodHeader, String> {
    let tokens: Vec<&str> = line.split_whitespace().filter(|t| *t != "-").collect();
    if tokens.len() < 2 {
        return Err(format!("expected start and end dates in header \"{}\"", line));
    }

    let year1 = parse_header_year(tokens[0])?;
    let year2 = parse_header_year(tokens[1])?;

    Ok(PeriodHeader {
        year1,
        year2,
        units: non_empty_or(tokens.get(2).copied(), ACRE_UNITS),
        year_type: non_empty_or(tokens.get(3).copied(), YEAR_TYPE_CALENDAR),
        form: HeaderForm::Tokenized,
    })
}

/// Year from `YYYY` or `MM/YYYY`
fn parse_header_year(token: &str) -> std::result::Result<i32, String> {
    let year = token.rsplit('/').next().unwrap_or(token);
    let year = year
        .parse::<i64>()
        .map_err(|_| format!("invalid year \"{}\" in header", token))?;
    check_header_year(year)
}

fn check_header_year(year: i64) -> std::result::Result<i32, String> {
    if (i64::from(MIN_HEADER_YEAR)..=i64::from(MAX_HEADER_YEAR)).contains(&year) {
        Ok(year as i32)
    } else {
        Err(format!(
            "header year {} is outside {}-{}",
            year, MIN_HEADER_YEAR, MAX_HEADER_YEAR
        ))
    }
}

fn non_empty_or(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Format the period header line for a dialect, `None` if it has none
pub fn format_period_header(year1: i32, year2: i32, units: &str, dialect: Dialect) -> Option<String> {
    match dialect {
        Dialect::NoPeriod => None,
        Dialect::V10 => Some(format!(
            "{:>6}{:>6} {:<5}{:>4}",
            year1, year2, units, YEAR_TYPE_CALENDAR
        )),
        Dialect::V12Plus => Some(format!(
            "      {:>2}/{:04}  -     {:>2}/{:04} {:<5}{:>4}",
            1, year1, 12, year2, units, YEAR_TYPE_CALENDAR
        )),
    }
}

/// Builds the generated comment block written at the top of a file
#[derive(Debug, Default)]
pub struct DocumentationHeader {
    lines: Vec<String>,
}

impl DocumentationHeader {
    pub fn new(title: &str) -> Self {
        let mut header = Self::default();
        header.push(title);
        header.push("");
        header
    }

    /// Add one generated line
    pub fn push(&mut self, text: &str) {
        if text.is_empty() {
            self.lines.push(GENERATED_COMMENT_PREFIX.to_string());
        } else {
            self.lines
                .push(format!("{} {}", GENERATED_COMMENT_PREFIX, text));
        }
    }

    /// Add a free-text comment carried over from an input file
    pub fn push_user_comment(&mut self, text: &str) {
        if text.starts_with('>') || text.trim() == &END_HEADER_MARKER[1..] {
            // Generated by an earlier write; regenerated below instead
            return;
        }
        self.lines.push(format!("#{}", text));
    }

    /// Describe every data column of a layout, with its character span
    pub fn describe_layout(&mut self, layout: &Layout, include_area: bool) {
        self.push(&format!(
            "{} file, {} format",
            match layout.kind {
                FileKind::CropPattern => "Crop pattern",
                FileKind::IrrigationPractice => "Irrigation practice",
            },
            layout.dialect
        ));
        self.push("");
        if layout.dialect.has_period_header() {
            self.push("Period header (first non-comment line):");
            self.describe_record(&PERIOD_HEADER, true);
            self.push("");
        }
        self.push("Year record (first character is not blank):");
        self.describe_record(&layout.primary, true);
        if let Some(detail) = &layout.detail {
            self.push("");
            self.push("Item records (first character is blank), one per item:");
            self.describe_record(detail, include_area);
        }
    }

    fn describe_record(&mut self, record: &RecordLayout, include_area: bool) {
        let mut start = 1;
        for column in record.columns {
            let end = start + column.width - 1;
            if column.name == fields::AREA && !include_area {
                start = end + 1;
                continue;
            }
            let format = match column.field {
                FieldType::Skip => {
                    start = end + 1;
                    continue;
                }
                FieldType::Text => format!("a{}", column.width),
                FieldType::Int => format!("i{}", column.width),
                FieldType::Real { precision } => format!("f{}.{}", column.width, precision),
            };
            self.push(&format!(
                "  {:>3}-{:<3} {:<7} {:<8} {}",
                start, end, format, column.name, column.description
            ));
            start = end + 1;
        }
    }

    /// Finish with the end-of-header marker
    pub fn into_lines(mut self) -> Vec<String> {
        self.lines.push(END_HEADER_MARKER.to_string());
        self.lines
    }
}

/// Warn when a stated period is reversed; returns it in order
pub fn ordered_period(header: &PeriodHeader) -> (i32, i32) {
    if header.year1 > header.year2 {
        warn!(
            "Header period {}-{} is reversed, using {}-{}",
            header.year1, header.year2, header.year2, header.year1
        );
        (header.year2, header.year1)
    } else {
        (header.year1, header.year2)
    }
}
