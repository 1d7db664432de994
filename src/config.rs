//! Configuration for reading and writing files.
//!
//! Provides the read and write option structures and parses the
//! key/value configuration surface (`Version`, `ReadDataFrom`,
//! `AutoAdjust`, `WriteCropArea`, `WriteOnlyTotal`, `OutputStart`,
//! `OutputEnd`) used by model command files.

use crate::error::{CuError, Result};
use crate::format::layout::Dialect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Where crop acreage comes from when reading a crop pattern file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReadDataFrom {
    /// Use the explicit per-crop acreage column
    #[default]
    CropArea,
    /// Derive acreage as total × crop fraction
    TotalAndCropFraction,
}

impl FromStr for ReadDataFrom {
    type Err = CuError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "croparea" => Ok(ReadDataFrom::CropArea),
            "totalandcropfraction" => Ok(ReadDataFrom::TotalAndCropFraction),
            _ => Err(CuError::configuration(format!(
                "ReadDataFrom=\"{}\" is not CropArea or TotalAndCropFraction",
                s
            ))),
        }
    }
}

impl fmt::Display for ReadDataFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadDataFrom::CropArea => f.write_str("CropArea"),
            ReadDataFrom::TotalAndCropFraction => f.write_str("TotalAndCropFraction"),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(CuError::configuration(format!(
            "{}=\"{}\" is not True or False",
            key, value
        ))),
    }
}

fn parse_year(key: &str, value: &str) -> Result<i32> {
    value.trim().parse::<i32>().map_err(|_| {
        CuError::configuration(format!("{}=\"{}\" is not a year", key, value))
    })
}

/// Options controlling how a file is read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Force a dialect instead of detecting it
    pub version: Option<Dialect>,

    /// Source of crop acreage in crop pattern files
    pub read_data_from: ReadDataFrom,

    /// Replace `.` with `-` in crop names
    pub auto_adjust: bool,
}

impl ReadOptions {
    pub fn with_version(mut self, version: Dialect) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_read_data_from(mut self, read_data_from: ReadDataFrom) -> Self {
        self.read_data_from = read_data_from;
        self
    }

    pub fn with_auto_adjust(mut self) -> Self {
        self.auto_adjust = true;
        self
    }

    /// Build read options from configuration properties.
    ///
    /// Keys are matched case-insensitively. Write-only keys are ignored.
    pub fn from_properties(properties: &[(&str, &str)]) -> Result<Self> {
        let mut options = Self::default();
        for (key, value) in properties {
            match key.to_lowercase().as_str() {
                "version" if value.trim().is_empty() => options.version = None,
                "version" => options.version = Some(value.parse()?),
                "readdatafrom" => options.read_data_from = value.parse()?,
                "autoadjust" => options.auto_adjust = parse_bool(key, value)?,
                "writecroparea" | "writeonlytotal" | "outputstart" | "outputend" => {}
                _ => {
                    return Err(CuError::configuration(format!(
                        "Unknown read option \"{}\"",
                        key
                    )));
                }
            }
        }
        debug!("Read options: {:?}", options);
        Ok(options)
    }

    /// Acreage source actually used for a file of the given dialect.
    ///
    /// Legacy files carry no trustworthy per-crop acreage.
    pub fn effective_read_data_from(&self, dialect: Dialect) -> ReadDataFrom {
        match dialect {
            Dialect::NoPeriod => ReadDataFrom::TotalAndCropFraction,
            _ => self.read_data_from,
        }
    }

    /// Apply the `AutoAdjust` name normalization
    pub fn adjust_name(&self, name: &str) -> String {
        if self.auto_adjust {
            name.replace('.', "-")
        } else {
            name.to_string()
        }
    }
}

/// Options controlling how a file is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Layout to write
    pub dialect: Dialect,

    /// Include per-crop acreage columns
    pub write_crop_area: bool,

    /// Write only the location total, no item records
    pub write_only_total: bool,

    /// Output years, defaults to the union of the location periods
    pub period: Option<(i32, i32)>,

    /// Free-text comments carried into the header
    pub comments: Vec<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::V12Plus,
            write_crop_area: true,
            write_only_total: false,
            period: None,
            comments: Vec::new(),
        }
    }
}

impl WriteOptions {
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_crop_area(mut self, write_crop_area: bool) -> Self {
        self.write_crop_area = write_crop_area;
        self
    }

    pub fn with_only_total(mut self) -> Self {
        self.write_only_total = true;
        self
    }

    pub fn with_period(mut self, year1: i32, year2: i32) -> Self {
        self.period = Some((year1.min(year2), year1.max(year2)));
        self
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    /// Build write options from configuration properties.
    ///
    /// Keys are matched case-insensitively. Read-only keys are ignored.
    pub fn from_properties(properties: &[(&str, &str)]) -> Result<Self> {
        let mut options = Self::default();
        let mut start = None;
        let mut end = None;
        for (key, value) in properties {
            match key.to_lowercase().as_str() {
                "version" if value.trim().is_empty() => {}
                "version" => options.dialect = value.parse()?,
                "writecroparea" => options.write_crop_area = parse_bool(key, value)?,
                "writeonlytotal" => options.write_only_total = parse_bool(key, value)?,
                "outputstart" => start = Some(parse_year(key, value)?),
                "outputend" => end = Some(parse_year(key, value)?),
                "readdatafrom" | "autoadjust" => {}
                _ => {
                    return Err(CuError::configuration(format!(
                        "Unknown write option \"{}\"",
                        key
                    )));
                }
            }
        }
        match (start, end) {
            (Some(y1), Some(y2)) => options = options.with_period(y1, y2),
            (None, None) => {}
            _ => {
                return Err(CuError::configuration(
                    "OutputStart and OutputEnd must be given together",
                ));
            }
        }
        debug!("Write options: {:?}", options);
        Ok(options)
    }
}
