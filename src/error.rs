//! Error handling for crop pattern and irrigation practice files.
//!
//! Provides the error taxonomy used by the readers, writers and aggregate
//! operations, plus [`ReadOutcome`] for returning partially read data
//! alongside the error that stopped the read.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CuError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unrecognized file format in {path}: {reason}")]
    Format { path: PathBuf, reason: String },

    #[error("Parse error in {path} at line {line_number}: {reason}\n  line: \"{line}\"")]
    Parse {
        path: PathBuf,
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("Crop \"{crop}\" not found for location {location}")]
    UnknownCrop { location: String, crop: String },

    #[error("Cannot prorate crop areas for location {location} in {year}: {reason}")]
    Proration {
        location: String,
        year: i32,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CuError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn format(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn parse(
        path: impl AsRef<Path>,
        line_number: usize,
        line: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            line_number,
            line: line.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Line number for parse errors, `None` for everything else
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::Parse { line_number, .. } => Some(*line_number),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CuError>;

/// Result of reading one file.
///
/// Parsing is all-or-nothing per file, but aggregates that were already
/// flushed before a bad line are kept in `data` so the caller can decide
/// whether to use them.
#[derive(Debug)]
pub struct ReadOutcome<T> {
    pub data: T,
    pub error: Option<CuError>,
}

impl<T> ReadOutcome<T> {
    pub fn complete(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn failed(data: T, error: CuError) -> Self {
        Self {
            data,
            error: Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Discard partial data if the read failed
    pub fn into_result(self) -> Result<T> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}
