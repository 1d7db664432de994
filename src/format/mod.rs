//! Fixed-column file formats.
//!
//! The format layer is organized into:
//! - [`layout`] - per-dialect column tables
//! - [`detect`] - dialect and period detection
//! - [`record`] - fixed-column tokenizer and record grouping
//! - [`number`] - fixed-width value formatting

pub mod detect;
pub mod layout;
pub mod number;
pub mod record;

pub use detect::{Detection, detect};
pub use layout::{Dialect, FileKind};
pub use record::{RecordGroup, RecordReader};

use crate::error::{CuError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Contents of one file: its locations plus what is needed to rewrite it
#[derive(Debug, Clone)]
pub struct LocationFile<T> {
    pub path: PathBuf,
    pub dialect: Dialect,
    pub period: (i32, i32),
    pub units: String,
    /// Free-text comments, without the leading `#`
    pub comments: Vec<String>,
    pub locations: Vec<T>,
}

impl<T> LocationFile<T> {
    pub fn empty(path: &Path, dialect: Dialect, period: (i32, i32), units: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            dialect,
            period,
            units: units.to_string(),
            comments: Vec::new(),
            locations: Vec::new(),
        }
    }
}

/// Open a file for buffered reading
pub fn open_reader(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| CuError::io(path, e))?;
    Ok(BufReader::new(file))
}

/// Position of each location in a file's location list.
///
/// Locations are expected to appear in the first year of data; one first
/// seen later is accepted with a warning.
#[derive(Debug, Default)]
pub struct LocationIndex {
    positions: HashMap<String, usize>,
    first_year: Option<i32>,
}

impl LocationIndex {
    /// Index of `id` in `locations`, appending a new entry from `create`
    pub fn position<T>(
        &mut self,
        locations: &mut Vec<T>,
        id: &str,
        year: i32,
        path: &Path,
        create: impl FnOnce() -> T,
    ) -> usize {
        let first_year = *self.first_year.get_or_insert(year);
        if let Some(&index) = self.positions.get(id) {
            return index;
        }
        if year != first_year {
            warn!(
                "{}: location {} first appears in {}, not in the first year {}",
                path.display(),
                id,
                year,
                first_year
            );
        }
        locations.push(create());
        let index = locations.len() - 1;
        self.positions.insert(id.to_string(), index);
        index
    }
}

/// Write lines to a file in one pass.
///
/// Any failure, including the final flush, is reported against `path`.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let file = File::create(path).map_err(|e| CuError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line).map_err(|e| CuError::write(path, e))?;
    }
    writer.flush().map_err(|e| CuError::write(path, e))?;
    Ok(())
}

/// Years to write: the requested period, or the union of the location periods
pub fn output_period(
    requested: Option<(i32, i32)>,
    periods: impl IntoIterator<Item = (i32, i32)>,
) -> Option<(i32, i32)> {
    if requested.is_some() {
        return requested;
    }
    periods
        .into_iter()
        .reduce(|(a1, a2), (b1, b2)| (a1.min(b1), a2.max(b2)))
}

/// Generated line naming the writing program and time
pub fn written_by_line() -> String {
    format!(
        "Written by {} {} on {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}
