//! Loading a set of component files as one data set.
//!
//! A registry hands over `(path, kind)` pairs; each file is read on its own
//! and a failure in one file never stops the others. Files that fail part
//! way keep whatever locations were read before the error.

use crate::config::ReadOptions;
use crate::crop_pattern::{CropPatternTs, read_crop_pattern_file};
use crate::error::{CuError, ReadOutcome, Result};
use crate::format::LocationFile;
use crate::irrigation::{IrrigationPracticeTs, read_irrigation_practice_file};
use crate::models::{COMPONENTS, ComponentKind};
use crate::validation::{Problem, validate_all};
use glob::{MatchOptions, glob_with};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parsed component files, grouped by kind
#[derive(Debug, Default)]
pub struct DataSet {
    pub crop_patterns: Vec<LocationFile<CropPatternTs>>,
    pub irrigation_practices: Vec<LocationFile<IrrigationPracticeTs>>,
}

impl DataSet {
    /// Read every listed file.
    ///
    /// Returns the data set together with one error per file that could not
    /// be read completely.
    pub fn load(files: &[(PathBuf, ComponentKind)], options: &ReadOptions) -> (Self, Vec<CuError>) {
        let mut data_set = Self::default();
        let errors: Vec<CuError> = files
            .iter()
            .filter_map(|(path, kind)| data_set.load_file(path, *kind, options))
            .collect();

        info!(
            "Loaded {} files ({} locations), {} errors",
            data_set.file_count(),
            data_set.location_count(),
            errors.len()
        );
        (data_set, errors)
    }

    /// Read one file into the data set, returning the error that stopped it
    pub fn load_file(
        &mut self,
        path: &Path,
        kind: ComponentKind,
        options: &ReadOptions,
    ) -> Option<CuError> {
        debug!("Loading {} as {}", path.display(), kind);
        let mut error = None;
        match kind {
            ComponentKind::CropPatternTs => {
                if let Some(file) = keep(read_crop_pattern_file(path, options), &mut error) {
                    self.crop_patterns.push(file);
                }
            }
            ComponentKind::IrrigationPracticeTs => {
                if let Some(file) = keep(read_irrigation_practice_file(path, options), &mut error)
                {
                    self.irrigation_practices.push(file);
                }
            }
        }
        error
    }

    pub fn file_count(&self) -> usize {
        self.crop_patterns.len() + self.irrigation_practices.len()
    }

    pub fn location_count(&self) -> usize {
        self.crop_patterns
            .iter()
            .map(|f| f.locations.len())
            .chain(self.irrigation_practices.iter().map(|f| f.locations.len()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }

    /// Validate every file against the dialect it was read in
    pub fn validate(&self) -> Vec<(PathBuf, Problem)> {
        fn tag(path: &Path, problems: Vec<Problem>) -> impl Iterator<Item = (PathBuf, Problem)> {
            let path = path.to_path_buf();
            problems.into_iter().map(move |p| (path.clone(), p))
        }

        let crop = self
            .crop_patterns
            .iter()
            .flat_map(|f| tag(&f.path, validate_all(&f.locations, f.dialect)));
        let irrigation = self
            .irrigation_practices
            .iter()
            .flat_map(|f| tag(&f.path, validate_all(&f.locations, f.dialect)));
        crop.chain(irrigation).collect()
    }
}

/// Keep a file's data when it was read at least in part
fn keep<T>(
    result: Result<ReadOutcome<LocationFile<T>>>,
    error: &mut Option<CuError>,
) -> Option<LocationFile<T>> {
    match result {
        Ok(outcome) => {
            if let Some(e) = outcome.error {
                warn!(
                    "{}: keeping {} locations read before: {}",
                    outcome.data.path.display(),
                    outcome.data.locations.len(),
                    e
                );
                *error = Some(e);
            }
            Some(outcome.data)
        }
        Err(e) => {
            warn!("{}", e);
            *error = Some(e);
            None
        }
    }
}

/// Find component files under a directory by extension.
///
/// Extensions are matched without regard to case. Results are sorted.
pub fn discover(dir: &Path) -> Result<Vec<(PathBuf, ComponentKind)>> {
    if !dir.is_dir() {
        return Err(CuError::configuration(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    let mut found = Vec::new();
    for info in COMPONENTS {
        let pattern = dir
            .join("**")
            .join(format!("*.{}", info.file_extension));
        let pattern = pattern.to_string_lossy();
        debug!("Searching {}", pattern);

        let paths = glob_with(&pattern, options)
            .map_err(|e| CuError::configuration(format!("bad search pattern {}: {}", pattern, e)))?;
        for entry in paths {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                CuError::io(path, e.into_error())
            })?;
            if path.is_file() {
                found.push((path, info.kind));
            }
        }
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    found.dedup();

    debug!("Found {} component files in {}", found.len(), dir.display());
    Ok(found)
}

/// Expand file names and glob patterns into component files.
///
/// Plain paths are kept even when they do not exist, so the read reports
/// the error. Paths whose extension names no component are an error.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<(PathBuf, ComponentKind)>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let is_pattern = pattern.contains(['*', '?', '[']);
        let paths: Vec<PathBuf> = if is_pattern {
            glob_with(pattern, MatchOptions::new())
                .map_err(|e| {
                    CuError::configuration(format!("bad file pattern {}: {}", pattern, e))
                })?
                .filter_map(|entry| entry.ok())
                .collect()
        } else {
            vec![PathBuf::from(pattern)]
        };
        if paths.is_empty() {
            warn!("No files match {}", pattern);
        }
        for path in paths {
            let kind = ComponentKind::from_path(&path).ok_or_else(|| {
                CuError::configuration(format!(
                    "{}: unknown file type, expected one of {}",
                    path.display(),
                    known_extensions()
                ))
            })?;
            files.push((path, kind));
        }
    }
    Ok(files)
}

fn known_extensions() -> String {
    COMPONENTS
        .iter()
        .map(|info| format!(".{}", info.file_extension))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CROP_PATTERN: &str = concat!(
        "  1950  1950 ACRE  CYR\n",
        "1950 0100501          100.    1\n",
        "     ALFALFA             1.000\n",
    );

    /// Create a directory with one file of each kind plus a stray file
    fn create_test_directory() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("basin.cds"), CROP_PATTERN).unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("basin.IPY"), "# empty\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a component").unwrap();
        dir
    }

    #[test]
    fn test_discover_by_extension() {
        let dir = create_test_directory();
        let found = discover(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].1, ComponentKind::CropPatternTs);
        assert_eq!(found[1].1, ComponentKind::IrrigationPracticeTs);
        assert!(found[1].0.ends_with("nested/basin.IPY"));
    }

    #[test]
    fn test_discover_missing_directory() {
        let err = discover(Path::new("/nonexistent/cu-data")).unwrap_err();
        assert!(matches!(err, CuError::Configuration { .. }));
    }

    #[test]
    fn test_load_keeps_good_files_and_reports_bad_ones() {
        let dir = create_test_directory();
        let files = discover(dir.path()).unwrap();
        let (data_set, errors) = DataSet::load(&files, &ReadOptions::default());

        assert_eq!(data_set.file_count(), 1);
        assert_eq!(data_set.location_count(), 1);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CuError::Format { .. }));
        assert!(data_set.validate().is_empty());
    }

    #[test]
    fn test_expand_patterns() {
        let dir = create_test_directory();
        let pattern = dir.path().join("*.cds").to_string_lossy().to_string();
        let files = expand_patterns(&[pattern, "other.ipy".to_string()]).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1], (PathBuf::from("other.ipy"), ComponentKind::IrrigationPracticeTs));

        let err = expand_patterns(&["notes.txt".to_string()]).unwrap_err();
        assert!(matches!(err, CuError::Configuration { .. }));
    }
}
