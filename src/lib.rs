//! CU Acreage Library
//!
//! Reads, reconciles and writes the fixed-column crop pattern (`.cds`) and
//! irrigation practice (`.ipy`) time series files used by consumptive-use
//! water planning models.
//!
//! This library provides tools for:
//! - Detecting the file dialect (no period header, version 10, version 12+)
//! - Parsing fixed-column records into per-location aggregates
//! - Keeping crop totals and irrigation acreage hierarchies consistent
//! - Writing aggregates back in any dialect with a generated header
//! - Validating aggregates against the precision of the written files

pub mod config;
pub mod constants;
pub mod crop_pattern;
pub mod dataset;
pub mod error;
pub mod format;
pub mod header;
pub mod irrigation;
pub mod models;
pub mod series;
pub mod validation;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{ReadDataFrom, ReadOptions, WriteOptions};
pub use crop_pattern::CropPatternTs;
pub use dataset::DataSet;
pub use error::{CuError, ReadOutcome, Result};
pub use format::{Dialect, FileKind, LocationFile};
pub use irrigation::{IrrigationPracticeTs, PracticeSeries};
pub use models::{ComponentKind, GroundwaterMode, IrrigationMethod, ParcelObservation, SupplyType};
pub use series::AnnualSeries;
pub use validation::{Problem, Severity, Validate};
