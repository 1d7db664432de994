//! Column tables for every supported file layout.
//!
//! Widths and field types live here as data. The tokenizer in
//! [`super::record`] and the writers walk these tables, so supporting a new
//! dialect means adding rows, not control flow.

use crate::error::CuError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Historical file layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Oldest layout: no period header, period inferred from the records
    NoPeriod,
    /// Period header, narrow version 10 records
    V10,
    /// Period header, version 12 and later records
    V12Plus,
}

impl Dialect {
    pub fn has_period_header(&self) -> bool {
        !matches!(self, Dialect::NoPeriod)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::NoPeriod => "legacy (no period header)",
            Dialect::V10 => "version 10",
            Dialect::V12Plus => "version 12+",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = CuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        match value.as_str() {
            "legacy" | "noperiod" | "no-period" | "9" => Ok(Dialect::NoPeriod),
            "10" | "v10" => Ok(Dialect::V10),
            "12" | "13" | "14" | "v12" | "v12+" | "latest" => Ok(Dialect::V12Plus),
            _ => Err(CuError::configuration(format!(
                "Unknown file version '{}' (expected legacy, 10 or 12)",
                s
            ))),
        }
    }
}

/// Kind of file, selecting the column tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    CropPattern,
    IrrigationPractice,
}

/// Field type of one fixed-width column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Blank filler
    Skip,
    /// Left-justified text, trimmed on read
    Text,
    /// Right-justified integer
    Int,
    /// Right-justified real with the given decimal places on write
    Real { precision: usize },
}

/// One fixed-width column
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub width: usize,
    pub field: FieldType,
    pub description: &'static str,
}

const fn skip(width: usize) -> Column {
    Column {
        name: "",
        width,
        field: FieldType::Skip,
        description: "",
    }
}

const fn text(name: &'static str, width: usize, description: &'static str) -> Column {
    Column {
        name,
        width,
        field: FieldType::Text,
        description,
    }
}

const fn int(name: &'static str, width: usize, description: &'static str) -> Column {
    Column {
        name,
        width,
        field: FieldType::Int,
        description,
    }
}

const fn real(
    name: &'static str,
    width: usize,
    precision: usize,
    description: &'static str,
) -> Column {
    Column {
        name,
        width,
        field: FieldType::Real { precision },
        description,
    }
}

/// Ordered columns of one record shape
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout {
    pub columns: &'static [Column],
}

impl RecordLayout {
    /// Total characters of a full-width line
    pub fn width(&self) -> usize {
        self.columns.iter().map(|c| c.width).sum()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns carrying data
    pub fn fields(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| !matches!(c.field, FieldType::Skip))
    }
}

/// Record shapes of one file kind in one dialect
#[derive(Debug)]
pub struct Layout {
    pub kind: FileKind,
    pub dialect: Dialect,
    pub primary: RecordLayout,
    pub detail: Option<RecordLayout>,
}

/// Field names shared by readers and writers
pub mod fields {
    pub const YEAR: &str = "year";
    pub const YEAR1: &str = "year1";
    pub const YEAR2: &str = "year2";
    pub const UNITS: &str = "units";
    pub const YEAR_TYPE: &str = "year_type";
    pub const LOCATION: &str = "id";
    pub const TOTAL: &str = "total";
    pub const COUNT: &str = "count";
    pub const NAME: &str = "name";
    pub const FRACTION: &str = "fraction";
    pub const AREA: &str = "area";
    pub const CEFF: &str = "ceff";
    pub const FEFF: &str = "feff";
    pub const SEFF: &str = "seff";
    pub const SURFACE_FLOOD: &str = "acswfl";
    pub const SURFACE_SPRINKLER: &str = "acswspr";
    pub const GROUNDWATER_FLOOD: &str = "acgwfl";
    pub const GROUNDWATER_SPRINKLER: &str = "acgwspr";
    pub const GROUNDWATER: &str = "acgw";
    pub const SPRINKLER: &str = "acspr";
    pub const PUMPING_MAX: &str = "pumpmax";
    pub const GW_MODE: &str = "gwmode";
}

use fields::*;

/// Fixed-column period header, e.g. `  1950  2005 ACRE  CYR`
pub const PERIOD_HEADER: RecordLayout = RecordLayout {
    columns: &[
        int(YEAR1, 6, "First year of data"),
        int(YEAR2, 6, "Last year of data"),
        skip(1),
        text(UNITS, 5, "Units of acreage values"),
        text(YEAR_TYPE, 4, "Year type (CYR = calendar year)"),
    ],
};

const CDS_V12_PRIMARY: RecordLayout = RecordLayout {
    columns: &[
        int(YEAR, 4, "Year"),
        skip(1),
        text(LOCATION, 12, "CU location identifier"),
        real(TOTAL, 18, 1, "Total crop acreage for the location"),
        int(COUNT, 10, "Number of crop records that follow"),
    ],
};

const CDS_V12_DETAIL: RecordLayout = RecordLayout {
    columns: &[
        skip(5),
        text(NAME, 30, "Crop name"),
        real(FRACTION, 10, 3, "Fraction of total acreage in the crop"),
        real(AREA, 10, 1, "Crop acreage (optional)"),
    ],
};

const CDS_V10_PRIMARY: RecordLayout = RecordLayout {
    columns: &[
        int(YEAR, 4, "Year"),
        skip(1),
        text(LOCATION, 12, "CU location identifier"),
        real(TOTAL, 10, 0, "Total crop acreage for the location"),
        int(COUNT, 5, "Number of crop records that follow"),
    ],
};

const CDS_V10_DETAIL: RecordLayout = RecordLayout {
    columns: &[
        skip(5),
        text(NAME, 20, "Crop name"),
        real(FRACTION, 8, 3, "Fraction of total acreage in the crop"),
        real(AREA, 10, 0, "Crop acreage (optional)"),
    ],
};

const CDS_LEGACY_DETAIL: RecordLayout = RecordLayout {
    columns: &[
        skip(5),
        text(NAME, 20, "Crop name"),
        real(FRACTION, 8, 3, "Fraction of total acreage in the crop"),
    ],
};

const IPY_V12_PRIMARY: RecordLayout = RecordLayout {
    columns: &[
        int(YEAR, 4, "Year"),
        skip(1),
        text(LOCATION, 12, "CU location identifier"),
        real(CEFF, 6, 2, "Maximum surface water conveyance efficiency"),
        real(FEFF, 6, 2, "Maximum flood application efficiency"),
        real(SEFF, 6, 2, "Maximum sprinkler application efficiency"),
        real(SURFACE_FLOOD, 8, 1, "Acreage, surface water only, flood"),
        real(SURFACE_SPRINKLER, 8, 1, "Acreage, surface water only, sprinkler"),
        real(GROUNDWATER_FLOOD, 8, 1, "Acreage, groundwater, flood"),
        real(GROUNDWATER_SPRINKLER, 8, 1, "Acreage, groundwater, sprinkler"),
        real(PUMPING_MAX, 12, 0, "Maximum monthly pumping (ACFT)"),
        int(GW_MODE, 3, "Groundwater use mode (1, 2 or 3)"),
        real(TOTAL, 10, 1, "Total irrigated acreage"),
    ],
};

const IPY_V10_PRIMARY: RecordLayout = RecordLayout {
    columns: &[
        int(YEAR, 4, "Year"),
        skip(1),
        text(LOCATION, 12, "CU location identifier"),
        real(CEFF, 6, 2, "Maximum surface water conveyance efficiency"),
        real(FEFF, 6, 2, "Maximum flood application efficiency"),
        real(SEFF, 6, 2, "Maximum sprinkler application efficiency"),
        real(GROUNDWATER, 8, 0, "Acreage with groundwater supply"),
        real(SPRINKLER, 8, 0, "Acreage irrigated by sprinkler"),
        real(PUMPING_MAX, 12, 0, "Maximum monthly pumping (ACFT)"),
        int(GW_MODE, 3, "Groundwater use mode (1, 2 or 3)"),
        real(TOTAL, 8, 0, "Total irrigated acreage"),
    ],
};

const LAYOUTS: &[Layout] = &[
    Layout {
        kind: FileKind::CropPattern,
        dialect: Dialect::NoPeriod,
        primary: CDS_V10_PRIMARY,
        detail: Some(CDS_LEGACY_DETAIL),
    },
    Layout {
        kind: FileKind::CropPattern,
        dialect: Dialect::V10,
        primary: CDS_V10_PRIMARY,
        detail: Some(CDS_V10_DETAIL),
    },
    Layout {
        kind: FileKind::CropPattern,
        dialect: Dialect::V12Plus,
        primary: CDS_V12_PRIMARY,
        detail: Some(CDS_V12_DETAIL),
    },
    Layout {
        kind: FileKind::IrrigationPractice,
        dialect: Dialect::NoPeriod,
        primary: IPY_V10_PRIMARY,
        detail: None,
    },
    Layout {
        kind: FileKind::IrrigationPractice,
        dialect: Dialect::V10,
        primary: IPY_V10_PRIMARY,
        detail: None,
    },
    Layout {
        kind: FileKind::IrrigationPractice,
        dialect: Dialect::V12Plus,
        primary: IPY_V12_PRIMARY,
        detail: None,
    },
];

/// Look up the layout table for a file kind and dialect
pub fn layout(kind: FileKind, dialect: Dialect) -> &'static Layout {
    let index = match (kind, dialect) {
        (FileKind::CropPattern, Dialect::NoPeriod) => 0,
        (FileKind::CropPattern, Dialect::V10) => 1,
        (FileKind::CropPattern, Dialect::V12Plus) => 2,
        (FileKind::IrrigationPractice, Dialect::NoPeriod) => 3,
        (FileKind::IrrigationPractice, Dialect::V10) => 4,
        (FileKind::IrrigationPractice, Dialect::V12Plus) => 5,
    };
    &LAYOUTS[index]
}
