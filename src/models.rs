//! Core data types shared by the readers, aggregates and registry.
//!
//! Defines the component kinds a model dataset is made of, parcel
//! observations used for data filling, and the small enums describing
//! water supply and irrigation method.

use crate::format::layout::FileKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Group a component belongs to in a model dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentGroup {
    CuLocations,
}

impl ComponentGroup {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentGroup::CuLocations => "CU Locations",
        }
    }
}

/// Component kinds handled by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    CropPatternTs,
    IrrigationPracticeTs,
}

/// Static metadata for a component kind
#[derive(Debug)]
pub struct ComponentInfo {
    pub kind: ComponentKind,
    pub name: &'static str,
    pub group: ComponentGroup,
    pub file_extension: &'static str,
    pub file_kind: FileKind,
}

/// Metadata for every component kind, one row per kind
pub const COMPONENTS: &[ComponentInfo] = &[
    ComponentInfo {
        kind: ComponentKind::CropPatternTs,
        name: "CU Crop Patterns (Yearly)",
        group: ComponentGroup::CuLocations,
        file_extension: "cds",
        file_kind: FileKind::CropPattern,
    },
    ComponentInfo {
        kind: ComponentKind::IrrigationPracticeTs,
        name: "CU Irrigation Practice (Yearly)",
        group: ComponentGroup::CuLocations,
        file_extension: "ipy",
        file_kind: FileKind::IrrigationPractice,
    },
];

impl ComponentKind {
    pub fn info(&self) -> &'static ComponentInfo {
        match self {
            ComponentKind::CropPatternTs => &COMPONENTS[0],
            ComponentKind::IrrigationPracticeTs => &COMPONENTS[1],
        }
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    pub fn group(&self) -> ComponentGroup {
        self.info().group
    }

    pub fn file_extension(&self) -> &'static str {
        self.info().file_extension
    }

    pub fn file_kind(&self) -> FileKind {
        self.info().file_kind
    }

    /// Detect the component kind from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        COMPONENTS
            .iter()
            .find(|info| info.file_extension == extension)
            .map(|info| info.kind)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Water supply source of irrigated land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplyType {
    /// Surface water only
    Surface,
    /// Groundwater, possibly supplementing surface water
    Groundwater,
}

impl fmt::Display for SupplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplyType::Surface => f.write_str("surface"),
            SupplyType::Groundwater => f.write_str("groundwater"),
        }
    }
}

/// Water application method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrrigationMethod {
    Flood,
    Sprinkler,
}

impl fmt::Display for IrrigationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrrigationMethod::Flood => f.write_str("flood"),
            IrrigationMethod::Sprinkler => f.write_str("sprinkler"),
        }
    }
}

/// Groundwater use mode code carried in irrigation practice files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundwaterMode {
    /// Groundwater used to maximize supply
    Maximize = 1,
    /// Groundwater used only to meet shortages after surface water
    Supplement = 2,
    /// Sprinkler acreage served by groundwater only
    SprinklerOnly = 3,
}

impl GroundwaterMode {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Maximize),
            2 => Some(Self::Supplement),
            3 => Some(Self::SprinklerOnly),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// Raw parcel observation kept for downstream data filling.
///
/// These are never adjusted by the reconciliation algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelObservation {
    pub year: i32,
    pub parcel_id: String,
    pub crop: String,
    pub area: f64,
    pub has_surface_supply: bool,
    pub has_groundwater_supply: bool,
    pub method: IrrigationMethod,
}

impl ParcelObservation {
    pub fn new(
        year: i32,
        parcel_id: impl Into<String>,
        crop: impl Into<String>,
        area: f64,
        method: IrrigationMethod,
    ) -> Self {
        Self {
            year,
            parcel_id: parcel_id.into(),
            crop: crop.into(),
            area,
            has_surface_supply: false,
            has_groundwater_supply: false,
            method,
        }
    }

    pub fn with_surface_supply(mut self) -> Self {
        self.has_surface_supply = true;
        self
    }

    pub fn with_groundwater_supply(mut self) -> Self {
        self.has_groundwater_supply = true;
        self
    }

    /// Supply classification: any groundwater makes the parcel groundwater-supplied
    pub fn supply_type(&self) -> SupplyType {
        if self.has_groundwater_supply {
            SupplyType::Groundwater
        } else {
            SupplyType::Surface
        }
    }
}
