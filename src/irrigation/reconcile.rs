//! Reconciliation of irrigation practice acreage.
//!
//! Acreage forms a hierarchy: the total splits into a surface-only and a
//! groundwater subtotal, and each subtotal splits into flood and sprinkler
//! parts. After one level changes, the algorithms here bring the levels
//! below it back in line. Each one is idempotent: applying it to an already
//! consistent year changes nothing.
//!
//! Groundwater is only ever lowered to fit the total, never raised, unless
//! the location is groundwater-only. Surface acreage absorbs the rest.

use super::{IrrigationPracticeTs, PracticeSeries};
use crate::constants::{FORMAT_PRECISION_TOLERANCE, ZERO_TOLERANCE};
use crate::models::{IrrigationMethod, SupplyType};
use tracing::{debug, info, warn};

/// Relative difference below which parts already match their subtotal
const CONSISTENT_RELATIVE_TOLERANCE: f64 = 1e-9;

/// What [`IrrigationPracticeTs::reconcile_parts`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartOutcome {
    /// Subtotal missing, nothing changed
    MissingSubtotal,
    /// Subtotal is zero, both parts set to zero
    ZeroedParts,
    /// Both parts missing, nothing to prorate from
    NoPartsToProrate,
    /// Parts already add up to the subtotal
    Unchanged,
    /// Parts scaled to the subtotal keeping their ratio
    Prorated,
    /// Both parts were zero, subtotal split 50/50
    SplitEvenly,
    /// One part missing, filled with the remainder
    FilledMissingPart {
        /// Known part was reduced to the subtotal first
        clamped: bool,
    },
}

/// What [`IrrigationPracticeTs::adjust_surface_to_total_minus_groundwater`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceOutcome {
    /// Groundwater-only location, surface acreage zeroed
    GroundwaterOnly,
    /// Total missing, nothing changed
    MissingTotal,
    /// Surface subtotal set to the target and its parts reconciled
    Reconciled {
        /// Target was negative and clamped to zero
        clamped: bool,
        parts: PartOutcome,
    },
}

/// What [`IrrigationPracticeTs::adjust_groundwater_to_total`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundwaterOutcome {
    /// Total missing, nothing changed
    MissingTotal,
    Adjusted {
        /// Groundwater subtotal was changed
        changed: bool,
        parts: PartOutcome,
        surface: SurfaceOutcome,
    },
}

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= CONSISTENT_RELATIVE_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

impl IrrigationPracticeTs {
    /// Bring the flood and sprinkler parts of one supply in line with its subtotal.
    ///
    /// With both parts known they are prorated by their previous ratio, or
    /// split evenly when both were zero. With one part known it is clamped
    /// to the subtotal and the other part gets the remainder.
    pub fn reconcile_parts(&mut self, year: i32, supply: SupplyType) -> PartOutcome {
        let flood_kind = PracticeSeries::part(supply, IrrigationMethod::Flood);
        let sprinkler_kind = PracticeSeries::part(supply, IrrigationMethod::Sprinkler);

        let Some(subtotal) = self.get(PracticeSeries::subtotal(supply), year) else {
            warn!(
                "{} {}: {} subtotal is missing, cannot reconcile flood and sprinkler parts",
                self.id(),
                year,
                supply
            );
            return PartOutcome::MissingSubtotal;
        };

        if subtotal == 0.0 {
            self.set(flood_kind, year, 0.0);
            self.set(sprinkler_kind, year, 0.0);
            return PartOutcome::ZeroedParts;
        }

        let flood = self.get(flood_kind, year);
        let sprinkler = self.get(sprinkler_kind, year);
        match (flood, sprinkler) {
            (None, None) => {
                warn!(
                    "{} {}: {} flood and sprinkler acreage are both missing, nothing to prorate",
                    self.id(),
                    year,
                    supply
                );
                PartOutcome::NoPartsToProrate
            }
            (Some(flood), Some(sprinkler)) => {
                let sum = flood + sprinkler;
                if nearly_equal(sum, subtotal) {
                    PartOutcome::Unchanged
                } else if sum == 0.0 {
                    self.set(flood_kind, year, subtotal / 2.0);
                    self.set(sprinkler_kind, year, subtotal / 2.0);
                    PartOutcome::SplitEvenly
                } else {
                    self.set(flood_kind, year, subtotal * (flood / sum));
                    self.set(sprinkler_kind, year, subtotal * (sprinkler / sum));
                    PartOutcome::Prorated
                }
            }
            (known, _) => {
                let (known_kind, missing_kind, known) = match known {
                    Some(flood) => (flood_kind, sprinkler_kind, flood),
                    None => (sprinkler_kind, flood_kind, sprinkler.unwrap_or(0.0)),
                };
                let clamped = known > subtotal;
                let known = if clamped {
                    info!(
                        "{} {}: reducing {} from {} to {} subtotal {}",
                        self.id(),
                        year,
                        known_kind,
                        known,
                        supply,
                        subtotal
                    );
                    self.set(known_kind, year, subtotal);
                    subtotal
                } else {
                    known
                };
                self.set(missing_kind, year, subtotal - known);
                PartOutcome::FilledMissingPart { clamped }
            }
        }
    }

    /// Fit the groundwater subtotal to the total, then cascade.
    ///
    /// A groundwater-only location has its groundwater forced to the total.
    /// Otherwise groundwater is only lowered when it exceeds the total.
    /// The groundwater parts and then the surface acreage are reconciled.
    pub fn adjust_groundwater_to_total(&mut self, year: i32, gw_only: bool) -> GroundwaterOutcome {
        let Some(total) = self.total(year) else {
            warn!(
                "{} {}: total acreage is missing, cannot adjust groundwater acreage",
                self.id(),
                year
            );
            return GroundwaterOutcome::MissingTotal;
        };

        let groundwater = self.groundwater(year);
        let mut changed = false;
        if gw_only {
            if let Some(previous) = groundwater {
                if (previous - total).abs() > FORMAT_PRECISION_TOLERANCE {
                    info!(
                        "{} {}: groundwater-only location, groundwater acreage {} set to total {}",
                        self.id(),
                        year,
                        previous,
                        total
                    );
                }
            }
            changed = groundwater != Some(total);
            self.set(PracticeSeries::Groundwater, year, total);
        } else if let Some(previous) = groundwater {
            if previous > total {
                debug!(
                    "{} {}: lowering groundwater acreage {} to total {}",
                    self.id(),
                    year,
                    previous,
                    total
                );
                self.set(PracticeSeries::Groundwater, year, total);
                changed = true;
            }
        }

        let parts = if self.groundwater(year).is_some() {
            self.reconcile_parts(year, SupplyType::Groundwater)
        } else {
            PartOutcome::MissingSubtotal
        };
        let surface = self.adjust_surface_to_total_minus_groundwater(year, gw_only);
        GroundwaterOutcome::Adjusted {
            changed,
            parts,
            surface,
        }
    }

    /// Set surface acreage to whatever the total leaves after groundwater.
    ///
    /// Missing groundwater counts as zero. A target within
    /// [`ZERO_TOLERANCE`] of zero is zero, and a negative target is clamped.
    pub fn adjust_surface_to_total_minus_groundwater(
        &mut self,
        year: i32,
        gw_only: bool,
    ) -> SurfaceOutcome {
        if gw_only {
            self.set(PracticeSeries::SurfaceFlood, year, 0.0);
            self.set(PracticeSeries::SurfaceSprinkler, year, 0.0);
            self.set(PracticeSeries::Surface, year, 0.0);
            return SurfaceOutcome::GroundwaterOnly;
        }

        let Some(total) = self.total(year) else {
            warn!(
                "{} {}: total acreage is missing, cannot adjust surface acreage",
                self.id(),
                year
            );
            return SurfaceOutcome::MissingTotal;
        };

        let mut target = total - self.groundwater(year).unwrap_or(0.0);
        if target.abs() < ZERO_TOLERANCE {
            target = 0.0;
        }
        let clamped = target < 0.0;
        if clamped {
            warn!(
                "{} {}: groundwater acreage exceeds total by {}, surface acreage set to zero",
                self.id(),
                year,
                -target
            );
            target = 0.0;
        }

        self.set(PracticeSeries::Surface, year, target);
        let parts = self.reconcile_parts(year, SupplyType::Surface);
        SurfaceOutcome::Reconciled { clamped, parts }
    }

    /// Run the full reconciliation chain for one year
    pub fn reconcile_year(&mut self, year: i32, gw_only: bool) -> GroundwaterOutcome {
        self.adjust_groundwater_to_total(year, gw_only)
    }

    /// Run the full reconciliation chain for every year with a total.
    ///
    /// Returns the number of years reconciled.
    pub fn reconcile_all(&mut self, gw_only: bool) -> usize {
        let (year1, year2) = self.period();
        let mut reconciled = 0;
        for year in year1..=year2 {
            if self.total(year).is_none() {
                debug!("{} {}: no total acreage, skipped", self.id(), year);
                continue;
            }
            self.reconcile_year(year, gw_only);
            reconciled += 1;
        }
        reconciled
    }
}
