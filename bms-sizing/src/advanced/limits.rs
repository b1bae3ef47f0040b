use std::fmt;

use thiserror::Error;
use uom::si::{
    electric_current::ampere,
    f64::{ElectricCurrent, ElectricPotential},
};

use crate::{
    advanced::{AdvancedConfig, cell::CellLevel},
    units::CRate,
};

const TAPER_NOTE: &str = "Charge in constant current up to the pack EOCV, then hold constant \
                          voltage until the current tapers below 0.05 C.";

/// Direction of a current limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKind {
    Charge,
    Discharge,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Charge => "charge",
            Self::Discharge => "discharge",
        })
    }
}

/// A requested pack current checked against the cells' hard limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentLimit {
    pub kind: LimitKind,
    pub c_rate: CRate,
    /// Current implied by the C-rate and the pack capacity.
    pub requested: ElectricCurrent,
    /// Per-cell maximum times the number of parallel strings.
    pub bound: ElectricCurrent,
}

impl CurrentLimit {
    fn new(kind: LimitKind, c_rate: CRate, cells: &CellLevel, cell_max: ElectricCurrent) -> Self {
        Self {
            kind,
            c_rate,
            requested: c_rate.current_for(cells.pack_capacity),
            bound: cell_max * f64::from(cells.parallel),
        }
    }

    /// The requested current, capped at the bound.
    #[must_use]
    pub fn clamped(&self) -> ElectricCurrent {
        if self.requested > self.bound {
            self.bound
        } else {
            self.requested
        }
    }

    #[must_use]
    pub fn is_violated(&self) -> bool {
        self.requested > self.bound
    }

    /// Returns the violation, if the requested current exceeds the bound.
    #[must_use]
    pub fn violation(&self) -> Option<RequirementViolation> {
        self.is_violated().then_some(RequirementViolation {
            limit: self.kind,
            requested: self.requested,
            bound: self.bound,
        })
    }
}

/// A requested current that exceeds what the cells can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error(
    "{limit} current of {requested_a:.2} A exceeds the cell limit of {bound_a:.2} A",
    requested_a = .requested.get::<ampere>(),
    bound_a = .bound.get::<ampere>()
)]
pub struct RequirementViolation {
    pub limit: LimitKind,
    pub requested: ElectricCurrent,
    pub bound: ElectricCurrent,
}

/// Charge and discharge limits of the sized pack.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeDischargeLimits {
    pub charge: CurrentLimit,
    pub discharge: CurrentLimit,
    /// End-of-charge pack voltage.
    pub eocv_pack: ElectricPotential,
    /// End-of-discharge pack voltage.
    pub eodv_pack: ElectricPotential,
    pub taper_note: &'static str,
}

impl ChargeDischargeLimits {
    /// Derives the limits for `cells` under `config`.
    #[must_use]
    pub fn new(cells: &CellLevel, config: &AdvancedConfig) -> Self {
        let series = f64::from(cells.series);
        Self {
            charge: CurrentLimit::new(
                LimitKind::Charge,
                config.charge_c_rate(),
                cells,
                config.cell_max_charge_current(),
            ),
            discharge: CurrentLimit::new(
                LimitKind::Discharge,
                config.discharge_c_rate(),
                cells,
                config.cell_max_discharge_current(),
            ),
            eocv_pack: config.eocv_per_cell() * series,
            eodv_pack: config.eodv_per_cell() * series,
            taper_note: TAPER_NOTE,
        }
    }

    /// Violated limits, charge first.
    pub fn violations(&self) -> impl Iterator<Item = RequirementViolation> + '_ {
        [&self.charge, &self.discharge]
            .into_iter()
            .filter_map(CurrentLimit::violation)
    }
}
