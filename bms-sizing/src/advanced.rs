//! Advanced sizing chain.
//!
//! Turns a base usable capacity into a full pack design by applying, in order:
//! pack losses, cell divergence, string redundancy, ageing and temperature
//! derates, and an anomaly reserve. The final capacity is then laid out in
//! cells, checked against the cells' current limits, and summarized as seven
//! named requirements.
//!
//! Use [`compute_advanced`] with raw [`AuxiliaryParameters`], or validate once
//! into an [`AdvancedConfig`] and call [`size_advanced`] repeatedly.

mod cell;
mod limits;
mod params;
mod requirements;
mod sizing;

use bms_core::constraint::NonNegative;
use tracing::{debug, warn};
use uom::si::{
    electric_charge::ampere_hour,
    electric_potential::volt,
    energy::watt_hour,
    f64::{ElectricCharge, ElectricPotential, Energy},
};

pub use cell::{CellLevel, PackGeometry, series_cells};
pub use limits::{ChargeDischargeLimits, CurrentLimit, LimitKind, RequirementViolation};
pub use params::{AdvancedConfig, AuxiliaryParameters, RedundancyPolicy};
pub use requirements::{NamedRequirement, RequirementId};
pub use sizing::{SizingSummary, SizingTerm};

use crate::{
    case::SocWindow,
    error::{BmsError, InputIssue},
    snippet::BmsRequirementSnippet,
};

/// Starting point of the advanced chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseCapacity {
    usable_capacity: Energy,
    soc_window: SocWindow,
}

impl BaseCapacity {
    /// Creates a base capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::InvalidInput`] if the capacity is negative or not finite.
    pub fn new(usable_capacity: Energy, soc_window: SocWindow) -> Result<Self, BmsError> {
        let wh = usable_capacity.get::<watt_hour>();
        if wh.is_infinite() {
            return Err(BmsError::invalid_input("base_capacity", InputIssue::NotFinite));
        }
        let usable_capacity = NonNegative::new(usable_capacity)
            .map_err(|issue| BmsError::invalid_input("base_capacity", issue))?
            .into_inner();

        Ok(Self {
            usable_capacity,
            soc_window,
        })
    }

    /// Creates a base capacity from a charge at the given voltage.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::InvalidInput`] if the resulting capacity is invalid.
    pub fn from_charge(
        charge: ElectricCharge,
        voltage: ElectricPotential,
        soc_window: SocWindow,
    ) -> Result<Self, BmsError> {
        Self::new(charge * voltage, soc_window)
    }

    #[must_use]
    pub fn usable_capacity(&self) -> Energy {
        self.usable_capacity
    }

    #[must_use]
    pub fn soc_window(&self) -> SocWindow {
        self.soc_window
    }
}

impl From<&BmsRequirementSnippet> for BaseCapacity {
    fn from(snippet: &BmsRequirementSnippet) -> Self {
        Self {
            usable_capacity: snippet.usable_capacity(),
            soc_window: snippet.soc_window(),
        }
    }
}

/// Output of the advanced sizing chain.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedSizingResult {
    pub sizing_summary: SizingSummary,
    pub cell_level: CellLevel,
    pub limits: ChargeDischargeLimits,
    pub requirements: [NamedRequirement; 7],
    /// Current limits exceeded by the requested C-rates, charge first.
    pub violations: Vec<RequirementViolation>,
}

impl AdvancedSizingResult {
    /// Returns `self` if no current limit was exceeded.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::RequirementViolation`] for the first exceeded limit.
    pub fn ensure_within_bounds(self) -> Result<Self, BmsError> {
        match self.violations.first() {
            Some(violation) => Err((*violation).into()),
            None => Ok(self),
        }
    }
}

/// Validates `params` and runs the sizing chain.
///
/// # Errors
///
/// Returns [`BmsError::Configuration`] naming the first missing or invalid
/// parameter, or the parameter whose cell layout is too large to count.
pub fn compute_advanced(
    base: &BaseCapacity,
    params: &AuxiliaryParameters,
) -> Result<AdvancedSizingResult, BmsError> {
    let config = AdvancedConfig::try_from(params)?;
    size_advanced(base, &config)
}

/// Runs the sizing chain with an already validated configuration.
///
/// Exceeded current limits do not fail the chain; they are clamped and listed
/// in [`AdvancedSizingResult::violations`].
///
/// # Errors
///
/// Returns [`BmsError::Configuration`] if the series or parallel cell count
/// does not fit in a `u32`.
pub fn size_advanced(
    base: &BaseCapacity,
    config: &AdvancedConfig,
) -> Result<AdvancedSizingResult, BmsError> {
    let geometry = PackGeometry::from_config(config)?;
    debug!(
        series = geometry.series,
        pack_voltage_v = geometry.pack_nominal_voltage.get::<volt>(),
        "derived pack geometry"
    );

    let sizing_summary = sizing::size_capacity(base.usable_capacity, &geometry, config)?;
    let cell_level = cell::cell_level(sizing_summary.final_charge, &geometry, config)?;
    debug!(
        string_config = %cell_level.string_config,
        cell_count = cell_level.cell_count,
        pack_capacity_ah = cell_level.pack_capacity.get::<ampere_hour>(),
        "laid out cells"
    );

    let limits = ChargeDischargeLimits::new(&cell_level, config);
    let violations: Vec<_> = limits.violations().collect();
    for violation in &violations {
        warn!(%violation, "requirement violation");
    }

    let requirements =
        requirements::named_requirements(&sizing_summary, &base.soc_window, &limits, config);

    Ok(AdvancedSizingResult {
        sizing_summary,
        cell_level,
        limits,
        requirements,
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::electric_current::ampere;

    use crate::{MissionInputs, base::calculate, case::CaseRegistry, error::ConfigIssue};

    fn snippet() -> BmsRequirementSnippet {
        let inputs = MissionInputs::new(90.0, 35.0, 200.0, 28.0).unwrap();
        let case = CaseRegistry::builtin().get("short_lived_high_power").unwrap();
        calculate(&inputs, case).unwrap()
    }

    fn params() -> AuxiliaryParameters {
        AuxiliaryParameters {
            target_pack_voltage_v: Some(28.0),
            ..AuxiliaryParameters::recommended()
        }
    }

    #[test]
    fn chain_from_snippet() {
        let base = BaseCapacity::from(&snippet());
        let result = compute_advanced(&base, &params()).unwrap();

        assert_relative_eq!(
            result.sizing_summary.final_capacity.get::<watt_hour>(),
            338.15,
            epsilon = 0.01
        );
        assert_eq!(result.cell_level.string_config, "8s3p");
        assert!(result.violations.is_empty());

        let ids: Vec<_> = result.requirements.iter().map(|r| r.id).collect();
        assert_eq!(ids, RequirementId::ALL);
        assert_relative_eq!(result.requirements[0].value, 338.15);
        assert_relative_eq!(result.requirements[2].value, 20.0);
        assert_relative_eq!(result.requirements[5].value, 1.0);
    }

    #[test]
    fn violations_become_errors_on_request() {
        let base = BaseCapacity::from(&snippet());
        let params = AuxiliaryParameters {
            charge_c_rate: Some(1.5),
            ..params()
        };
        let result = compute_advanced(&base, &params).unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_relative_eq!(result.requirements[3].value, 15.0);

        let err = result.ensure_within_bounds().unwrap_err();
        let BmsError::RequirementViolation(violation) = err else {
            panic!("expected a requirement violation, got {err:?}");
        };
        assert_eq!(violation.limit, LimitKind::Charge);
        assert_relative_eq!(violation.requested.get::<ampere>(), 22.5, epsilon = 1e-9);
    }

    #[test]
    fn missing_parameter_is_reported() {
        let base = BaseCapacity::from(&snippet());
        let err = compute_advanced(&base, &AuxiliaryParameters::recommended()).unwrap_err();
        assert!(matches!(
            err,
            BmsError::Configuration {
                field: "target_pack_voltage_v",
                ..
            }
        ));
    }

    #[test]
    fn base_capacity_rejects_negative_energy() {
        let window = snippet().soc_window();
        let err = BaseCapacity::new(Energy::new::<watt_hour>(-1.0), window).unwrap_err();
        assert!(matches!(
            err,
            BmsError::InvalidInput {
                field: "base_capacity",
                ..
            }
        ));
    }

    #[test]
    fn base_capacity_from_charge() {
        let window = snippet().soc_window();
        let base = BaseCapacity::from_charge(
            ElectricCharge::new::<ampere_hour>(5.0),
            ElectricPotential::new::<volt>(28.0),
            window,
        )
        .unwrap();
        assert_relative_eq!(base.usable_capacity().get::<watt_hour>(), 140.0, epsilon = 1e-9);
    }

    #[test]
    fn larger_base_never_shrinks_the_pack() {
        let config = AdvancedConfig::try_from(params()).unwrap();
        let window = snippet().soc_window();

        let mut previous: Option<AdvancedSizingResult> = None;
        for wh in [50.0, 150.0, 400.0, 900.0, 2000.0] {
            let base = BaseCapacity::new(Energy::new::<watt_hour>(wh), window).unwrap();
            let result = size_advanced(&base, &config).unwrap();
            if let Some(previous) = &previous {
                assert!(result.sizing_summary.final_capacity > previous.sizing_summary.final_capacity);
                assert!(result.cell_level.cell_count >= previous.cell_level.cell_count);
            }
            previous = Some(result);
        }
    }

    #[test]
    fn uncountable_cell_layouts_fail_cleanly() {
        let inputs = MissionInputs::new(90.0, 90.0, 1e9, 28.0).unwrap();
        let case = CaseRegistry::builtin().get("short_lived_high_power").unwrap();
        let base = BaseCapacity::from(&calculate(&inputs, case).unwrap());

        let tiny_cells = AuxiliaryParameters {
            cell_nominal_capacity_ah: Some(0.001),
            ..params()
        };
        let huge_target = AuxiliaryParameters {
            target_pack_voltage_v: Some(1e12),
            cell_nominal_voltage_v: Some(1.0),
            eocv_per_cell_v: Some(1.2),
            eodv_per_cell_v: Some(0.9),
            ..params()
        };
        let runaway_loss = AuxiliaryParameters {
            pack_loss_pct: Some(1e308),
            ..params()
        };

        for (params, field) in [
            (tiny_cells, "cell_nominal_capacity_ah"),
            (huge_target, "target_pack_voltage_v"),
            (runaway_loss, "cell_nominal_capacity_ah"),
        ] {
            let err = compute_advanced(&base, &params).unwrap_err();
            assert_eq!(
                err,
                BmsError::Configuration {
                    field,
                    issue: ConfigIssue::LayoutTooLarge,
                }
            );
        }
    }
}
