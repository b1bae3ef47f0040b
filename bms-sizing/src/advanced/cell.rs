use uom::si::{
    electric_charge::ampere_hour,
    f64::{ElectricCharge, ElectricPotential, Energy},
};

use crate::{
    advanced::AdvancedConfig,
    error::{BmsError, ConfigIssue},
    units::ceil_count,
};

/// Series arrangement of the pack, fixed by the target voltage.
///
/// Every cell string has `series` cells, so each string supplies
/// `pack_nominal_voltage` and one cell's worth of charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackGeometry {
    pub series: u32,
    pub pack_nominal_voltage: ElectricPotential,
    pub string_capacity: ElectricCharge,
}

impl PackGeometry {
    /// Derives the geometry from the cell and target pack voltages.
    ///
    /// The cell count per string is rounded up so the pack never falls short
    /// of the target voltage.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::Configuration`] if the string needs more cells than
    /// can be counted.
    pub fn from_config(config: &AdvancedConfig) -> Result<Self, BmsError> {
        let series = series_cells(config.target_pack_voltage(), config.cell_nominal_voltage())
            .ok_or_else(|| layout_too_large("target_pack_voltage_v"))?;
        Ok(Self {
            series,
            pack_nominal_voltage: config.cell_nominal_voltage() * f64::from(series),
            string_capacity: config.cell_nominal_capacity(),
        })
    }

    /// Converts an energy to charge at the pack nominal voltage.
    #[must_use]
    pub fn charge(&self, energy: Energy) -> ElectricCharge {
        energy / self.pack_nominal_voltage
    }

    /// Energy stored by one cell string.
    #[must_use]
    pub fn string_energy(&self) -> Energy {
        self.string_capacity * self.pack_nominal_voltage
    }

    /// Number of parallel strings needed to hold `charge`.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::Configuration`] if `charge` is not finite or needs
    /// more strings than can be counted.
    pub fn strings_for(&self, charge: ElectricCharge) -> Result<u32, BmsError> {
        ceil_count(charge.get::<ampere_hour>() / self.string_capacity.get::<ampere_hour>())
            .ok_or_else(|| layout_too_large("cell_nominal_capacity_ah"))
    }
}

/// Cells in series needed to reach `target` with cells of `cell` voltage.
///
/// Returns `None` if the count does not fit in a `u32`.
#[must_use]
pub fn series_cells(target: ElectricPotential, cell: ElectricPotential) -> Option<u32> {
    ceil_count((target / cell).value).map(|series| series.max(1))
}

fn layout_too_large(field: &'static str) -> BmsError {
    BmsError::configuration(field, ConfigIssue::LayoutTooLarge)
}

/// Cell-level description of the sized pack.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLevel {
    pub series: u32,
    pub parallel: u32,
    pub cell_count: u32,
    /// Arrangement such as `8s3p`.
    pub string_config: String,
    pub cell_capacity: ElectricCharge,
    pub cell_nominal_voltage: ElectricPotential,
    pub pack_nominal_voltage: ElectricPotential,
    /// Beginning-of-life pack capacity.
    pub pack_capacity: ElectricCharge,
    pub eol_factor: f64,
    pub pack_capacity_eol: ElectricCharge,
}

/// Lays out cells to hold `final_charge`.
///
/// Parallel strings absorb the capacity and series cells set the voltage, so
/// `pack_capacity = cell_count * cell_capacity / series`. At least one string
/// is always present.
///
/// # Errors
///
/// Returns [`BmsError::Configuration`] if the total cell count does not fit in
/// a `u32`.
pub fn cell_level(
    final_charge: ElectricCharge,
    geometry: &PackGeometry,
    config: &AdvancedConfig,
) -> Result<CellLevel, BmsError> {
    let series = geometry.series;
    let parallel = geometry.strings_for(final_charge)?.max(1);
    let cell_count = series
        .checked_mul(parallel)
        .ok_or_else(|| layout_too_large("cell_nominal_capacity_ah"))?;
    let cell_capacity = config.cell_nominal_capacity();
    let pack_capacity = cell_capacity * f64::from(cell_count) / f64::from(series);

    Ok(CellLevel {
        series,
        parallel,
        cell_count,
        string_config: format!("{series}s{parallel}p"),
        cell_capacity,
        cell_nominal_voltage: config.cell_nominal_voltage(),
        pack_nominal_voltage: geometry.pack_nominal_voltage,
        pack_capacity,
        eol_factor: config.eol_factor(),
        pack_capacity_eol: pack_capacity * config.eol_factor(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{electric_potential::volt, energy::watt_hour};

    use crate::advanced::AuxiliaryParameters;

    fn config(target_v: f64) -> AdvancedConfig {
        AdvancedConfig::try_from(AuxiliaryParameters {
            target_pack_voltage_v: Some(target_v),
            ..AuxiliaryParameters::recommended()
        })
        .unwrap()
    }

    #[test]
    fn series_count_rounds_up() {
        let v = ElectricPotential::new::<volt>;
        assert_eq!(series_cells(v(28.0), v(3.6)), Some(8));
        assert_eq!(series_cells(v(28.8), v(3.6)), Some(8));
        assert_eq!(series_cells(v(29.0), v(3.6)), Some(9));
        assert_eq!(series_cells(v(2.0), v(3.6)), Some(1));
        assert_eq!(series_cells(v(1e12), v(1.0)), None);
    }

    #[test]
    fn geometry_from_recommended_cells() {
        let geometry = PackGeometry::from_config(&config(28.0)).unwrap();
        assert_eq!(geometry.series, 8);
        assert_relative_eq!(geometry.pack_nominal_voltage.get::<volt>(), 28.8, epsilon = 1e-12);
        assert_relative_eq!(geometry.string_energy().get::<watt_hour>(), 144.0, epsilon = 1e-9);
    }

    #[test]
    fn parallel_strings_hold_the_final_charge() {
        let config = config(28.0);
        let geometry = PackGeometry::from_config(&config).unwrap();
        let cells =
            cell_level(ElectricCharge::new::<ampere_hour>(11.74), &geometry, &config).unwrap();

        assert_eq!(cells.parallel, 3);
        assert_eq!(cells.cell_count, 24);
        assert_eq!(cells.string_config, "8s3p");
        assert_relative_eq!(cells.pack_capacity.get::<ampere_hour>(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(cells.pack_capacity_eol.get::<ampere_hour>(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_requirement_keeps_one_string() {
        let config = config(28.0);
        let geometry = PackGeometry::from_config(&config).unwrap();
        let cells =
            cell_level(ElectricCharge::new::<ampere_hour>(0.0), &geometry, &config).unwrap();

        assert_eq!(cells.parallel, 1);
        assert_eq!(cells.cell_count, 8);
    }

    #[test]
    fn uncountable_layouts_are_configuration_errors() {
        let err = PackGeometry::from_config(&config(1e12)).unwrap_err();
        assert_eq!(
            err,
            BmsError::Configuration {
                field: "target_pack_voltage_v",
                issue: ConfigIssue::LayoutTooLarge,
            }
        );

        let config = config(28.0);
        let geometry = PackGeometry::from_config(&config).unwrap();
        for ah in [1e12, 3e9, f64::INFINITY] {
            let err = cell_level(ElectricCharge::new::<ampere_hour>(ah), &geometry, &config)
                .unwrap_err();
            assert!(matches!(
                err,
                BmsError::Configuration {
                    issue: ConfigIssue::LayoutTooLarge,
                    ..
                }
            ));
        }
    }
}
