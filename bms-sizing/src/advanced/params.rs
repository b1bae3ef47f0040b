use std::{fmt, str::FromStr};

use bms_core::constraint::{Constrained, NonNegative, StrictlyPositive, UnitIntervalLeftOpen};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use uom::si::{
    electric_charge::ampere_hour,
    electric_current::ampere,
    electric_potential::volt,
    f64::{ElectricCharge, ElectricCurrent, ElectricPotential, Ratio},
    ratio::{percent, ratio},
};

use crate::{
    error::{BmsError, ConfigIssue},
    units::CRate,
};

/// Raw auxiliary parameters for the advanced sizing chain.
///
/// Every field is optional so that the bundle can be deserialized from a
/// partial file and merged with [`AuxiliaryParameters::recommended`].
/// Validation into an [`AdvancedConfig`] reports the first missing or invalid
/// field by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuxiliaryParameters {
    pub pack_loss_pct: Option<f64>,
    pub cell_divergence_pct: Option<f64>,
    /// `"none"` or `"N+1"`.
    pub redundancy: Option<String>,
    pub ageing_derate_pct: Option<f64>,
    pub temp_derate_pct: Option<f64>,
    pub anomaly_reserve_pct: Option<f64>,
    pub cell_nominal_voltage_v: Option<f64>,
    pub cell_nominal_capacity_ah: Option<f64>,
    pub target_pack_voltage_v: Option<f64>,
    pub charge_c_rate: Option<f64>,
    pub discharge_c_rate: Option<f64>,
    pub cell_max_charge_current_a: Option<f64>,
    pub cell_max_discharge_current_a: Option<f64>,
    pub eol_factor: Option<f64>,
    pub eocv_per_cell_v: Option<f64>,
    pub eodv_per_cell_v: Option<f64>,
}

impl AuxiliaryParameters {
    /// Typical values for a Li-ion pack of 5 Ah, 3.6 V cells.
    ///
    /// `target_pack_voltage_v` is left unset because it depends on the mission;
    /// callers usually fill it with the nominal battery voltage.
    #[must_use]
    pub fn recommended() -> Self {
        Self {
            pack_loss_pct: Some(2.0),
            cell_divergence_pct: Some(3.0),
            redundancy: Some(RedundancyPolicy::NPlusOne.to_string()),
            ageing_derate_pct: Some(10.0),
            temp_derate_pct: Some(5.0),
            anomaly_reserve_pct: Some(5.0),
            cell_nominal_voltage_v: Some(3.6),
            cell_nominal_capacity_ah: Some(5.0),
            target_pack_voltage_v: None,
            charge_c_rate: Some(0.5),
            discharge_c_rate: Some(2.0),
            cell_max_charge_current_a: Some(5.0),
            cell_max_discharge_current_a: Some(10.0),
            eol_factor: Some(0.8),
            eocv_per_cell_v: Some(4.2),
            eodv_per_cell_v: Some(3.0),
        }
    }

    /// Fills every unset field from `fallback`.
    #[must_use]
    pub fn with_fallback(self, fallback: Self) -> Self {
        Self {
            pack_loss_pct: self.pack_loss_pct.or(fallback.pack_loss_pct),
            cell_divergence_pct: self.cell_divergence_pct.or(fallback.cell_divergence_pct),
            redundancy: self.redundancy.or(fallback.redundancy),
            ageing_derate_pct: self.ageing_derate_pct.or(fallback.ageing_derate_pct),
            temp_derate_pct: self.temp_derate_pct.or(fallback.temp_derate_pct),
            anomaly_reserve_pct: self.anomaly_reserve_pct.or(fallback.anomaly_reserve_pct),
            cell_nominal_voltage_v: self
                .cell_nominal_voltage_v
                .or(fallback.cell_nominal_voltage_v),
            cell_nominal_capacity_ah: self
                .cell_nominal_capacity_ah
                .or(fallback.cell_nominal_capacity_ah),
            target_pack_voltage_v: self.target_pack_voltage_v.or(fallback.target_pack_voltage_v),
            charge_c_rate: self.charge_c_rate.or(fallback.charge_c_rate),
            discharge_c_rate: self.discharge_c_rate.or(fallback.discharge_c_rate),
            cell_max_charge_current_a: self
                .cell_max_charge_current_a
                .or(fallback.cell_max_charge_current_a),
            cell_max_discharge_current_a: self
                .cell_max_discharge_current_a
                .or(fallback.cell_max_discharge_current_a),
            eol_factor: self.eol_factor.or(fallback.eol_factor),
            eocv_per_cell_v: self.eocv_per_cell_v.or(fallback.eocv_per_cell_v),
            eodv_per_cell_v: self.eodv_per_cell_v.or(fallback.eodv_per_cell_v),
        }
    }
}

/// How many spare cell strings the pack carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RedundancyPolicy {
    /// No spare string.
    None,
    /// One spare string beyond what the mission requires.
    #[default]
    NPlusOne,
}

impl RedundancyPolicy {
    /// Number of strings added on top of the required count.
    #[must_use]
    pub fn redundant_strings(self) -> u32 {
        match self {
            Self::None => 0,
            Self::NPlusOne => 1,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NPlusOne => "N+1",
        }
    }
}

impl fmt::Display for RedundancyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedundancyPolicy {
    type Err = ConfigIssue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "n+1" => Ok(Self::NPlusOne),
            _ => Err(ConfigIssue::UnknownRedundancyPolicy(s.to_owned())),
        }
    }
}

/// Validated configuration of the advanced sizing chain.
///
/// Built from [`AuxiliaryParameters`] with `TryFrom`. Percentages are stored
/// as non-negative ratios; voltages, capacities, currents and C-rates are
/// strictly positive; the end-of-discharge voltage is below the end-of-charge
/// voltage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvancedConfig {
    pack_loss: Constrained<Ratio, NonNegative>,
    cell_divergence: Constrained<Ratio, NonNegative>,
    redundancy: RedundancyPolicy,
    ageing_derate: Constrained<Ratio, NonNegative>,
    temp_derate: Constrained<Ratio, NonNegative>,
    anomaly_reserve: Constrained<Ratio, NonNegative>,
    cell_nominal_voltage: Constrained<ElectricPotential, StrictlyPositive>,
    cell_nominal_capacity: Constrained<ElectricCharge, StrictlyPositive>,
    target_pack_voltage: Constrained<ElectricPotential, StrictlyPositive>,
    charge_c_rate: Constrained<f64, StrictlyPositive>,
    discharge_c_rate: Constrained<f64, StrictlyPositive>,
    cell_max_charge_current: Constrained<ElectricCurrent, StrictlyPositive>,
    cell_max_discharge_current: Constrained<ElectricCurrent, StrictlyPositive>,
    eol_factor: Constrained<f64, UnitIntervalLeftOpen>,
    eocv_per_cell: Constrained<ElectricPotential, StrictlyPositive>,
    eodv_per_cell: Constrained<ElectricPotential, StrictlyPositive>,
}

impl TryFrom<&AuxiliaryParameters> for AdvancedConfig {
    type Error = BmsError;

    fn try_from(params: &AuxiliaryParameters) -> Result<Self, Self::Error> {
        let redundancy = params
            .redundancy
            .as_deref()
            .ok_or(BmsError::configuration("redundancy", ConfigIssue::Missing))?
            .parse::<RedundancyPolicy>()
            .map_err(|issue| BmsError::configuration("redundancy", issue))?;

        let eocv_per_cell = positive("eocv_per_cell_v", params.eocv_per_cell_v, |v| {
            ElectricPotential::new::<volt>(v)
        })?;
        let eodv_per_cell = positive("eodv_per_cell_v", params.eodv_per_cell_v, |v| {
            ElectricPotential::new::<volt>(v)
        })?;
        if eodv_per_cell.get() >= eocv_per_cell.get() {
            return Err(BmsError::configuration(
                "eodv_per_cell_v",
                ConfigIssue::Inconsistent(
                    "end-of-discharge voltage must be below end-of-charge voltage",
                ),
            ));
        }

        let eol_factor = UnitIntervalLeftOpen::new(required("eol_factor", params.eol_factor)?)
            .map_err(|issue| BmsError::configuration("eol_factor", issue))?;

        Ok(Self {
            pack_loss: percentage("pack_loss_pct", params.pack_loss_pct)?,
            cell_divergence: percentage("cell_divergence_pct", params.cell_divergence_pct)?,
            redundancy,
            ageing_derate: percentage("ageing_derate_pct", params.ageing_derate_pct)?,
            temp_derate: percentage("temp_derate_pct", params.temp_derate_pct)?,
            anomaly_reserve: percentage("anomaly_reserve_pct", params.anomaly_reserve_pct)?,
            cell_nominal_voltage: positive(
                "cell_nominal_voltage_v",
                params.cell_nominal_voltage_v,
                |v| ElectricPotential::new::<volt>(v),
            )?,
            cell_nominal_capacity: positive(
                "cell_nominal_capacity_ah",
                params.cell_nominal_capacity_ah,
                |v| ElectricCharge::new::<ampere_hour>(v),
            )?,
            target_pack_voltage: positive(
                "target_pack_voltage_v",
                params.target_pack_voltage_v,
                |v| ElectricPotential::new::<volt>(v),
            )?,
            charge_c_rate: positive("charge_c_rate", params.charge_c_rate, |v| v)?,
            discharge_c_rate: positive("discharge_c_rate", params.discharge_c_rate, |v| v)?,
            cell_max_charge_current: positive(
                "cell_max_charge_current_a",
                params.cell_max_charge_current_a,
                |v| ElectricCurrent::new::<ampere>(v),
            )?,
            cell_max_discharge_current: positive(
                "cell_max_discharge_current_a",
                params.cell_max_discharge_current_a,
                |v| ElectricCurrent::new::<ampere>(v),
            )?,
            eol_factor,
            eocv_per_cell,
            eodv_per_cell,
        })
    }
}

impl TryFrom<AuxiliaryParameters> for AdvancedConfig {
    type Error = BmsError;

    fn try_from(params: AuxiliaryParameters) -> Result<Self, Self::Error> {
        Self::try_from(&params)
    }
}

fn required(field: &'static str, value: Option<f64>) -> Result<f64, BmsError> {
    let value = value.ok_or(BmsError::configuration(field, ConfigIssue::Missing))?;
    if value.is_infinite() {
        return Err(BmsError::configuration(field, ConfigIssue::NotFinite));
    }
    Ok(value)
}

fn percentage(
    field: &'static str,
    value: Option<f64>,
) -> Result<Constrained<Ratio, NonNegative>, BmsError> {
    let pct = required(field, value)?;
    NonNegative::new(Ratio::new::<percent>(pct)).map_err(|issue| BmsError::configuration(field, issue))
}

fn positive<T>(
    field: &'static str,
    value: Option<f64>,
    quantity: impl FnOnce(f64) -> T,
) -> Result<Constrained<T, StrictlyPositive>, BmsError>
where
    T: PartialOrd + Zero,
{
    let value = required(field, value)?;
    StrictlyPositive::new(quantity(value)).map_err(|issue| BmsError::configuration(field, issue))
}

impl AdvancedConfig {
    #[must_use]
    pub fn pack_loss(&self) -> Ratio {
        self.pack_loss.get()
    }

    #[must_use]
    pub fn cell_divergence(&self) -> Ratio {
        self.cell_divergence.get()
    }

    #[must_use]
    pub fn redundancy(&self) -> RedundancyPolicy {
        self.redundancy
    }

    #[must_use]
    pub fn ageing_derate(&self) -> Ratio {
        self.ageing_derate.get()
    }

    #[must_use]
    pub fn temp_derate(&self) -> Ratio {
        self.temp_derate.get()
    }

    #[must_use]
    pub fn anomaly_reserve(&self) -> Ratio {
        self.anomaly_reserve.get()
    }

    #[must_use]
    pub fn cell_nominal_voltage(&self) -> ElectricPotential {
        self.cell_nominal_voltage.get()
    }

    #[must_use]
    pub fn cell_nominal_capacity(&self) -> ElectricCharge {
        self.cell_nominal_capacity.get()
    }

    #[must_use]
    pub fn target_pack_voltage(&self) -> ElectricPotential {
        self.target_pack_voltage.get()
    }

    #[must_use]
    pub fn charge_c_rate(&self) -> CRate {
        CRate::new(self.charge_c_rate.get())
    }

    #[must_use]
    pub fn discharge_c_rate(&self) -> CRate {
        CRate::new(self.discharge_c_rate.get())
    }

    /// Absolute maximum charge current of one cell.
    #[must_use]
    pub fn cell_max_charge_current(&self) -> ElectricCurrent {
        self.cell_max_charge_current.get()
    }

    /// Absolute maximum discharge current of one cell.
    #[must_use]
    pub fn cell_max_discharge_current(&self) -> ElectricCurrent {
        self.cell_max_discharge_current.get()
    }

    /// Fraction of beginning-of-life capacity left at end of life.
    #[must_use]
    pub fn eol_factor(&self) -> f64 {
        self.eol_factor.get()
    }

    #[must_use]
    pub fn eocv_per_cell(&self) -> ElectricPotential {
        self.eocv_per_cell.get()
    }

    #[must_use]
    pub fn eodv_per_cell(&self) -> ElectricPotential {
        self.eodv_per_cell.get()
    }
}

/// Multiplier `1 + pct/100` for a percentage stored as a ratio.
pub(crate) fn growth_factor(pct: Ratio) -> f64 {
    1.0 + pct.get::<ratio>()
}
