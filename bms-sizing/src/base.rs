//! Base requirement calculator.
//!
//! Given mission inputs and a mission case, the calculator:
//! 1. computes the energy drawn during eclipse, `E = P * t_eclipse`,
//! 2. applies the case margin, `C_Wh = E * margin`,
//! 3. converts to charge at the nominal voltage, `C_Ah = C_Wh / V`,
//! 4. derives the average eclipse C-rate, `(P / V) / C_Ah`,
//! 5. copies the case SOC window.

use tracing::debug;
use uom::si::{
    electric_charge::ampere_hour,
    energy::watt_hour,
    f64::{ElectricCharge, ElectricCurrent, ElectricPotential, Energy, Power, Time},
};

use crate::{
    case::{CaseRegistry, MissionCaseConfig, SocWindow},
    error::BmsError,
    mission::MissionInputs,
    snippet::BmsRequirementSnippet,
    units::CRate,
};

/// Values derived from one `(inputs, case)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedRequirements {
    pub eclipse_energy: Energy,
    pub usable_capacity: Energy,
    pub usable_charge: ElectricCharge,
    pub c_rate: CRate,
    pub soc_window: SocWindow,
}

/// Energy drawn at constant `power` over `eclipse`.
#[must_use]
pub fn eclipse_energy(power: Power, eclipse: Time) -> Energy {
    power * eclipse
}

/// Usable capacity needed to cover `eclipse_energy` with `margin`.
#[must_use]
pub fn required_usable_capacity(eclipse_energy: Energy, margin: f64) -> Energy {
    eclipse_energy * margin
}

/// Converts an energy capacity to charge at `voltage`.
#[must_use]
pub fn usable_charge(capacity: Energy, voltage: ElectricPotential) -> ElectricCharge {
    capacity / voltage
}

/// Average discharge C-rate over the eclipse, zero when no capacity is required.
#[must_use]
pub fn average_c_rate(power: Power, voltage: ElectricPotential, capacity: ElectricCharge) -> CRate {
    let current: ElectricCurrent = power / voltage;
    CRate::from_current(current, capacity)
}

/// Derives the base requirement values.
#[must_use]
pub fn derive_requirements(inputs: &MissionInputs, case: &MissionCaseConfig) -> DerivedRequirements {
    let eclipse_energy = eclipse_energy(inputs.power(), inputs.eclipse());
    let usable_capacity = required_usable_capacity(eclipse_energy, case.capacity_margin());
    let usable_charge = usable_charge(usable_capacity, inputs.voltage());
    let c_rate = average_c_rate(inputs.power(), inputs.voltage(), usable_charge);

    debug!(
        case = case.name(),
        eclipse_energy_wh = eclipse_energy.get::<watt_hour>(),
        usable_capacity_wh = usable_capacity.get::<watt_hour>(),
        usable_capacity_ah = usable_charge.get::<ampere_hour>(),
        c_rate = c_rate.per_hour(),
        "derived base requirements"
    );

    DerivedRequirements {
        eclipse_energy,
        usable_capacity,
        usable_charge,
        c_rate,
        soc_window: case.soc_window(),
    }
}

/// Builds the requirement snippet for one mission case.
///
/// # Errors
///
/// Returns [`BmsError::Render`] if the snippet cannot be serialized.
/// Input validation happens earlier, in [`MissionInputs::new`].
pub fn calculate(
    inputs: &MissionInputs,
    case: &MissionCaseConfig,
) -> Result<BmsRequirementSnippet, BmsError> {
    let derived = derive_requirements(inputs, case);
    BmsRequirementSnippet::new(*inputs, case.clone(), derived)
}

/// Builds one snippet per registered case, in registry order.
///
/// # Errors
///
/// Returns the first error raised by [`calculate`].
pub fn calculate_all(
    inputs: &MissionInputs,
    registry: &CaseRegistry,
) -> Result<Vec<BmsRequirementSnippet>, BmsError> {
    registry.iter().map(|case| calculate(inputs, case)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{electric_potential::volt, power::watt, time::minute};

    fn case(name: &str) -> &'static MissionCaseConfig {
        CaseRegistry::builtin().get(name).unwrap()
    }

    #[test]
    fn eclipse_energy_is_power_times_duration() {
        let energy = eclipse_energy(Power::new::<watt>(120.0), Time::new::<minute>(30.0));
        assert_relative_eq!(energy.get::<watt_hour>(), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn short_lived_case_values() {
        let inputs = MissionInputs::new(90.0, 35.0, 200.0, 28.0).unwrap();
        let derived = derive_requirements(&inputs, case("short_lived_high_power"));

        assert_relative_eq!(derived.eclipse_energy.get::<watt_hour>(), 116.666_667, epsilon = 1e-5);
        assert_relative_eq!(derived.usable_capacity.get::<watt_hour>(), 128.333_333, epsilon = 1e-5);
        assert_relative_eq!(derived.usable_charge.get::<ampere_hour>(), 4.583_333, epsilon = 1e-5);
        assert_relative_eq!(derived.c_rate.per_hour(), 1.558_442, epsilon = 1e-5);
    }

    #[test]
    fn c_rate_times_capacity_is_average_current() {
        let inputs = MissionInputs::new(95.0, 36.0, 340.0, 32.0).unwrap();
        let derived = derive_requirements(&inputs, case("long_lived_low_power"));

        let current = derived.c_rate.per_hour() * derived.usable_charge.get::<ampere_hour>();
        assert_relative_eq!(current, 340.0 / 32.0, epsilon = 1e-9);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn zero_eclipse_has_zero_capacity_and_rate() {
        let inputs = MissionInputs::new(90.0, 0.0, 200.0, 28.0).unwrap();
        let derived = derive_requirements(&inputs, case("short_lived_high_power"));

        assert_eq!(derived.usable_capacity.get::<watt_hour>(), 0.0);
        assert_eq!(derived.c_rate, CRate::new(0.0));
    }

    #[test]
    fn usable_charge_at_voltage() {
        let charge = usable_charge(
            Energy::new::<watt_hour>(140.0),
            ElectricPotential::new::<volt>(28.0),
        );
        assert_relative_eq!(charge.get::<ampere_hour>(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn calculate_all_follows_registry_order() {
        let inputs = MissionInputs::new(90.0, 35.0, 200.0, 28.0).unwrap();
        let snippets = calculate_all(&inputs, CaseRegistry::builtin()).unwrap();

        let names: Vec<_> = snippets.iter().map(|s| s.case().name()).collect();
        assert_eq!(names, ["short_lived_high_power", "long_lived_low_power"]);
    }
}
