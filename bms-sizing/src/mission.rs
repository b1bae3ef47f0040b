//! Mission inputs.

use bms_core::constraint::{NonNegative, StrictlyPositive};
use uom::si::{
    electric_potential::volt,
    f64::{ElectricPotential, Power, Time},
    power::watt,
    time::minute,
};

use crate::error::{BmsError, InputIssue};

/// The four user-supplied mission parameters.
///
/// Values are validated once in [`MissionInputs::new`] and cannot change
/// afterwards:
///
/// - orbital period, payload power and battery voltage are strictly positive,
/// - eclipse duration is non-negative and no longer than the orbital period.
///
/// A zero eclipse is accepted and yields a zero capacity requirement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionInputs {
    period: Time,
    eclipse: Time,
    power: Power,
    voltage: ElectricPotential,
}

impl MissionInputs {
    /// Builds mission inputs from minutes, watts and volts.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::InvalidInput`] naming the offending field.
    pub fn new(
        period_min: f64,
        eclipse_min: f64,
        power_w: f64,
        voltage_v: f64,
    ) -> Result<Self, BmsError> {
        Self::from_quantities(
            Time::new::<minute>(period_min),
            Time::new::<minute>(eclipse_min),
            Power::new::<watt>(power_w),
            ElectricPotential::new::<volt>(voltage_v),
        )
    }

    /// Builds mission inputs from unit-safe quantities.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::InvalidInput`] naming the offending field.
    pub fn from_quantities(
        period: Time,
        eclipse: Time,
        power: Power,
        voltage: ElectricPotential,
    ) -> Result<Self, BmsError> {
        finite("period_min", period.value)?;
        finite("eclipse_min", eclipse.value)?;
        finite("power_w", power.value)?;
        finite("voltage_v", voltage.value)?;

        let period = StrictlyPositive::new(period)
            .map_err(|issue| BmsError::invalid_input("period_min", issue))?
            .into_inner();
        let eclipse = NonNegative::new(eclipse)
            .map_err(|issue| BmsError::invalid_input("eclipse_min", issue))?
            .into_inner();
        let power = StrictlyPositive::new(power)
            .map_err(|issue| BmsError::invalid_input("power_w", issue))?
            .into_inner();
        let voltage = StrictlyPositive::new(voltage)
            .map_err(|issue| BmsError::invalid_input("voltage_v", issue))?
            .into_inner();

        if eclipse > period {
            return Err(BmsError::invalid_input(
                "eclipse_min",
                InputIssue::EclipseExceedsPeriod {
                    eclipse_min: eclipse.get::<minute>(),
                    period_min: period.get::<minute>(),
                },
            ));
        }

        Ok(Self {
            period,
            eclipse,
            power,
            voltage,
        })
    }

    #[must_use]
    pub fn period(&self) -> Time {
        self.period
    }

    #[must_use]
    pub fn eclipse(&self) -> Time {
        self.eclipse
    }

    #[must_use]
    pub fn power(&self) -> Power {
        self.power
    }

    #[must_use]
    pub fn voltage(&self) -> ElectricPotential {
        self.voltage
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), BmsError> {
    if value.is_finite() || value.is_nan() {
        // NaN is reported by the constraint check with a more specific message.
        Ok(())
    } else {
        Err(BmsError::invalid_input(field, InputIssue::NotFinite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use bms_core::constraint::ConstraintError;

    #[test]
    fn accepts_valid_inputs() {
        let inputs = MissionInputs::new(90.0, 35.0, 200.0, 28.0).unwrap();
        assert_relative_eq!(inputs.period().get::<minute>(), 90.0);
        assert_relative_eq!(inputs.eclipse().get::<minute>(), 35.0);
        assert_relative_eq!(inputs.power().get::<watt>(), 200.0);
        assert_relative_eq!(inputs.voltage().get::<volt>(), 28.0);
    }

    #[test]
    fn full_period_eclipse_is_accepted() {
        assert!(MissionInputs::new(90.0, 90.0, 200.0, 28.0).is_ok());
    }

    #[test]
    fn zero_eclipse_is_accepted() {
        assert!(MissionInputs::new(90.0, 0.0, 200.0, 28.0).is_ok());
    }

    #[test]
    fn eclipse_longer_than_period_is_rejected() {
        let err = MissionInputs::new(90.0, 95.0, 200.0, 28.0).unwrap_err();
        match err {
            BmsError::InvalidInput {
                field: "eclipse_min",
                issue: InputIssue::EclipseExceedsPeriod { .. },
            } => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_voltage_is_rejected() {
        let err = MissionInputs::new(90.0, 35.0, 200.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            BmsError::InvalidInput {
                field: "voltage_v",
                issue: InputIssue::Constraint(ConstraintError::Zero),
            }
        );
    }

    #[test]
    fn negative_and_non_finite_inputs_are_rejected() {
        assert!(matches!(
            MissionInputs::new(-1.0, 35.0, 200.0, 28.0),
            Err(BmsError::InvalidInput {
                field: "period_min",
                ..
            })
        ));
        assert!(matches!(
            MissionInputs::new(90.0, -5.0, 200.0, 28.0),
            Err(BmsError::InvalidInput {
                field: "eclipse_min",
                ..
            })
        ));
        assert!(matches!(
            MissionInputs::new(90.0, 35.0, f64::INFINITY, 28.0),
            Err(BmsError::InvalidInput {
                field: "power_w",
                issue: InputIssue::NotFinite,
            })
        ));
        assert!(matches!(
            MissionInputs::new(90.0, 35.0, f64::NAN, 28.0),
            Err(BmsError::InvalidInput {
                field: "power_w",
                issue: InputIssue::Constraint(ConstraintError::NotANumber),
            })
        ));
    }
}
