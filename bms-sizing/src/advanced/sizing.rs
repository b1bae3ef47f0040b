use tracing::debug;
use uom::si::{
    energy::watt_hour,
    f64::{ElectricCharge, Energy, Ratio},
};

use crate::{
    advanced::{AdvancedConfig, cell::PackGeometry, params::growth_factor},
    error::BmsError,
};

/// One step of the sizing chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingTerm {
    /// Energy this step adds to the running capacity.
    pub added: Energy,
    /// Running capacity after this step.
    pub running_total: Energy,
}

impl SizingTerm {
    fn scaled(previous: Energy, pct: Ratio) -> Self {
        let running_total = previous * growth_factor(pct);
        Self {
            added: running_total - previous,
            running_total,
        }
    }

    fn offset(previous: Energy, added: Energy) -> Self {
        Self {
            added,
            running_total: previous + added,
        }
    }
}

/// Every term of the sizing chain, in application order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingSummary {
    pub base_capacity: Energy,
    pub pack_loss: SizingTerm,
    pub divergence: SizingTerm,
    pub redundancy: SizingTerm,
    pub ageing: SizingTerm,
    pub temperature: SizingTerm,
    pub anomaly_reserve: SizingTerm,
    /// Strings needed before redundancy is added.
    pub strings_required: u32,
    pub redundant_strings: u32,
    pub final_capacity: Energy,
    /// Final capacity at the pack nominal voltage.
    pub final_charge: ElectricCharge,
}

impl SizingSummary {
    /// The terms paired with their display labels, in application order.
    #[must_use]
    pub fn terms(&self) -> [(&'static str, SizingTerm); 6] {
        [
            ("Pack losses", self.pack_loss),
            ("Cell divergence", self.divergence),
            ("Redundancy", self.redundancy),
            ("Ageing derate", self.ageing),
            ("Temperature derate", self.temperature),
            ("Anomaly reserve", self.anomaly_reserve),
        ]
    }
}

/// Applies the sizing steps to `base` in order.
///
/// Each percentage step scales the running capacity. The redundancy step adds
/// whole cell strings at the pack nominal voltage, after counting how many
/// strings the capacity so far requires.
///
/// # Errors
///
/// Returns [`BmsError::Configuration`] if the capacity after divergence needs
/// more strings than can be counted.
pub fn size_capacity(
    base: Energy,
    geometry: &PackGeometry,
    config: &AdvancedConfig,
) -> Result<SizingSummary, BmsError> {
    let pack_loss = SizingTerm::scaled(base, config.pack_loss());
    log_step("pack_loss", &pack_loss);

    let divergence = SizingTerm::scaled(pack_loss.running_total, config.cell_divergence());
    log_step("divergence", &divergence);

    let strings_required = geometry.strings_for(geometry.charge(divergence.running_total))?;
    let redundant_strings = config.redundancy().redundant_strings();
    let redundancy = SizingTerm::offset(
        divergence.running_total,
        geometry.string_energy() * f64::from(redundant_strings),
    );
    log_step("redundancy", &redundancy);

    let ageing = SizingTerm::scaled(redundancy.running_total, config.ageing_derate());
    log_step("ageing", &ageing);

    let temperature = SizingTerm::scaled(ageing.running_total, config.temp_derate());
    log_step("temperature", &temperature);

    let anomaly_reserve = SizingTerm::scaled(temperature.running_total, config.anomaly_reserve());
    log_step("anomaly_reserve", &anomaly_reserve);

    let final_capacity = anomaly_reserve.running_total;
    Ok(SizingSummary {
        base_capacity: base,
        pack_loss,
        divergence,
        redundancy,
        ageing,
        temperature,
        anomaly_reserve,
        strings_required,
        redundant_strings,
        final_capacity,
        final_charge: geometry.charge(final_capacity),
    })
}

fn log_step(step: &'static str, term: &SizingTerm) {
    debug!(
        step,
        added_wh = term.added.get::<watt_hour>(),
        running_wh = term.running_total.get::<watt_hour>(),
        "applied sizing step"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::electric_charge::ampere_hour;

    use crate::{advanced::AuxiliaryParameters, error::ConfigIssue};

    fn config(params: AuxiliaryParameters) -> AdvancedConfig {
        AdvancedConfig::try_from(params.with_fallback(AuxiliaryParameters {
            target_pack_voltage_v: Some(28.0),
            ..AuxiliaryParameters::recommended()
        }))
        .unwrap()
    }

    fn wh(value: f64) -> Energy {
        Energy::new::<watt_hour>(value)
    }

    #[test]
    fn recommended_chain() {
        let config = config(AuxiliaryParameters::default());
        let geometry = PackGeometry::from_config(&config).unwrap();
        let summary = size_capacity(wh(128.33), &geometry, &config).unwrap();

        assert_relative_eq!(summary.pack_loss.running_total.get::<watt_hour>(), 130.8966, epsilon = 1e-4);
        assert_relative_eq!(summary.divergence.running_total.get::<watt_hour>(), 134.8235, epsilon = 1e-4);
        assert_eq!(summary.strings_required, 1);
        assert_eq!(summary.redundant_strings, 1);
        assert_relative_eq!(summary.redundancy.added.get::<watt_hour>(), 144.0, epsilon = 1e-9);
        assert_relative_eq!(summary.final_capacity.get::<watt_hour>(), 338.1432, epsilon = 1e-3);
        assert_relative_eq!(summary.final_charge.get::<ampere_hour>(), 11.7411, epsilon = 1e-3);
    }

    #[test]
    fn running_total_never_decreases() {
        let config = config(AuxiliaryParameters::default());
        let geometry = PackGeometry::from_config(&config).unwrap();
        let summary = size_capacity(wh(500.0), &geometry, &config).unwrap();

        let mut previous = summary.base_capacity;
        for (label, term) in summary.terms() {
            assert!(term.added >= wh(0.0), "{label} removed capacity");
            assert!(term.running_total >= previous, "{label} decreased the total");
            previous = term.running_total;
        }
        assert_eq!(previous, summary.final_capacity);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn zero_percentages_and_no_redundancy_keep_the_base() {
        let config = config(AuxiliaryParameters {
            pack_loss_pct: Some(0.0),
            cell_divergence_pct: Some(0.0),
            redundancy: Some("none".into()),
            ageing_derate_pct: Some(0.0),
            temp_derate_pct: Some(0.0),
            anomaly_reserve_pct: Some(0.0),
            ..AuxiliaryParameters::default()
        });
        let geometry = PackGeometry::from_config(&config).unwrap();
        let summary = size_capacity(wh(200.0), &geometry, &config).unwrap();

        assert_eq!(summary.final_capacity.get::<watt_hour>(), 200.0);
        assert_eq!(summary.redundant_strings, 0);
        assert_eq!(summary.strings_required, 2);
    }

    #[test]
    fn redundancy_is_applied_before_the_derates() {
        let config = config(AuxiliaryParameters::default());
        let geometry = PackGeometry::from_config(&config).unwrap();
        let summary = size_capacity(wh(100.0), &geometry, &config).unwrap();

        // 10% ageing on top of the spare string, not before it.
        let expected = summary.redundancy.running_total.get::<watt_hour>() * 0.1;
        assert_relative_eq!(summary.ageing.added.get::<watt_hour>(), expected, epsilon = 1e-9);
    }

    #[test]
    fn infinite_capacity_is_rejected() {
        let config = config(AuxiliaryParameters {
            pack_loss_pct: Some(1e308),
            ..AuxiliaryParameters::default()
        });
        let geometry = PackGeometry::from_config(&config).unwrap();
        let err = size_capacity(wh(128.33), &geometry, &config).unwrap_err();
        assert!(matches!(
            err,
            BmsError::Configuration {
                issue: ConfigIssue::LayoutTooLarge,
                ..
            }
        ));
    }
}
