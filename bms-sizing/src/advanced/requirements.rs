use std::fmt;

use serde::Serialize;
use uom::si::{electric_current::ampere, energy::watt_hour, ratio::percent};

use crate::{
    advanced::{AdvancedConfig, ChargeDischargeLimits, SizingSummary},
    case::SocWindow,
    units::round_to,
};

/// Identifier of a named BMS requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequirementId {
    #[serde(rename = "REQ-BMS-001")]
    UsableCapacity,
    #[serde(rename = "REQ-BMS-002")]
    DischargeCRate,
    #[serde(rename = "REQ-BMS-003")]
    SocWindow,
    #[serde(rename = "REQ-BMS-004")]
    ChargeCurrentLimit,
    #[serde(rename = "REQ-BMS-005")]
    DischargeCurrentLimit,
    #[serde(rename = "REQ-BMS-006")]
    Redundancy,
    #[serde(rename = "REQ-BMS-007")]
    AgeingMargin,
}

impl RequirementId {
    /// Every requirement, in document order.
    pub const ALL: [Self; 7] = [
        Self::UsableCapacity,
        Self::DischargeCRate,
        Self::SocWindow,
        Self::ChargeCurrentLimit,
        Self::DischargeCurrentLimit,
        Self::Redundancy,
        Self::AgeingMargin,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UsableCapacity => "REQ-BMS-001",
            Self::DischargeCRate => "REQ-BMS-002",
            Self::SocWindow => "REQ-BMS-003",
            Self::ChargeCurrentLimit => "REQ-BMS-004",
            Self::DischargeCurrentLimit => "REQ-BMS-005",
            Self::Redundancy => "REQ-BMS-006",
            Self::AgeingMargin => "REQ-BMS-007",
        }
    }

    /// Short title of the requirement.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::UsableCapacity => "Usable capacity",
            Self::DischargeCRate => "Discharge C-rate",
            Self::SocWindow => "SOC window",
            Self::ChargeCurrentLimit => "Charge current limit",
            Self::DischargeCurrentLimit => "Discharge current limit",
            Self::Redundancy => "Redundancy",
            Self::AgeingMargin => "Ageing margin",
        }
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requirement statement with its governing value.
///
/// `value` is already rounded for presentation: C-rates to three decimals,
/// everything else to two.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedRequirement {
    pub id: RequirementId,
    pub text: String,
    pub value: f64,
    pub unit: &'static str,
}

/// Builds the seven requirements in document order.
pub(crate) fn named_requirements(
    summary: &SizingSummary,
    soc_window: &SocWindow,
    limits: &ChargeDischargeLimits,
    config: &AdvancedConfig,
) -> [NamedRequirement; 7] {
    RequirementId::ALL.map(|id| {
        let (value, unit, text) = match id {
            RequirementId::UsableCapacity => {
                let wh = round_to(summary.final_capacity.get::<watt_hour>(), 2);
                (wh, "Wh", format!("The battery shall provide at least {wh} Wh of usable energy at beginning of life."))
            }
            RequirementId::DischargeCRate => {
                let c = round_to(config.discharge_c_rate().per_hour(), 3);
                (c, "C", format!("The BMS shall support a continuous discharge rate of {c} C."))
            }
            RequirementId::SocWindow => {
                let pct = round_to(soc_window.min_eoe.get::<percent>(), 2);
                (pct, "%", format!("The BMS shall keep the state of charge at or above {pct} % at end of eclipse."))
            }
            RequirementId::ChargeCurrentLimit => {
                let a = round_to(limits.charge.clamped().get::<ampere>(), 2);
                (a, "A", format!("The BMS shall limit the pack charge current to {a} A."))
            }
            RequirementId::DischargeCurrentLimit => {
                let a = round_to(limits.discharge.clamped().get::<ampere>(), 2);
                (a, "A", format!("The BMS shall limit the pack discharge current to {a} A."))
            }
            RequirementId::Redundancy => {
                let strings = summary.redundant_strings;
                (
                    f64::from(strings),
                    "strings",
                    format!(
                        "The battery shall carry {strings} redundant cell string(s) ({} policy).",
                        config.redundancy()
                    ),
                )
            }
            RequirementId::AgeingMargin => {
                let pct = round_to(config.ageing_derate().get::<percent>(), 2);
                (pct, "%", format!("The sizing shall include an ageing margin of {pct} % of capacity."))
            }
        };
        NamedRequirement { id, text, value, unit }
    })
}
