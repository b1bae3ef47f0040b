use uom::si::f64::{ElectricCharge, Energy};

use crate::{
    base::DerivedRequirements,
    case::{MissionCaseConfig, SocWindow},
    error::BmsError,
    mission::MissionInputs,
    render,
    units::CRate,
};

/// BMS requirement snippet for one `(inputs, case)` pair.
///
/// The Markdown and JSON renderings are produced once, at construction, from
/// the same values the accessors return. A snippet is never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BmsRequirementSnippet {
    inputs: MissionInputs,
    case: MissionCaseConfig,
    derived: DerivedRequirements,
    rendered_md: String,
    rendered_json: String,
}

impl BmsRequirementSnippet {
    pub(crate) fn new(
        inputs: MissionInputs,
        case: MissionCaseConfig,
        derived: DerivedRequirements,
    ) -> Result<Self, BmsError> {
        let rendered = render::render_parts(&inputs, &case, &derived, None)?;
        Ok(Self {
            inputs,
            case,
            derived,
            rendered_md: rendered.markdown,
            rendered_json: rendered.json,
        })
    }

    /// The mission inputs this snippet was computed from.
    #[must_use]
    pub fn inputs(&self) -> &MissionInputs {
        &self.inputs
    }

    /// The mission case this snippet was computed for.
    #[must_use]
    pub fn case(&self) -> &MissionCaseConfig {
        &self.case
    }

    #[must_use]
    pub fn case_name(&self) -> &str {
        self.case.name()
    }

    #[must_use]
    pub fn derived(&self) -> &DerivedRequirements {
        &self.derived
    }

    #[must_use]
    pub fn eclipse_energy(&self) -> Energy {
        self.derived.eclipse_energy
    }

    #[must_use]
    pub fn usable_capacity(&self) -> Energy {
        self.derived.usable_capacity
    }

    #[must_use]
    pub fn usable_charge(&self) -> ElectricCharge {
        self.derived.usable_charge
    }

    #[must_use]
    pub fn c_rate(&self) -> CRate {
        self.derived.c_rate
    }

    #[must_use]
    pub fn soc_window(&self) -> SocWindow {
        self.derived.soc_window
    }

    #[must_use]
    pub fn capacity_margin(&self) -> f64 {
        self.case.capacity_margin()
    }

    #[must_use]
    pub fn reserve_fraction(&self) -> f64 {
        self.case.reserve_fraction()
    }

    /// The Markdown rendering of the base requirements.
    #[must_use]
    pub fn rendered_md(&self) -> &str {
        &self.rendered_md
    }

    /// The JSON rendering of the base requirements.
    #[must_use]
    pub fn rendered_json(&self) -> &str {
        &self.rendered_json
    }
}
