//! Mission case presets.
//!
//! A mission case carries the margins and state-of-charge limits that turn a
//! raw eclipse energy into a battery requirement. Two cases are built in:
//!
//! - `short_lived_high_power`: LEO-like missions where a deep discharge is acceptable.
//! - `long_lived_low_power`: GEO-like missions sized conservatively for life.

use std::sync::LazyLock;

use bms_core::constraint::{ConstraintError, UnitIntervalRightOpen};
use uom::si::{
    f64::Ratio,
    ratio::{percent, ratio},
};

use crate::error::{BmsError, ConfigIssue};

static BUILTIN: LazyLock<CaseRegistry> = LazyLock::new(|| CaseRegistry {
    cases: vec![
        MissionCaseConfig::trusted(
            "short_lived_high_power",
            "Short-lived, high-power (e.g. LEO, high DOD acceptable)",
            1.10,
            0.20,
            1.00,
            0.10,
        ),
        MissionCaseConfig::trusted(
            "long_lived_low_power",
            "Long-lived, low-power (e.g. GEO, conservative for life)",
            1.20,
            0.30,
            0.90,
            0.25,
        ),
    ],
});

/// Margins and SOC limits for one class of mission.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionCaseConfig {
    name: String,
    description: String,
    capacity_margin: f64,
    soc_min_eoe: Ratio,
    soc_max_eoc: Ratio,
    reserve_fraction: f64,
}

impl MissionCaseConfig {
    /// Creates a mission case.
    ///
    /// SOC limits are given in percent.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::Configuration`] if:
    /// - `capacity_margin` is not greater than one,
    /// - either SOC limit lies outside `[0, 100]` percent,
    /// - `soc_min_eoe_pct` is not below `soc_max_eoc_pct`,
    /// - `reserve_fraction` lies outside `[0, 1)`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        capacity_margin: f64,
        soc_min_eoe_pct: f64,
        soc_max_eoc_pct: f64,
        reserve_fraction: f64,
    ) -> Result<Self, BmsError> {
        if capacity_margin.is_nan() {
            return Err(BmsError::configuration(
                "capacity_margin",
                ConstraintError::NotANumber,
            ));
        }
        if capacity_margin <= 1.0 || !capacity_margin.is_finite() {
            return Err(BmsError::configuration(
                "capacity_margin",
                ConfigIssue::Inconsistent("capacity margin must be a finite value above 1.0"),
            ));
        }

        let soc_min_eoe = soc_fraction("soc_min_eoe", soc_min_eoe_pct)?;
        let soc_max_eoc = soc_fraction("soc_max_eoc", soc_max_eoc_pct)?;
        if soc_min_eoe >= soc_max_eoc {
            return Err(BmsError::configuration(
                "soc_min_eoe",
                ConfigIssue::Inconsistent("minimum SOC must be below the maximum SOC"),
            ));
        }

        let reserve_fraction = UnitIntervalRightOpen::new(reserve_fraction)
            .map_err(|issue| BmsError::configuration("reserve_fraction", issue))?
            .into_inner();

        Ok(Self {
            name: name.into(),
            description: description.into(),
            capacity_margin,
            soc_min_eoe,
            soc_max_eoc,
            reserve_fraction,
        })
    }

    /// Builds one of the compiled-in presets, whose values are known to be valid.
    fn trusted(
        name: &str,
        description: &str,
        capacity_margin: f64,
        soc_min_eoe: f64,
        soc_max_eoc: f64,
        reserve_fraction: f64,
    ) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            capacity_margin,
            soc_min_eoe: Ratio::new::<ratio>(soc_min_eoe),
            soc_max_eoc: Ratio::new::<ratio>(soc_max_eoc),
            reserve_fraction,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Multiplier applied to the eclipse energy, e.g. `1.15` for 15% margin.
    #[must_use]
    pub fn capacity_margin(&self) -> f64 {
        self.capacity_margin
    }

    /// Energy reserve as a fraction of usable capacity.
    ///
    /// The reserve is reflected in the minimum SOC; it is carried for documentation.
    #[must_use]
    pub fn reserve_fraction(&self) -> f64 {
        self.reserve_fraction
    }

    /// Returns the SOC operating window of this case.
    #[must_use]
    pub fn soc_window(&self) -> SocWindow {
        SocWindow {
            min: self.soc_min_eoe,
            max: self.soc_max_eoc,
            min_eoe: self.soc_min_eoe,
        }
    }
}

fn soc_fraction(field: &'static str, pct: f64) -> Result<Ratio, BmsError> {
    if pct.is_nan() {
        return Err(BmsError::configuration(field, ConstraintError::NotANumber));
    }
    if pct < 0.0 {
        return Err(BmsError::configuration(field, ConstraintError::BelowMinimum));
    }
    if pct > 100.0 {
        return Err(BmsError::configuration(field, ConstraintError::AboveMaximum));
    }
    Ok(Ratio::new::<ratio>(pct / 100.0))
}

/// State-of-charge operating window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocWindow {
    /// Lowest allowed SOC.
    pub min: Ratio,
    /// Highest allowed SOC, reached at end of charge.
    pub max: Ratio,
    /// Minimum SOC at end of eclipse.
    pub min_eoe: Ratio,
}

impl SocWindow {
    /// Depth of discharge between the window limits.
    #[must_use]
    pub fn depth_of_discharge(&self) -> Ratio {
        self.max - self.min
    }

    #[must_use]
    pub fn min_percent(&self) -> f64 {
        self.min.get::<percent>()
    }

    #[must_use]
    pub fn max_percent(&self) -> f64 {
        self.max.get::<percent>()
    }

    #[must_use]
    pub fn min_eoe_percent(&self) -> f64 {
        self.min_eoe.get::<percent>()
    }
}

/// An ordered, read-only set of mission cases keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseRegistry {
    cases: Vec<MissionCaseConfig>,
}

impl CaseRegistry {
    /// Creates a registry from the given cases, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::Configuration`] if two cases share a name.
    pub fn new(cases: impl IntoIterator<Item = MissionCaseConfig>) -> Result<Self, BmsError> {
        let mut registry = Self::default();
        for case in cases {
            if registry.find(case.name()).is_some() {
                return Err(BmsError::configuration(
                    "name",
                    ConfigIssue::Inconsistent("mission case names must be unique"),
                ));
            }
            registry.cases.push(case);
        }
        Ok(registry)
    }

    /// Returns the built-in registry, constructed on first use.
    #[must_use]
    pub fn builtin() -> &'static CaseRegistry {
        &BUILTIN
    }

    /// Looks up a case by name.
    ///
    /// Hyphens and underscores are interchangeable, so `short-lived-high-power`
    /// finds `short_lived_high_power`.
    ///
    /// # Errors
    ///
    /// Returns [`BmsError::UnknownCase`] if no case matches.
    pub fn get(&self, name: &str) -> Result<&MissionCaseConfig, BmsError> {
        self.find(name)
            .ok_or_else(|| BmsError::UnknownCase(name.to_owned()))
    }

    fn find(&self, name: &str) -> Option<&MissionCaseConfig> {
        let wanted = normalize(name);
        self.cases.iter().find(|case| normalize(case.name()) == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissionCaseConfig> {
        self.cases.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(MissionCaseConfig::name)
    }
}

fn normalize(name: &str) -> String {
    name.trim().replace('-', "_").to_ascii_lowercase()
}
