//! Serializable view of a snippet, rounded once for presentation.

use serde::Serialize;
use uom::si::{
    electric_charge::ampere_hour,
    electric_current::ampere,
    electric_potential::volt,
    energy::watt_hour,
    power::watt,
    time::minute,
};

use crate::{
    advanced::{AdvancedSizingResult, CurrentLimit, NamedRequirement},
    base::DerivedRequirements,
    case::MissionCaseConfig,
    mission::MissionInputs,
    units::round_to,
};

// Wh, Ah, A, V and % go to two decimals, C-rates to three.
fn r2(value: f64) -> f64 {
    round_to(value, 2)
}

fn r3(value: f64) -> f64 {
    round_to(value, 3)
}

// Mission inputs are echoed as entered. Only unit-conversion noise is removed.
fn echo(value: f64) -> f64 {
    round_to(value, 9)
}

#[derive(Debug, Serialize)]
pub(crate) struct SnippetRecord<'a> {
    pub case: &'a str,
    pub description: &'a str,
    pub inputs: InputsRecord,
    pub derived: DerivedRecord,
    pub soc_window: SocWindowRecord,
    pub margins: MarginsRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct InputsRecord {
    pub orbital_period_min: f64,
    pub eclipse_duration_min: f64,
    pub payload_power_w: f64,
    pub battery_voltage_v: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct DerivedRecord {
    pub eclipse_energy_wh: f64,
    pub required_usable_capacity_wh: f64,
    pub required_usable_capacity_ah: f64,
    pub c_rate: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SocWindowRecord {
    pub min_pct: f64,
    pub max_pct: f64,
    pub min_eoe_pct: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarginsRecord {
    pub capacity_margin: f64,
    pub reserve_fraction: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdvancedRecord<'a> {
    pub sizing_summary: SizingRecord,
    pub cell_level: CellLevelRecord<'a>,
    pub limits: LimitsRecord,
    pub requirements: &'a [NamedRequirement],
    pub violations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SizingRecord {
    pub base_capacity_wh: f64,
    pub steps: Vec<StepRecord>,
    pub strings_required: u32,
    pub redundant_strings: u32,
    pub final_capacity_wh: f64,
    pub final_capacity_ah: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct StepRecord {
    pub step: &'static str,
    pub added_wh: f64,
    pub running_total_wh: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CellLevelRecord<'a> {
    pub series: u32,
    pub parallel: u32,
    pub cell_count: u32,
    pub string_config: &'a str,
    pub cell_capacity_ah: f64,
    pub cell_nominal_voltage_v: f64,
    pub pack_nominal_voltage_v: f64,
    pub pack_capacity_ah: f64,
    pub eol_factor: f64,
    pub pack_capacity_eol_ah: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct LimitsRecord {
    pub charge: CurrentLimitRecord,
    pub discharge: CurrentLimitRecord,
    pub eocv_pack_v: f64,
    pub eodv_pack_v: f64,
    pub taper_note: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CurrentLimitRecord {
    pub c_rate: f64,
    pub requested_a: f64,
    pub bound_a: f64,
    pub clamped_a: f64,
    pub violated: bool,
}

impl<'a> SnippetRecord<'a> {
    pub(crate) fn new(
        inputs: &MissionInputs,
        case: &'a MissionCaseConfig,
        derived: &DerivedRequirements,
        advanced: Option<&'a AdvancedSizingResult>,
    ) -> Self {
        let soc = &derived.soc_window;
        Self {
            case: case.name(),
            description: case.description(),
            inputs: InputsRecord {
                orbital_period_min: echo(inputs.period().get::<minute>()),
                eclipse_duration_min: echo(inputs.eclipse().get::<minute>()),
                payload_power_w: echo(inputs.power().get::<watt>()),
                battery_voltage_v: echo(inputs.voltage().get::<volt>()),
            },
            derived: DerivedRecord {
                eclipse_energy_wh: r2(derived.eclipse_energy.get::<watt_hour>()),
                required_usable_capacity_wh: r2(derived.usable_capacity.get::<watt_hour>()),
                required_usable_capacity_ah: r2(derived.usable_charge.get::<ampere_hour>()),
                c_rate: r3(derived.c_rate.per_hour()),
            },
            soc_window: SocWindowRecord {
                min_pct: r2(soc.min_percent()),
                max_pct: r2(soc.max_percent()),
                min_eoe_pct: r2(soc.min_eoe_percent()),
            },
            margins: MarginsRecord {
                capacity_margin: r2(case.capacity_margin()),
                reserve_fraction: r2(case.reserve_fraction()),
            },
            advanced: advanced.map(AdvancedRecord::new),
        }
    }
}

impl<'a> AdvancedRecord<'a> {
    fn new(result: &'a AdvancedSizingResult) -> Self {
        let summary = &result.sizing_summary;
        let cells = &result.cell_level;
        let limits = &result.limits;

        Self {
            sizing_summary: SizingRecord {
                base_capacity_wh: r2(summary.base_capacity.get::<watt_hour>()),
                steps: summary
                    .terms()
                    .into_iter()
                    .map(|(step, term)| StepRecord {
                        step,
                        added_wh: r2(term.added.get::<watt_hour>()),
                        running_total_wh: r2(term.running_total.get::<watt_hour>()),
                    })
                    .collect(),
                strings_required: summary.strings_required,
                redundant_strings: summary.redundant_strings,
                final_capacity_wh: r2(summary.final_capacity.get::<watt_hour>()),
                final_capacity_ah: r2(summary.final_charge.get::<ampere_hour>()),
            },
            cell_level: CellLevelRecord {
                series: cells.series,
                parallel: cells.parallel,
                cell_count: cells.cell_count,
                string_config: &cells.string_config,
                cell_capacity_ah: r2(cells.cell_capacity.get::<ampere_hour>()),
                cell_nominal_voltage_v: r2(cells.cell_nominal_voltage.get::<volt>()),
                pack_nominal_voltage_v: r2(cells.pack_nominal_voltage.get::<volt>()),
                pack_capacity_ah: r2(cells.pack_capacity.get::<ampere_hour>()),
                eol_factor: r2(cells.eol_factor),
                pack_capacity_eol_ah: r2(cells.pack_capacity_eol.get::<ampere_hour>()),
            },
            limits: LimitsRecord {
                charge: CurrentLimitRecord::from(&limits.charge),
                discharge: CurrentLimitRecord::from(&limits.discharge),
                eocv_pack_v: r2(limits.eocv_pack.get::<volt>()),
                eodv_pack_v: r2(limits.eodv_pack.get::<volt>()),
                taper_note: limits.taper_note,
            },
            requirements: &result.requirements,
            violations: result.violations.iter().map(ToString::to_string).collect(),
        }
    }
}

impl From<&CurrentLimit> for CurrentLimitRecord {
    fn from(limit: &CurrentLimit) -> Self {
        Self {
            c_rate: r3(limit.c_rate.per_hour()),
            requested_a: r2(limit.requested.get::<ampere>()),
            bound_a: r2(limit.bound.get::<ampere>()),
            clamped_a: r2(limit.clamped().get::<ampere>()),
            violated: limit.is_violated(),
        }
    }
}
