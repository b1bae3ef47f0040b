use std::fmt::{self, Write};

use super::record::{AdvancedRecord, CurrentLimitRecord, SnippetRecord};

/// Writes the Markdown document for `record`.
pub(crate) fn write(record: &SnippetRecord<'_>) -> Result<String, fmt::Error> {
    let mut md = String::new();

    writeln!(md, "## BMS requirement snippet: {}", record.case)?;
    writeln!(md)?;
    writeln!(md, "_{}_", record.description)?;
    writeln!(md)?;

    let inputs = &record.inputs;
    writeln!(md, "### Inputs")?;
    writeln!(md)?;
    writeln!(md, "- Orbital period: {} min", inputs.orbital_period_min)?;
    writeln!(md, "- Eclipse duration: {} min", inputs.eclipse_duration_min)?;
    writeln!(md, "- Payload power during eclipse: {} W", inputs.payload_power_w)?;
    writeln!(md, "- Nominal battery voltage: {} V", inputs.battery_voltage_v)?;
    writeln!(md)?;

    let derived = &record.derived;
    let soc = &record.soc_window;
    writeln!(md, "### Derived requirements")?;
    writeln!(md)?;
    writeln!(md, "- Eclipse energy: {} Wh", derived.eclipse_energy_wh)?;
    writeln!(
        md,
        "- Required usable capacity: {} Wh ({} Ah)",
        derived.required_usable_capacity_wh, derived.required_usable_capacity_ah
    )?;
    writeln!(md, "- Average discharge rate during eclipse: {} C", derived.c_rate)?;
    writeln!(md, "- SOC window: {} % to {} %", soc.min_pct, soc.max_pct)?;
    writeln!(md, "- Minimum SOC at end of eclipse: {} %", soc.min_eoe_pct)?;
    writeln!(md)?;

    let margins = &record.margins;
    writeln!(md, "### Margin / reserve")?;
    writeln!(md)?;
    writeln!(md, "- Capacity margin factor: {}", margins.capacity_margin)?;
    writeln!(
        md,
        "- Energy reserve fraction: {} (reflected in the minimum SOC)",
        margins.reserve_fraction
    )?;

    if let Some(advanced) = &record.advanced {
        write_advanced(&mut md, advanced)?;
    }

    Ok(md)
}

fn write_advanced(md: &mut String, advanced: &AdvancedRecord<'_>) -> fmt::Result {
    let summary = &advanced.sizing_summary;
    writeln!(md)?;
    writeln!(md, "### Sizing summary")?;
    writeln!(md)?;
    writeln!(md, "| Step | Added (Wh) | Running total (Wh) |")?;
    writeln!(md, "|---|---:|---:|")?;
    writeln!(md, "| Base capacity | | {} |", summary.base_capacity_wh)?;
    for step in &summary.steps {
        writeln!(
            md,
            "| {} | {} | {} |",
            step.step, step.added_wh, step.running_total_wh
        )?;
    }
    writeln!(md)?;
    writeln!(
        md,
        "- Strings required before redundancy: {}",
        summary.strings_required
    )?;
    writeln!(md, "- Redundant strings: {}", summary.redundant_strings)?;
    writeln!(
        md,
        "- Final capacity: {} Wh ({} Ah)",
        summary.final_capacity_wh, summary.final_capacity_ah
    )?;

    let cells = &advanced.cell_level;
    writeln!(md)?;
    writeln!(md, "### Cell level")?;
    writeln!(md)?;
    writeln!(
        md,
        "- Configuration: {} ({} series x {} parallel, {} cells)",
        cells.string_config, cells.series, cells.parallel, cells.cell_count
    )?;
    writeln!(
        md,
        "- Cell: {} Ah at {} V nominal",
        cells.cell_capacity_ah, cells.cell_nominal_voltage_v
    )?;
    writeln!(md, "- Pack nominal voltage: {} V", cells.pack_nominal_voltage_v)?;
    writeln!(md, "- Pack capacity (BOL): {} Ah", cells.pack_capacity_ah)?;
    writeln!(
        md,
        "- Pack capacity (EOL, factor {}): {} Ah",
        cells.eol_factor, cells.pack_capacity_eol_ah
    )?;

    let limits = &advanced.limits;
    writeln!(md)?;
    writeln!(md, "### Charge / discharge limits")?;
    writeln!(md)?;
    writeln!(
        md,
        "| Limit | C-rate | Requested (A) | Cell bound (A) | Applied (A) | Status |"
    )?;
    writeln!(md, "|---|---:|---:|---:|---:|---|")?;
    write_limit_row(md, "Charge", &limits.charge)?;
    write_limit_row(md, "Discharge", &limits.discharge)?;
    writeln!(md)?;
    writeln!(md, "- Pack EOCV: {} V", limits.eocv_pack_v)?;
    writeln!(md, "- Pack EODV: {} V", limits.eodv_pack_v)?;
    writeln!(md, "- {}", limits.taper_note)?;
    for violation in &advanced.violations {
        writeln!(md, "- **Violation:** {violation}")?;
    }

    writeln!(md)?;
    writeln!(md, "### Named requirements")?;
    writeln!(md)?;
    writeln!(md, "| ID | Title | Requirement | Value | Unit |")?;
    writeln!(md, "|---|---|---|---:|---|")?;
    for requirement in advanced.requirements {
        writeln!(
            md,
            "| {} | {} | {} | {} | {} |",
            requirement.id,
            requirement.id.title(),
            requirement.text,
            requirement.value,
            requirement.unit
        )?;
    }

    Ok(())
}

fn write_limit_row(md: &mut String, label: &str, limit: &CurrentLimitRecord) -> fmt::Result {
    let status = if limit.violated { "clamped" } else { "ok" };
    writeln!(
        md,
        "| {label} | {} | {} | {} | {} | {status} |",
        limit.c_rate, limit.requested_a, limit.bound_a, limit.clamped_a
    )
}
