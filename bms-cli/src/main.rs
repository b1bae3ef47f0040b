mod logging;
mod output;
mod params;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use bms_sizing::{
    AdvancedConfig, AuxiliaryParameters, BaseCapacity, CaseRegistry, MissionCaseConfig,
    MissionInputs, Rendered, calculate, render, size_advanced,
};
use clap::Parser;
use tracing::{debug, info};

use output::Format;

/// Generates BMS requirement snippets for a spacecraft battery.
#[derive(Parser, Debug)]
#[command(name = "bms-snippet", version, about)]
struct Args {
    /// Orbital period (min)
    #[arg(long)]
    period: f64,

    /// Eclipse duration (min)
    #[arg(long)]
    eclipse: f64,

    /// Average payload power during eclipse (W)
    #[arg(long)]
    power: f64,

    /// Nominal battery voltage (V)
    #[arg(long)]
    voltage: f64,

    /// Mission case to compute; repeat for several. Defaults to every built-in case.
    #[arg(long = "case", value_name = "NAME")]
    cases: Vec<String>,

    /// Renderings to print
    #[arg(long, value_enum, default_value_t = Format::Both)]
    format: Format,

    /// Write one .md and one .json per case into this directory
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Run the advanced sizing chain and include its sections
    #[arg(long)]
    advanced: bool,

    /// Auxiliary parameter file (.toml or .json); unset fields use recommended values
    #[arg(long, value_name = "FILE", requires = "advanced")]
    params: Option<PathBuf>,

    /// Fail when a requested current exceeds the cell limits
    #[arg(long, requires = "advanced")]
    strict: bool,
}

fn main() -> Result<()> {
    logging::init();
    run(&Args::parse())
}

fn run(args: &Args) -> Result<()> {
    let inputs = MissionInputs::new(args.period, args.eclipse, args.power, args.voltage)
        .context("invalid mission inputs")?;
    let cases = selected_cases(CaseRegistry::builtin(), &args.cases)?;
    let config = if args.advanced {
        Some(advanced_config(args)?)
    } else {
        None
    };

    let mut stdout = io::stdout().lock();
    for case in cases {
        let rendered = render_case(&inputs, case, config.as_ref(), args.strict)?;
        output::print(&mut stdout, case.name(), &rendered, args.format)?;
        if let Some(dir) = &args.out {
            output::write_files(dir, case.name(), &rendered)?;
        }
    }
    Ok(())
}

fn selected_cases<'a>(
    registry: &'a CaseRegistry,
    names: &[String],
) -> Result<Vec<&'a MissionCaseConfig>> {
    if names.is_empty() {
        return Ok(registry.iter().collect());
    }
    names
        .iter()
        .map(|name| registry.get(name).map_err(Into::into))
        .collect()
}

fn advanced_config(args: &Args) -> Result<AdvancedConfig> {
    let params = match &args.params {
        Some(path) => params::load(path)?,
        None => AuxiliaryParameters::default(),
    };
    let defaults = AuxiliaryParameters {
        target_pack_voltage_v: Some(args.voltage),
        ..AuxiliaryParameters::recommended()
    };

    let config = AdvancedConfig::try_from(params.with_fallback(defaults))
        .context("invalid advanced sizing parameters")?;
    debug!(?config, "validated advanced sizing parameters");
    Ok(config)
}

fn render_case(
    inputs: &MissionInputs,
    case: &MissionCaseConfig,
    config: Option<&AdvancedConfig>,
    strict: bool,
) -> Result<Rendered> {
    let snippet = calculate(inputs, case)?;
    let Some(config) = config else {
        return Ok(Rendered {
            markdown: snippet.rendered_md().to_owned(),
            json: snippet.rendered_json().to_owned(),
        });
    };

    let mut result = size_advanced(&BaseCapacity::from(&snippet), config)
        .with_context(|| format!("failed to size the pack for mission case `{}`", case.name()))?;
    if strict {
        result = result
            .ensure_within_bounds()
            .with_context(|| format!("mission case `{}` exceeds cell current limits", case.name()))?;
    }
    info!(
        case = case.name(),
        string_config = %result.cell_level.string_config,
        violations = result.violations.len(),
        "sized pack"
    );
    Ok(render(&snippet, Some(&result))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let base = [
            "bms-snippet",
            "--period",
            "90",
            "--eclipse",
            "35",
            "--power",
            "200",
            "--voltage",
            "28",
        ];
        Args::try_parse_from(base.iter().chain(extra)).unwrap()
    }

    #[test]
    fn defaults() {
        let args = args(&[]);
        assert_eq!(args.format, Format::Both);
        assert!(args.cases.is_empty());
        assert!(!args.advanced);
        assert!(args.out.is_none());
    }

    #[test]
    fn inputs_are_required() {
        assert!(Args::try_parse_from(["bms-snippet", "--period", "90"]).is_err());
    }

    #[test]
    fn params_require_advanced() {
        let parsed = Args::try_parse_from([
            "bms-snippet",
            "--period",
            "90",
            "--eclipse",
            "35",
            "--power",
            "200",
            "--voltage",
            "28",
            "--params",
            "aux.toml",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn case_selection() {
        let registry = CaseRegistry::builtin();
        assert_eq!(selected_cases(registry, &[]).unwrap().len(), 2);

        let picked = selected_cases(registry, &["long-lived-low-power".into()]).unwrap();
        assert_eq!(picked[0].name(), "long_lived_low_power");

        assert!(selected_cases(registry, &["unknown".into()]).is_err());
    }

    #[test]
    fn target_voltage_defaults_to_battery_voltage() {
        let config = advanced_config(&args(&["--advanced"])).unwrap();
        assert_eq!(
            config.target_pack_voltage(),
            MissionInputs::new(90.0, 35.0, 200.0, 28.0)
                .unwrap()
                .voltage()
        );
    }

    #[test]
    fn advanced_rendering_includes_sizing() {
        let args = args(&["--advanced", "--case", "short_lived_high_power"]);
        let inputs = MissionInputs::new(args.period, args.eclipse, args.power, args.voltage).unwrap();
        let config = advanced_config(&args).unwrap();
        let case = CaseRegistry::builtin().get("short_lived_high_power").unwrap();

        let rendered = render_case(&inputs, case, Some(&config), true).unwrap();
        assert!(rendered.markdown.contains("### Sizing summary"));
        assert!(rendered.json.contains("\"advanced\""));
    }
}
