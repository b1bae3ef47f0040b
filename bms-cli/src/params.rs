//! Loading auxiliary sizing parameters from TOML or JSON files.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use bms_sizing::AuxiliaryParameters;
use tracing::debug;

/// Supported parameter file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsFormat {
    Toml,
    Json,
}

impl ParamsFormat {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    ///
    /// Fails if the extension is neither `toml` nor `json`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "unsupported parameter file `{}` (expected a .toml or .json extension)",
                path.display()
            ),
        }
    }
}

/// Reads and parses a parameter file.
///
/// Fields left out of the file stay unset; callers fill them from defaults.
///
/// # Errors
///
/// Fails if the file cannot be read, has an unsupported extension, or does
/// not parse.
pub fn load(path: &Path) -> Result<AuxiliaryParameters> {
    let format = ParamsFormat::from_path(path)?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter file `{}`", path.display()))?;

    let params = parse(&contents, format)
        .with_context(|| format!("failed to parse parameter file `{}`", path.display()))?;
    debug!(path = %path.display(), ?format, "loaded auxiliary parameters");
    Ok(params)
}

/// Parses parameters from a string in the given format.
///
/// # Errors
///
/// Fails on syntax errors, unknown fields, or values of the wrong type.
pub fn parse(contents: &str, format: ParamsFormat) -> Result<AuxiliaryParameters> {
    let params = match format {
        ParamsFormat::Toml => toml::from_str(contents)?,
        ParamsFormat::Json => serde_json::from_str(contents)?,
    };
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ParamsFormat::from_path(Path::new("aux.toml")).unwrap(),
            ParamsFormat::Toml
        );
        assert_eq!(
            ParamsFormat::from_path(Path::new("dir/AUX.JSON")).unwrap(),
            ParamsFormat::Json
        );
        assert!(ParamsFormat::from_path(Path::new("aux.yaml")).is_err());
        assert!(ParamsFormat::from_path(Path::new("aux")).is_err());
    }

    #[test]
    fn partial_toml() {
        let params = parse(
            r#"
            pack_loss_pct = 4.0
            redundancy = "none"
            cell_nominal_capacity_ah = 3.2
            "#,
            ParamsFormat::Toml,
        )
        .unwrap();

        assert_eq!(params.pack_loss_pct, Some(4.0));
        assert_eq!(params.redundancy.as_deref(), Some("none"));
        assert_eq!(params.cell_nominal_capacity_ah, Some(3.2));
        assert_eq!(params.ageing_derate_pct, None);
    }

    #[test]
    fn partial_json() {
        let params = parse(
            r#"{ "discharge_c_rate": 1.5, "target_pack_voltage_v": 50.0 }"#,
            ParamsFormat::Json,
        )
        .unwrap();

        assert_eq!(params.discharge_c_rate, Some(1.5));
        assert_eq!(params.target_pack_voltage_v, Some(50.0));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse("pack_losses = 4.0", ParamsFormat::Toml).is_err());
        assert!(parse(r#"{ "eol": 0.7 }"#, ParamsFormat::Json).is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "eol_factor = 0.75").unwrap();

        let params = load(file.path()).unwrap();
        assert_eq!(params.eol_factor, Some(0.75));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.json"));
    }
}
