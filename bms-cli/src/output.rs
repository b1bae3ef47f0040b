use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bms_sizing::Rendered;
use clap::ValueEnum;
use tracing::info;

const BANNER_WIDTH: usize = 60;

/// Which renderings to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Both,
    Json,
    Md,
}

impl Format {
    fn markdown(self) -> bool {
        matches!(self, Self::Both | Self::Md)
    }

    fn json(self) -> bool {
        matches!(self, Self::Both | Self::Json)
    }
}

/// Prints one case, framed by a banner, in the requested format.
///
/// # Errors
///
/// Fails if `out` cannot be written.
pub fn print(out: &mut impl Write, label: &str, rendered: &Rendered, format: Format) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "\n{rule}\n{label}\n{rule}")?;
    if format.markdown() {
        writeln!(out, "{}", rendered.markdown)?;
    }
    if format.json() {
        writeln!(out, "\n```json\n{}\n```", rendered.json)?;
    }
    Ok(())
}

/// Writes `<case>.md` and `<case>.json` into `dir`, creating it if needed.
///
/// # Errors
///
/// Fails if the directory or either file cannot be written.
pub fn write_files(dir: &Path, case: &str, rendered: &Rendered) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory `{}`", dir.display()))?;

    let md_path = dir.join(format!("{case}.md"));
    let json_path = dir.join(format!("{case}.json"));
    fs::write(&md_path, &rendered.markdown)
        .with_context(|| format!("failed to write `{}`", md_path.display()))?;
    fs::write(&json_path, &rendered.json)
        .with_context(|| format!("failed to write `{}`", json_path.display()))?;

    info!(markdown = %md_path.display(), json = %json_path.display(), "wrote snippet files");
    Ok((md_path, json_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered() -> Rendered {
        Rendered {
            markdown: "## BMS requirement snippet: demo".into(),
            json: "{\n  \"case\": \"demo\"\n}".into(),
        }
    }

    fn printed(format: Format) -> String {
        let mut buffer = Vec::new();
        print(&mut buffer, "demo", &rendered(), format).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn both_formats() {
        let text = printed(Format::Both);
        assert!(text.starts_with(&format!("\n{}\ndemo\n", "=".repeat(BANNER_WIDTH))));
        assert!(text.contains("## BMS requirement snippet: demo"));
        assert!(text.contains("```json\n{"));
    }

    #[test]
    fn single_format() {
        assert!(!printed(Format::Md).contains("```json"));
        assert!(!printed(Format::Json).contains("## BMS"));
    }

    #[test]
    fn files_are_named_after_the_case() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("snippets");

        let (md, json) = write_files(&out, "short_lived_high_power", &rendered()).unwrap();
        assert_eq!(md, out.join("short_lived_high_power.md"));
        assert_eq!(json, out.join("short_lived_high_power.json"));
        assert_eq!(fs::read_to_string(md).unwrap(), rendered().markdown);
        assert_eq!(fs::read_to_string(json).unwrap(), rendered().json);
    }
}
