//! Markdown and JSON rendering of requirement snippets.
//!
//! Both documents are produced from one serializable record whose numbers are
//! rounded once, so every number in the JSON also appears in the Markdown.

mod markdown;
mod record;

use crate::{
    advanced::AdvancedSizingResult, base::DerivedRequirements, case::MissionCaseConfig,
    error::BmsError, mission::MissionInputs, snippet::BmsRequirementSnippet,
};

use record::SnippetRecord;

/// A snippet rendered as Markdown and as pretty-printed JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub markdown: String,
    pub json: String,
}

/// Renders `snippet`, with the advanced sizing sections when `advanced` is given.
///
/// # Errors
///
/// Returns [`BmsError::Render`] if either document cannot be produced.
pub fn render(
    snippet: &BmsRequirementSnippet,
    advanced: Option<&AdvancedSizingResult>,
) -> Result<Rendered, BmsError> {
    render_parts(snippet.inputs(), snippet.case(), snippet.derived(), advanced)
}

pub(crate) fn render_parts(
    inputs: &MissionInputs,
    case: &MissionCaseConfig,
    derived: &DerivedRequirements,
    advanced: Option<&AdvancedSizingResult>,
) -> Result<Rendered, BmsError> {
    let record = SnippetRecord::new(inputs, case, derived, advanced);

    let json =
        serde_json::to_string_pretty(&record).map_err(|err| BmsError::Render(err.to_string()))?;
    let markdown = markdown::write(&record).map_err(|err| BmsError::Render(err.to_string()))?;

    Ok(Rendered { markdown, json })
}
