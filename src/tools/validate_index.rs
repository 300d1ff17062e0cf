use crate::error::Result;
use crate::index::{ValidationReport, validate};
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateIndexRequest {
    /// Path to a search_index.js file
    pub path: String,
    /// Treat unrecognized categories as errors (defaults to the configured mode)
    #[serde(default)]
    pub strict: Option<bool>,
}

/// Runs the structural checks and returns the report alongside its rendering.
pub async fn run_validate_index(
    state: &IndexState,
    request: &ValidateIndexRequest,
) -> Result<(ValidationReport, String)> {
    let loaded = super::load(state, &request.path).await?;
    let strict = request.strict.unwrap_or(state.config().strict);
    let report = validate(&loaded.index, strict);

    let mut output = String::new();
    let verdict = if report.is_valid() { "valid" } else { "INVALID" };
    writeln!(
        output,
        "{}: {} ({} entries, {} errors, {} warnings)",
        loaded.path.display(),
        verdict,
        report.entries,
        report.errors().count(),
        report.warnings().count()
    )?;
    for issue in &report.issues {
        writeln!(output, "  {}", issue)?;
    }

    Ok((report, output))
}

/// Validates an index and renders the report.
pub async fn handle_validate_index(
    state: &IndexState,
    request: ValidateIndexRequest,
) -> Result<String> {
    run_validate_index(state, &request)
        .await
        .map(|(_, output)| output)
}
