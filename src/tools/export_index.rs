use crate::error::Result;
use crate::state::IndexState;
use anyhow::Context;
use rmcp::schemars;
use serde::Deserialize;

/// DO NOT add doc comments to individual variants - this causes schemars to generate
/// `oneOf` schemas instead of simple `enum` arrays, breaking MCP client enum handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Js,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "js" | "javascript" => Ok(Self::Js),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown export format '{}' (expected js or json)", other)),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportIndexRequest {
    /// Path to a search_index.js file
    pub path: String,
    /// Output format: js (generator layout) or json
    #[serde(default)]
    pub format: ExportFormat,
}

/// Re-serializes a loaded index as JavaScript or JSON.
pub async fn handle_export_index(
    state: &IndexState,
    request: ExportIndexRequest,
) -> Result<String> {
    let loaded = super::load(state, &request.path).await?;
    match request.format {
        ExportFormat::Js => loaded.index.to_js(),
        ExportFormat::Json => loaded.index.to_json().map(|mut json| {
            json.push('\n');
            json
        }),
    }
    .context("Failed to serialize search index")
}
