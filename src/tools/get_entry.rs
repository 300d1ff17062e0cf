use crate::error::Result;
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Maximum number of "did you mean" suggestions.
const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetEntryRequest {
    /// Path to a search_index.js file
    pub path: String,
    /// Exact location string, e.g. "#Pkg.func-Tuple{Any}" or "" for the root page
    pub location: String,
}

/// Shows every entry stored at a location, with full text.
///
/// Several entries commonly share a location (the root page in particular), so all of
/// them are returned in generation order. A miss lists similar locations instead.
pub async fn handle_get_entry(state: &IndexState, request: GetEntryRequest) -> Result<String> {
    let loaded = super::load(state, &request.path).await?;
    let positions = loaded.pages.by_location(&request.location);

    if positions.is_empty() {
        let mut msg = format!(
            "No entry at location '{}' in {}.\n",
            request.location,
            loaded.path.display()
        );
        let suggestions = loaded
            .pages
            .suggest(&loaded.index, &request.location, MAX_SUGGESTIONS);
        if !suggestions.is_empty() {
            msg.push_str("\nDid you mean one of these?\n\n");
            for suggestion in suggestions {
                writeln!(msg, "• `{}` ({})", suggestion.location, suggestion.title)?;
            }
        }
        return Ok(msg);
    }

    let mut output = String::new();
    for (n, &pos) in positions.iter().enumerate() {
        let Some(entry) = loaded.index.get(pos) else {
            continue;
        };
        if n > 0 {
            output.push_str("\n---\n\n");
        }

        writeln!(output, "{}", super::display_title(entry))?;
        writeln!(output, "Page: {}", entry.page)?;
        writeln!(output, "Category: {}", entry.category)?;
        writeln!(output, "Entry: {}", pos)?;

        let location = entry.location();
        if let Some((symbol, signature)) = location.symbol() {
            writeln!(output, "Anchor: {}", symbol)?;
            if let Some(signature) = signature {
                writeln!(output, "Signature: {}", signature)?;
            }
        }

        let body = entry.body().trim_start();
        if !body.is_empty() {
            writeln!(output, "\n{}", body)?;
        }
    }

    Ok(output)
}
