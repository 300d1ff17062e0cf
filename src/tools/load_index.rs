//! Summary of a search index file.

use crate::error::Result;
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadIndexRequest {
    /// Path to a search_index.js file
    pub path: String,
}

/// Loads (or reuses) an index and reports its size, pages and categories.
pub async fn handle_load_index(state: &IndexState, request: LoadIndexRequest) -> Result<String> {
    let loaded = super::load(state, &request.path).await?;
    let stats = loaded.pages.stats();

    let mut output = String::new();
    writeln!(output, "Search index: {}", loaded.path.display())?;
    if let Some(variable) = &loaded.index.variable {
        writeln!(output, "Variable: {}", variable)?;
    }
    writeln!(output, "Entries: {}", stats.entries)?;
    writeln!(output, "Pages: {}", stats.pages)?;
    writeln!(output, "Entries without text: {}", stats.empty_text)?;

    if !stats.per_category.is_empty() {
        writeln!(output, "\nCategories:")?;
        for (category, count) in &stats.per_category {
            let name = if category.as_str().is_empty() {
                "(none)"
            } else {
                category.as_str()
            };
            writeln!(output, "  • {}: {}", name, count)?;
        }
    }

    Ok(output)
}
