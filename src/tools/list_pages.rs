use crate::error::Result;
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListPagesRequest {
    /// Path to a search_index.js file
    pub path: String,
}

/// Lists the pages of an index in generation order with their entry counts.
pub async fn handle_list_pages(state: &IndexState, request: ListPagesRequest) -> Result<String> {
    let loaded = super::load(state, &request.path).await?;
    let pages = loaded.pages.pages();

    if pages.is_empty() {
        return Ok(format!("No pages in {}.\n", loaded.path.display()));
    }

    let mut output = format!("Pages in {} ({}):\n\n", loaded.path.display(), pages.len());
    for (idx, group) in pages.iter().enumerate() {
        let path = if group.path.is_empty() {
            "(root)"
        } else {
            group.path.as_str()
        };
        let page = if group.page.is_empty() {
            "(untitled)"
        } else {
            group.page.as_str()
        };
        writeln!(
            output,
            "{}. {} [{}] - {} entries",
            idx + 1,
            page,
            path,
            group.entries.len()
        )?;
    }

    Ok(output)
}
