use crate::error::Result;
use crate::index::Category;
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Width of the text preview shown under each entry.
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListEntriesRequest {
    /// Path to a search_index.js file
    pub path: String,
    /// Only entries with this category (e.g. "page", "section", "method")
    #[serde(default)]
    pub category: Option<String>,
    /// Only entries on the page with this name
    #[serde(default)]
    pub page: Option<String>,
    /// Maximum number of entries to return (default from configuration)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Lists entries in generation order, optionally filtered by category and page name.
pub async fn handle_list_entries(
    state: &IndexState,
    request: ListEntriesRequest,
) -> Result<String> {
    let loaded = super::load(state, &request.path).await?;
    let limit = request.limit.unwrap_or(state.config().default_limit);
    let category = request.category.as_deref().map(Category::from);

    let candidates: Vec<usize> = match request.page.as_deref() {
        Some(page) => {
            // A page name may span several paths; restore generation order across them
            let mut positions: Vec<usize> = loaded
                .pages
                .by_page(page)
                .flat_map(|group| group.entries.iter().copied())
                .collect();
            positions.sort_unstable();
            positions
        }
        None => (0..loaded.index.len()).collect(),
    };

    let matching: Vec<usize> = candidates
        .into_iter()
        .filter(|&pos| {
            loaded
                .index
                .get(pos)
                .is_some_and(|entry| category.as_ref().is_none_or(|c| entry.category == *c))
        })
        .collect();

    if matching.is_empty() {
        let mut msg = String::from("No entries found");
        if let Some(category) = &request.category {
            write!(msg, " with category '{}'", category)?;
        }
        if let Some(page) = &request.page {
            write!(msg, " on page '{}'", page)?;
        }
        writeln!(msg, " in {}.", loaded.path.display())?;

        let known: Vec<&str> = loaded
            .pages
            .stats()
            .per_category
            .iter()
            .map(|(c, _)| c.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        if !known.is_empty() {
            writeln!(msg, "Categories present: {}", known.join(", "))?;
        }
        return Ok(msg);
    }

    let mut output = format!(
        "{} entries in {} (showing {}):\n\n",
        matching.len(),
        loaded.path.display(),
        matching.len().min(limit)
    );
    for &pos in matching.iter().take(limit) {
        let Some(entry) = loaded.index.get(pos) else {
            continue;
        };
        super::write_entry_line(&mut output, pos, entry)?;
        if let Some(summary) = entry.summary() {
            writeln!(output, "    {}", super::truncate(summary, PREVIEW_CHARS))?;
        }
    }

    Ok(output)
}
