use crate::discovery::discover;
use crate::error::Result;
use crate::state::expand_tilde;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DiscoverIndexesRequest {
    /// Directory to search, e.g. a documentation build directory
    pub root: String,
}

/// Lists every search_index.js below a directory.
pub async fn handle_discover_indexes(request: DiscoverIndexesRequest) -> Result<String> {
    let root = expand_tilde(request.root.trim());
    let found = discover(Path::new(root.as_ref())).await?;

    if found.is_empty() {
        return Ok(format!("No search_index.js files found under {}.\n", root));
    }

    let mut output = format!("Found {} search index files under {}:\n\n", found.len(), root);
    for path in &found {
        writeln!(output, "• {}", path.display())?;
    }
    Ok(output)
}
