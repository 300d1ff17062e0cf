//! Operation handlers shared by the MCP server and the command line.
//!
//! Each handler takes the shared [`IndexState`](crate::state::IndexState) and a request,
//! and renders a plain-text response.

pub mod discover_indexes;
pub mod export_index;
pub mod get_entry;
pub mod list_entries;
pub mod list_pages;
pub mod load_index;
pub mod validate_index;

pub use discover_indexes::*;
pub use export_index::*;
pub use get_entry::*;
pub use list_entries::*;
pub use list_pages::*;
pub use load_index::*;
pub use validate_index::*;

use crate::error::Result;
use crate::index::DocEntry;
use crate::state::{IndexState, LoadedIndex};
use anyhow::anyhow;
use std::fmt::Write as _;
use std::sync::Arc;

/// Load an index through the shared state, turning the message into an error.
pub(crate) async fn load(state: &IndexState, path: &str) -> Result<Arc<LoadedIndex>> {
    state.get(path).await.map_err(|e| anyhow!(e))
}

/// One-line rendering of an entry: position, category, title and location.
pub(crate) fn write_entry_line(output: &mut String, pos: usize, entry: &DocEntry) -> Result<()> {
    let category = if entry.category.as_str().is_empty() {
        "-"
    } else {
        entry.category.as_str()
    };
    write!(output, "[{}] ({}) {}", pos, category, display_title(entry))?;
    if !entry.location.is_empty() {
        write!(output, "  @ {}", entry.location)?;
    }
    writeln!(output)?;
    Ok(())
}

pub(crate) fn display_title(entry: &DocEntry) -> &str {
    if entry.title.is_empty() {
        &entry.page
    } else {
        &entry.title
    }
}

/// Truncate to at most `max_chars` characters, breaking at a space where possible.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(i, _)| i);
    let head = &text[..cut];
    match head.rfind(' ') {
        Some(pos) if pos > 0 => format!("{}...", &head[..pos]),
        _ => format!("{}...", head),
    }
}
