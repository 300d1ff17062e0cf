//! Loading and writing whole search index files.
//!
//! Index files come in two shapes:
//! - a JavaScript assignment, `var documenterSearchIndex = {"docs": [...]}`
//! - the bare JSON object, `{"docs": [...]}`

use super::entry::DocEntry;
use crate::error::LoadError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// Variable name used when writing an index that was not read from a JS assignment.
pub const DEFAULT_VARIABLE: &str = "documenterSearchIndex";

/// Matches `var NAME =` (or `let`/`const`) at the start of the file.
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:var|let|const)\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*")
        .expect("assignment pattern is valid")
});

/// A parsed search index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    /// JavaScript variable the index was assigned to, if it came from a JS file.
    pub variable: Option<String>,
    /// Entries in generation order.
    pub docs: Vec<DocEntry>,
}

/// Top-level JSON container. `docs` is optional here so its absence gets a precise error.
#[derive(Deserialize)]
struct Container {
    docs: Option<Vec<DocEntry>>,
}

#[derive(Serialize)]
struct ContainerRef<'a> {
    docs: &'a [DocEntry],
}

impl SearchIndex {
    pub fn new(docs: Vec<DocEntry>) -> Self {
        Self {
            variable: None,
            docs,
        }
    }

    /// Parse index text in either the JS-assignment or bare JSON form.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let (variable, payload) = split_assignment(text)?;

        let container: Container = serde_json::from_str(payload)?;
        let docs = container.docs.ok_or(LoadError::MissingDocs)?;

        Ok(Self { variable, docs })
    }

    /// Read and parse an index file.
    pub async fn load(path: &Path) -> Result<Self, LoadError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| io_error(path, source))?;

        // Large indexes take a while to deserialize
        tokio::task::spawn_blocking(move || Self::parse(&text))
            .await
            .map_err(|e| LoadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::other(e),
            })?
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&DocEntry> {
        self.docs.get(position)
    }

    /// Render in the generator's JavaScript layout.
    pub fn to_js(&self) -> Result<String, serde_json::Error> {
        let variable = self.variable.as_deref().unwrap_or(DEFAULT_VARIABLE);
        let docs = serde_json::to_string(&self.docs)?;
        Ok(format!("var {} = {{\"docs\":\n{}\n}}\n", variable, docs))
    }

    /// Render as a pretty-printed JSON object.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&ContainerRef { docs: &self.docs })
    }
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    if source.kind() == std::io::ErrorKind::NotFound {
        LoadError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Separate the optional `var NAME =` prefix and trailing `;` from the JSON payload.
fn split_assignment(text: &str) -> Result<(Option<String>, &str), LoadError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        return Ok((None, trim_terminator(trimmed)));
    }

    let Some(captures) = ASSIGNMENT.captures(text) else {
        let preview: String = trimmed.chars().take(40).collect();
        return Err(LoadError::Wrapper(preview));
    };

    // Group 0 always exists on a match
    let whole = captures.get(0).map_or(0, |m| m.end());
    let variable = captures.get(1).map(|m| m.as_str().to_string());
    Ok((variable, trim_terminator(&text[whole..])))
}

fn trim_terminator(payload: &str) -> &str {
    let payload = payload.trim_end();
    payload.strip_suffix(';').unwrap_or(payload).trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::entry::Category;
    use assert2::{check, let_assert};
    use rstest::rstest;

    const SAMPLE: &str = r##"var documenterSearchIndex = {"docs":
[{"location":"","page":"Home","title":"Home","text":"CurrentModule = SpatialHashing","category":"page"},{"location":"#SpatialHashing","page":"Home","title":"SpatialHashing","text":"","category":"section"}]
}
"##;

    #[test]
    fn parses_generator_output() {
        let_assert!(Ok(index) = SearchIndex::parse(SAMPLE));
        check!(index.variable.as_deref() == Some("documenterSearchIndex"));
        check!(index.len() == 2);
        check!(index.docs[0].text == "CurrentModule = SpatialHashing");
        check!(index.docs[1].category == Category::Section);
    }

    #[rstest]
    #[case(r#"{"docs": []}"#, None)]
    #[case("  \n{\"docs\": []};\n", None)]
    #[case("var idx = {\"docs\": []};", Some("idx"))]
    #[case("let $idx={\"docs\": []}", Some("$idx"))]
    #[case("const search_index = {\"docs\": []} ;  \n", Some("search_index"))]
    #[case("\u{feff}var documenterSearchIndex = {\"docs\": []}", Some("documenterSearchIndex"))]
    fn accepts_wrappers(#[case] text: &str, #[case] variable: Option<&str>) {
        let_assert!(Ok(index) = SearchIndex::parse(text));
        check!(index.variable.as_deref() == variable);
        check!(index.is_empty());
    }

    #[rstest]
    #[case("window.index = {\"docs\": []}")]
    #[case("docs = []")]
    #[case("")]
    fn rejects_unknown_wrappers(#[case] text: &str) {
        let_assert!(Err(LoadError::Wrapper(_)) = SearchIndex::parse(text));
    }

    #[test]
    fn missing_docs_is_reported() {
        let_assert!(Err(LoadError::MissingDocs) = SearchIndex::parse(r#"{"entries": []}"#));
    }

    #[test]
    fn truncated_json_is_reported() {
        let text = "var documenterSearchIndex = {\"docs\": [{\"location\": \"\"";
        let_assert!(Err(LoadError::Json(_)) = SearchIndex::parse(text));
    }

    #[test]
    fn js_output_reparses_identically() {
        let_assert!(Ok(first) = SearchIndex::parse(SAMPLE));
        let_assert!(Ok(js) = first.to_js());
        check!(js.starts_with("var documenterSearchIndex = {\"docs\":\n["));
        let_assert!(Ok(second) = SearchIndex::parse(&js));
        check!(first == second);
    }

    #[test]
    fn js_output_defaults_variable_name() {
        let index = SearchIndex::new(vec![DocEntry::default()]);
        let_assert!(Ok(js) = index.to_js());
        check!(js.starts_with("var documenterSearchIndex = "));
        check!(js.contains(r#""category":"""#));
    }

    #[test]
    fn json_output_has_docs_key_only() {
        let_assert!(Ok(index) = SearchIndex::parse(SAMPLE));
        let_assert!(Ok(json) = index.to_json());
        let_assert!(Ok(value) = serde_json::from_str::<serde_json::Value>(&json));
        let_assert!(Some(object) = value.as_object());
        check!(object.len() == 1);
        check!(object["docs"].as_array().map(Vec::len) == Some(2));
    }
}
