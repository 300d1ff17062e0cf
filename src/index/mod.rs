//! Search index data model, loading, and exact lookups.
//!
//! This module covers the consumer side of a static documentation search index:
//! parsing the generator's output, checking its structure, and grouping entries by page.

pub(crate) mod document;
pub(crate) mod entry;
pub(crate) mod pages;
pub(crate) mod validate;

pub use document::{DEFAULT_VARIABLE, SearchIndex};
pub use entry::{Category, DocEntry, Location};
pub use pages::{IndexStats, PageGroup, PageIndex, Suggestion};
pub use validate::{Issue, IssueKind, Severity, ValidationReport, validate};
