//! Structural checks over a loaded index.
//!
//! Nothing here rejects an index outright. The checks report what a consumer would
//! want to know before relying on the data.

use super::document::SearchIndex;
use super::entry::{Category, DocEntry};
use ahash::AHashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// What a single issue is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    EmptyIndex,
    UnknownCategory(String),
    MissingCategory,
    EmptyPage,
    EmptyTitle,
    MultipleAnchors,
    /// Identical to the entry at the given position.
    Duplicate(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    /// Position of the offending entry, `None` for index-wide issues.
    pub entry: Option<usize>,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry {
            Some(pos) => write!(f, "{} [entry {}]: ", self.severity, pos)?,
            None => write!(f, "{}: ", self.severity)?,
        }
        match &self.kind {
            IssueKind::EmptyIndex => f.write_str("index has no entries"),
            IssueKind::UnknownCategory(c) => write!(f, "unrecognized category '{}'", c),
            IssueKind::MissingCategory => f.write_str("category is empty"),
            IssueKind::EmptyPage => f.write_str("page name is empty"),
            IssueKind::EmptyTitle => f.write_str("title is empty"),
            IssueKind::MultipleAnchors => f.write_str("location contains more than one '#'"),
            IssueKind::Duplicate(first) => write!(f, "duplicate of entry {}", first),
        }
    }
}

/// Result of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub entries: usize,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// True when no issue has error severity.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// Check an index. With `strict`, unrecognized categories are errors instead of warnings.
pub fn validate(index: &SearchIndex, strict: bool) -> ValidationReport {
    let mut issues = Vec::new();

    if index.is_empty() {
        issues.push(Issue {
            severity: Severity::Error,
            entry: None,
            kind: IssueKind::EmptyIndex,
        });
    }

    let mut seen: AHashMap<&DocEntry, usize> = AHashMap::with_capacity(index.len());
    for (pos, entry) in index.docs.iter().enumerate() {
        let mut push = |severity, kind| {
            issues.push(Issue {
                severity,
                entry: Some(pos),
                kind,
            });
        };

        match &entry.category {
            Category::Other(name) => push(
                if strict {
                    Severity::Error
                } else {
                    Severity::Warning
                },
                IssueKind::UnknownCategory(name.clone()),
            ),
            Category::Unspecified => push(Severity::Warning, IssueKind::MissingCategory),
            _ => {}
        }
        if entry.page.is_empty() {
            push(Severity::Warning, IssueKind::EmptyPage);
        }
        if entry.title.is_empty() {
            push(Severity::Warning, IssueKind::EmptyTitle);
        }
        if entry.location.matches('#').count() > 1 {
            push(Severity::Warning, IssueKind::MultipleAnchors);
        }
        if let Some(&first) = seen.get(entry) {
            push(Severity::Warning, IssueKind::Duplicate(first));
        } else {
            seen.insert(entry, pos);
        }
    }

    tracing::debug!(
        entries = index.len(),
        issues = issues.len(),
        "Validated search index"
    );

    ValidationReport {
        entries: index.len(),
        issues,
    }
}
