//! Page grouping and exact lookups over a loaded index.
//!
//! Entries are referenced by their position in [`SearchIndex::docs`], so a `PageIndex`
//! is only meaningful alongside the index it was built from.

use super::document::SearchIndex;
use super::entry::{Category, DocEntry};
use ahash::AHashMap;
use rapidfuzz::distance::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a location to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Entries sharing a page key: the location path plus the page name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGroup {
    pub path: String,
    pub page: String,
    /// Entry positions in generation order.
    pub entries: Vec<usize>,
}

/// Entry counts for an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub entries: usize,
    pub pages: usize,
    pub empty_text: usize,
    /// Count per category, in order of first appearance.
    pub per_category: Vec<(Category, usize)>,
}

/// A location close to a lookup that missed.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub location: String,
    pub title: String,
    pub score: f64,
}

/// Lookup tables derived from a [`SearchIndex`].
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    pages: Vec<PageGroup>,
    by_location: AHashMap<String, Vec<usize>>,
    stats: IndexStats,
}

impl PageIndex {
    pub fn build(index: &SearchIndex) -> Self {
        let start = std::time::Instant::now();

        let mut pages: Vec<PageGroup> = Vec::new();
        let mut page_slots: AHashMap<(&str, &str), usize> = AHashMap::new();
        let mut by_location: AHashMap<String, Vec<usize>> = AHashMap::new();
        let mut per_category: Vec<(Category, usize)> = Vec::new();
        let mut empty_text = 0;

        for (pos, entry) in index.docs.iter().enumerate() {
            let path = entry.location().path;
            let slot = *page_slots
                .entry((path, entry.page.as_str()))
                .or_insert_with(|| {
                    pages.push(PageGroup {
                        path: path.to_string(),
                        page: entry.page.clone(),
                        entries: Vec::new(),
                    });
                    pages.len() - 1
                });
            pages[slot].entries.push(pos);

            by_location
                .entry(entry.location.clone())
                .or_default()
                .push(pos);

            match per_category.iter_mut().find(|(c, _)| *c == entry.category) {
                Some((_, count)) => *count += 1,
                None => per_category.push((entry.category.clone(), 1)),
            }

            if entry.text.trim().is_empty() {
                empty_text += 1;
            }
        }

        let stats = IndexStats {
            entries: index.len(),
            pages: pages.len(),
            empty_text,
            per_category,
        };

        tracing::debug!(
            "Built page index: {} pages, {} locations in {:?}",
            pages.len(),
            by_location.len(),
            start.elapsed()
        );

        Self {
            pages,
            by_location,
            stats,
        }
    }

    pub fn pages(&self) -> &[PageGroup] {
        &self.pages
    }

    pub const fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Positions of every entry whose location equals `location` exactly.
    pub fn by_location(&self, location: &str) -> &[usize] {
        self.by_location
            .get(location)
            .map_or(&[] as &[usize], Vec::as_slice)
    }

    /// Groups whose page name equals `page`. Several paths may share a page name.
    pub fn by_page<'a>(&'a self, page: &'a str) -> impl Iterator<Item = &'a PageGroup> + 'a {
        self.pages.iter().filter(move |group| group.page == page)
    }

    /// Entry positions of the given category, in generation order.
    pub fn by_category<'a>(
        index: &'a SearchIndex,
        category: &'a Category,
    ) -> impl Iterator<Item = usize> + 'a {
        index
            .docs
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.category == *category)
            .map(|(pos, _)| pos)
    }

    /// Locations (or titles) that resemble `query`, best first.
    ///
    /// Only meant for "did you mean" hints after an exact lookup fails.
    pub fn suggest(&self, index: &SearchIndex, query: &str, limit: usize) -> Vec<Suggestion> {
        let query = query.to_lowercase();
        let mut suggestions: Vec<Suggestion> = self
            .by_location
            .iter()
            .filter_map(|(location, positions)| {
                let entry: &DocEntry = positions.first().and_then(|&pos| index.get(pos))?;
                let score = similarity(&query, location).max(similarity(&query, &entry.title));
                (score >= SUGGESTION_THRESHOLD).then(|| Suggestion {
                    location: location.clone(),
                    title: entry.title.clone(),
                    score,
                })
            })
            .collect();

        suggestions.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.location.cmp(&b.location))
        });
        suggestions.truncate(limit);
        suggestions
    }
}

fn similarity(query: &str, candidate: &str) -> f64 {
    jaro_winkler::similarity(query.chars(), candidate.to_lowercase().chars())
}
