//! Locating search index files inside documentation build trees.

use crate::error::Result;
use anyhow::Context;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// File name the documentation generator writes its index to.
pub const INDEX_FILE_NAME: &str = "search_index.js";

/// Find every `search_index.js` under `root`, sorted by path.
///
/// Hidden directories are skipped. Git ignore rules are not applied because build
/// output directories are usually ignored.
pub async fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = tokio::fs::metadata(root)
        .await
        .with_context(|| format!("Cannot access {}", root.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut found: Vec<PathBuf> = WalkBuilder::new(&root)
            .hidden(true)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .build()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
            .filter(|e| e.file_name() == INDEX_FILE_NAME)
            .map(ignore::DirEntry::into_path)
            .collect();

        found.sort();
        tracing::debug!("Discovered {} index files under {}", found.len(), root.display());
        Ok(found)
    })
    .await
    .context("Task panicked")?
}
