//! On-disk cache of parsed search indexes.
//!
//! Cached indexes are postcard-encoded and keyed by the xxh3 digest of the source file,
//! so an edited index file simply misses and gets re-parsed. Cache failures are logged
//! and never fail a load.

use crate::digest::Digest;
use crate::error::LoadError;
use crate::index::document::io_error;
use crate::index::{Category, DocEntry, SearchIndex};
use postcard::{from_io, to_io};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File extension of cache entries.
const CACHE_EXTENSION: &str = "idx";

/// `(location, page, title, text, category)`.
type CachedEntry = (String, String, String, String, String);

/// Serialized form of a [`SearchIndex`].
///
/// Entries are stored as plain tuples: the JSON-facing serde impls of [`DocEntry`]
/// accept nulls, which a non-self-describing format cannot represent.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedIndex {
    digest: Digest,
    variable: Option<String>,
    docs: Vec<CachedEntry>,
}

impl CachedIndex {
    fn new(digest: Digest, index: &SearchIndex) -> Self {
        let docs = index
            .docs
            .iter()
            .map(|e| {
                (
                    e.location.clone(),
                    e.page.clone(),
                    e.title.clone(),
                    e.text.clone(),
                    e.category.as_str().to_string(),
                )
            })
            .collect();
        Self {
            digest,
            variable: index.variable.clone(),
            docs,
        }
    }

    fn into_index(self) -> SearchIndex {
        let docs = self
            .docs
            .into_iter()
            .map(|(location, page, title, text, category)| DocEntry {
                location,
                page,
                title,
                text,
                category: Category::from(category),
            })
            .collect();
        SearchIndex {
            variable: self.variable,
            docs,
        }
    }
}

/// Path of the cache entry for a digest.
pub fn cache_path(cache_dir: &Path, digest: Digest) -> PathBuf {
    cache_dir.join(format!("{}.{}", digest, CACHE_EXTENSION))
}

/// Load an index file, using the disk cache when `cache_dir` is set.
pub async fn load_or_parse(
    path: &Path,
    cache_dir: Option<&Path>,
) -> Result<SearchIndex, LoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| io_error(path, source))?;
    let digest = Digest::of(&bytes);

    let cached_at = cache_dir.map(|dir| cache_path(dir, digest));
    if let Some(cached_at) = &cached_at
        && let Some(index) = load(cached_at, digest).await
    {
        tracing::debug!(
            "Loaded cached search index for {} ({} entries)",
            path.display(),
            index.len()
        );
        return Ok(index);
    }

    let start = std::time::Instant::now();
    let source_path = path.to_path_buf();
    let index = tokio::task::spawn_blocking(move || {
        let text = String::from_utf8(bytes).map_err(|e| LoadError::Io {
            path: source_path,
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        SearchIndex::parse(&text)
    })
    .await
    .map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })??;

    tracing::info!(
        "Parsed search index {} ({} entries) in {:?}",
        path.display(),
        index.len(),
        start.elapsed()
    );

    if let Some(cached_at) = cached_at {
        store(&index, digest, cached_at).await;
    }

    Ok(index)
}

/// Read a cache entry. Entries that fail to decode or carry another digest are removed.
async fn load(path: &Path, digest: Digest) -> Option<SearchIndex> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return None;
    }

    let path = path.to_path_buf();
    // Deserialize in spawn_blocking since it's CPU intensive
    tokio::task::spawn_blocking(move || {
        let mut file = std::fs::File::open(&path).ok()?;
        let mut buf = [0u8; 8192];
        let decoded: postcard::Result<(CachedIndex, _)> = from_io((&mut file, &mut buf));
        match decoded {
            Ok((cached, _)) if cached.digest == digest => Some(cached.into_index()),
            Ok(_) => {
                tracing::warn!("Cached index at {} has a stale digest", path.display());
                let _ = std::fs::remove_file(&path);
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to deserialize cached index at {}: {}",
                    path.display(),
                    e
                );
                let _ = std::fs::remove_file(&path);
                None
            }
        }
    })
    .await
    .ok()?
}

/// Write a cache entry.
async fn store(index: &SearchIndex, digest: Digest, path: PathBuf) {
    let cached = CachedIndex::new(digest, index);

    // Serialize in spawn_blocking since it's CPU intensive
    let task = tokio::task::spawn_blocking(move || {
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!("Failed to create cache directory {}: {}", parent.display(), e);
            return;
        }

        match std::fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
        {
            Ok(mut file) => {
                if let Err(e) = to_io(&cached, &mut file) {
                    tracing::warn!("Failed to write cached index to {}: {}", path.display(), e);
                    let _ = std::fs::remove_file(&path);
                } else {
                    tracing::debug!("Cached search index to {}", path.display());
                }
            }
            Err(e) if e.kind() != std::io::ErrorKind::AlreadyExists => {
                tracing::warn!("Failed to create cache file {}: {}", path.display(), e);
            }
            _ => {
                // Already exists, another process may have created it
                tracing::debug!("Cache file already exists at {}", path.display());
            }
        }
    });

    if let Err(e) = task.await {
        tracing::warn!("Cache store task failed: {}", e);
    }
}
