//! Shared state for loaded indexes.
//!
//! Tool handlers ask [`IndexState`] for an index by path. Parsed indexes are kept in an
//! LRU keyed by canonical path, and concurrent requests for the same file share a
//! single in-flight load.

use crate::cache;
use crate::config::Config;
use crate::index::{PageIndex, SearchIndex};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use lru::LruCache;
use std::borrow::Cow;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::{Mutex, RwLock};

/// Type alias for shared index loading futures.
type SharedLoad = Shared<BoxFuture<'static, Result<Arc<LoadedIndex>, String>>>;

/// Size and modification time of a source file, used to notice rebuilt indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceStamp {
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        Self {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        }
    }

    /// Stat `path`. `None` when the file cannot be read.
    pub async fn of(path: &Path) -> Option<Self> {
        tokio::fs::metadata(path)
            .await
            .ok()
            .map(|metadata| Self::from_metadata(&metadata))
    }
}

/// A parsed index together with its lookup tables.
#[derive(Debug)]
pub struct LoadedIndex {
    pub path: PathBuf,
    pub index: SearchIndex,
    pub pages: PageIndex,
    /// Source file state when the index was read.
    pub stamp: Option<SourceStamp>,
}

impl LoadedIndex {
    pub fn new(path: PathBuf, index: SearchIndex, stamp: Option<SourceStamp>) -> Self {
        let pages = PageIndex::build(&index);
        Self {
            path,
            index,
            pages,
            stamp,
        }
    }

    /// Whether the source file still matches what was loaded.
    async fn is_current(&self) -> bool {
        self.stamp.is_some() && SourceStamp::of(&self.path).await == self.stamp
    }
}

/// Shared state for index loading and caching.
pub struct IndexState {
    config: Config,

    /// LRU cache of loaded indexes
    cache: RwLock<LruCache<PathBuf, Arc<LoadedIndex>>>,

    /// In-flight loads (can be awaited by multiple callers)
    in_flight: Mutex<HashMap<PathBuf, SharedLoad>>,
}

impl std::fmt::Debug for IndexState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexState")
            .field("config", &self.config)
            .field("cache_size", &self.cache.try_read().map(|c| c.len()).ok())
            .finish_non_exhaustive()
    }
}

impl IndexState {
    pub fn new(config: Config) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            config,
            cache: RwLock::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Get a loaded index, waiting for an in-flight load if needed.
    ///
    /// 1. Resolves `~` and canonicalizes the path
    /// 2. Checks the LRU cache, evicting the entry if the file changed since it was read
    /// 3. Joins an in-flight load for the same file, or starts one
    pub async fn get(&self, path: &str) -> Result<Arc<LoadedIndex>, String> {
        let path = resolve_path(path).await?;

        let cached = self.cache.write().await.get(&path).cloned();
        if let Some(loaded) = cached {
            if loaded.is_current().await {
                tracing::debug!("Cache hit for {}", path.display());
                return Ok(loaded);
            }
            tracing::info!("Search index {} changed on disk, reloading", path.display());
            let mut cache = self.cache.write().await;
            if cache.peek(&path).is_some_and(|current| Arc::ptr_eq(current, &loaded)) {
                cache.pop(&path);
            }
        }

        let future = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(future) = in_flight.get(&path) {
                tracing::debug!("Awaiting in-flight load for {}", path.display());
                future.clone()
            } else {
                let future = load_future(path.clone(), self.config.cache_dir.clone());
                in_flight.insert(path.clone(), future.clone());
                future
            }
        };

        let result = future.await;

        // Publish to the cache before retiring the in-flight entry so no caller misses both
        if let Ok(loaded) = &result {
            self.cache.write().await.put(path.clone(), loaded.clone());
        }
        self.in_flight.lock().await.remove(&path);

        result
    }

    /// Check if an index is cached, without loading it.
    pub async fn is_cached(&self, path: &Path) -> bool {
        self.cache.read().await.contains(path)
    }

    /// Drop all loaded indexes.
    pub async fn clear(&self) {
        self.cache.write().await.clear();
        self.in_flight.lock().await.clear();
    }
}

fn load_future(path: PathBuf, cache_dir: Option<PathBuf>) -> SharedLoad {
    let future: BoxFuture<'static, Result<Arc<LoadedIndex>, String>> = Box::pin(async move {
        tracing::info!("Loading search index {}", path.display());
        // Stamp before reading so a write racing the load is seen as a change next time
        let stamp = SourceStamp::of(&path).await;
        let index = cache::load_or_parse(&path, cache_dir.as_deref())
            .await
            .map_err(|e| e.to_string())?;
        Ok(Arc::new(LoadedIndex::new(path, index, stamp)))
    });
    future.shared()
}

async fn resolve_path(path: &str) -> Result<PathBuf, String> {
    let expanded = expand_tilde(path.trim());
    tokio::fs::canonicalize(expanded.as_ref())
        .await
        .map_err(|e| format!("Cannot open search index '{}': {}", path, e))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
///
/// Returns `Cow::Borrowed` if no expansion needed, `Cow::Owned` if expanded.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
