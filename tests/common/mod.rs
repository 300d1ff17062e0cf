//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test gets a fresh temporary directory holding its own copy of the index files
//! and its own postcard cache directory, so cached entries never leak between tests.
//!
//! # Available Fixtures
//!
//! - `workspace`: temp dir with the single-page fixture at `docs/build/search_index.js`
//!   and a two-page index at `multi/build/search_index.js`
//! - `state`: an `IndexState` whose disk cache lives inside the workspace

use docindex_mcp::{Config, IndexState};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Returns the project root directory (where Cargo.toml lives).
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// The generator output checked into `tests/fixtures`.
pub fn fixture_text() -> String {
    std::fs::read_to_string(project_root().join("tests/fixtures/search_index.js"))
        .expect("Failed to read fixture index")
}

/// A two-page index with a shared root location and an unknown category.
pub const MULTI_PAGE_INDEX: &str = r#"var documenterSearchIndex = {"docs":
[{"location":"","page":"Home","title":"Home","text":"Welcome.","category":"page"},{"location":"guide/","page":"Guide","title":"Guide","text":"How to use it.","category":"page"},{"location":"guide/#Installation","page":"Guide","title":"Installation","text":"Run add.","category":"section"},{"location":"api/#Pkg.solve-Tuple{Any}","page":"API","title":"Pkg.solve","text":"solve(x)\n\nSolve the thing.\n\n\n\n","category":"method"},{"location":"api/#Pkg.Solver","page":"API","title":"Pkg.Solver","text":"","category":"type"},{"location":"api/#Pkg.helper","page":"API","title":"Pkg.helper","text":"","category":"gadget"}]
}
"#;

/// A temporary workspace directory for test isolation.
///
/// Provides basic filesystem operations within a temp directory that is
/// automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content, including parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn create_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Path inside the workspace as a `String`, the form tool requests take.
    pub fn path_str(&self, rel: &str) -> String {
        self.root.join(rel).display().to_string()
    }

    /// Directory used for the postcard cache.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(".cache")
    }
}

#[fixture]
pub fn workspace() -> TempWorkspace {
    let workspace = TempWorkspace::new();
    workspace.create_file("docs/build/search_index.js", &fixture_text());
    workspace.create_file("multi/build/search_index.js", MULTI_PAGE_INDEX);
    workspace
}

/// Config pointing the disk cache into the workspace.
pub fn config_for(workspace: &TempWorkspace) -> Config {
    Config {
        cache_dir: Some(workspace.cache_dir()),
        cache_capacity: 4,
        default_limit: 25,
        strict: false,
        ..Config::default()
    }
}

#[fixture]
pub fn state(workspace: TempWorkspace) -> (TempWorkspace, Arc<IndexState>) {
    let state = Arc::new(IndexState::new(config_for(&workspace)));
    (workspace, state)
}
