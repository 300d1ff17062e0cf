//! Tests for loading generator output end to end.

mod common;

use assert2::{check, let_assert};
use common::{MULTI_PAGE_INDEX, TempWorkspace, fixture_text, workspace};
use docindex_mcp::cache::load_or_parse;
use docindex_mcp::{Category, LoadError, PageIndex, SearchIndex};
use rstest::rstest;

#[test]
fn fixture_parses_with_all_fields() {
    let_assert!(Ok(index) = SearchIndex::parse(&fixture_text()));
    check!(index.variable.as_deref() == Some("documenterSearchIndex"));
    check!(index.len() == 7);
    check!(!index.is_empty());

    // Known categories only
    check!(index.docs.iter().all(|e| e.category.is_known()));
}

#[test]
fn fixture_order_is_generation_order() {
    let_assert!(Ok(index) = SearchIndex::parse(&fixture_text()));
    let titles: Vec<&str> = index.docs.iter().map(|e| e.title.as_str()).collect();
    check!(
        titles
            == vec![
                "Home",
                "SpatialHashing",
                "Home",
                "Home",
                "Home",
                "SpatialHashing.spatial_hash!",
                "SpatialHashing.spatial_hash",
            ]
    );
    check!(index.docs[0].text == "CurrentModule = SpatialHashing");
}

#[test]
fn parsing_twice_is_identical() {
    let text = fixture_text();
    let_assert!(Ok(first) = SearchIndex::parse(&text));
    let_assert!(Ok(second) = SearchIndex::parse(&text));
    check!(first == second);
}

#[test]
fn method_entries_carry_signatures() {
    let_assert!(Ok(index) = SearchIndex::parse(&fixture_text()));
    let methods: Vec<_> = PageIndex::by_category(&index, &Category::Method).collect();
    check!(methods == vec![5, 6]);

    let_assert!(Some((name, Some(signature))) = index.docs[5].location().symbol());
    check!(name == "SpatialHashing.spatial_hash!");
    check!(signature == "NTuple{5, Any}");
    check!(
        index.docs[5].summary()
            == Some("SpatialHashing.spatial_hash!(particles,h,limits,table,num_particles)")
    );
}

#[test]
fn export_reparses_to_same_index() {
    let_assert!(Ok(index) = SearchIndex::parse(MULTI_PAGE_INDEX));
    let_assert!(Ok(js) = index.to_js());
    let_assert!(Ok(again) = SearchIndex::parse(&js));
    check!(again == index);

    let_assert!(Ok(json) = index.to_json());
    let_assert!(Ok(from_json) = SearchIndex::parse(&json));
    check!(from_json.docs == index.docs);
    check!(from_json.variable.is_none());
}

#[rstest]
#[tokio::test]
async fn async_load_reads_file(workspace: TempWorkspace) {
    let path = workspace.path().join("docs/build/search_index.js");
    let_assert!(Ok(index) = SearchIndex::load(&path).await);
    check!(index.len() == 7);
}

#[rstest]
#[tokio::test]
async fn async_load_missing_file(workspace: TempWorkspace) {
    let path = workspace.path().join("docs/build/missing.js");
    let_assert!(Err(LoadError::NotFound { path: reported }) = SearchIndex::load(&path).await);
    check!(reported == path);
}

#[rstest]
#[tokio::test]
async fn cached_load_matches_direct_parse(workspace: TempWorkspace) {
    let path = workspace.path().join("multi/build/search_index.js");
    let cache_dir = workspace.cache_dir();

    let_assert!(Ok(direct) = SearchIndex::parse(MULTI_PAGE_INDEX));
    let_assert!(Ok(cold) = load_or_parse(&path, Some(&cache_dir)).await);
    let_assert!(Ok(warm) = load_or_parse(&path, Some(&cache_dir)).await);
    check!(cold == direct);
    check!(warm == direct);
}

#[rstest]
#[tokio::test]
async fn edited_file_misses_cache(workspace: TempWorkspace) {
    let path = workspace.path().join("multi/build/search_index.js");
    let cache_dir = workspace.cache_dir();

    let_assert!(Ok(before) = load_or_parse(&path, Some(&cache_dir)).await);
    workspace.create_file("multi/build/search_index.js", &fixture_text());
    let_assert!(Ok(after) = load_or_parse(&path, Some(&cache_dir)).await);

    check!(before.len() == 6);
    check!(after.len() == 7);
    check!(std::fs::read_dir(&cache_dir).unwrap().count() == 2);
}

#[rstest]
#[tokio::test]
async fn non_utf8_file_is_an_io_error(workspace: TempWorkspace) {
    let path = workspace.path().join("bad.js");
    std::fs::write(&path, b"var x = {\"docs\": [\xff]}").unwrap();
    let_assert!(Err(LoadError::Io { .. }) = load_or_parse(&path, None).await);
}
