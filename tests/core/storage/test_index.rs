// Integration tests for building and reopening the page index

use crate::common::TestSite;
use hugo_search::core::error::SearchError;
use hugo_search::core::storage::{is_index_dir, IndexManifest, PageIndex, MANIFEST_FILE, SCHEMA_VERSION};

#[test]
fn test_open_or_build_creates_index() {
    let site = TestSite::blog();
    let config = site.config();

    let (index, stats) = PageIndex::open_or_build(&config, false).unwrap();
    let stats = stats.expect("first start should build");

    assert_eq!(stats.pages_indexed, 5);
    assert_eq!(index.doc_count(), 5);
    assert!(is_index_dir(&site.index_path()));
    assert!(site.index_path().join(MANIFEST_FILE).is_file());

    let manifest = index.manifest();
    assert_eq!(manifest.schema_version, SCHEMA_VERSION);
    assert_eq!(manifest.pages_indexed, 5);
    assert_eq!(manifest.site_path, site.path());
}

#[test]
fn test_open_or_build_reuses_existing_index() {
    let site = TestSite::blog();
    let config = site.config();

    drop(PageIndex::open_or_build(&config, false).unwrap());

    // New content is not picked up without a rebuild
    site.write_page("posts/new.md", "---\ntitle: New\n---\nfresh");
    let (index, stats) = PageIndex::open_or_build(&config, false).unwrap();

    assert!(stats.is_none());
    assert_eq!(index.doc_count(), 5);
}

#[test]
fn test_forced_rebuild_picks_up_new_content() {
    let site = TestSite::blog();
    let config = site.config();

    drop(PageIndex::open_or_build(&config, false).unwrap());

    site.write_page("posts/new.md", "---\ntitle: New\n---\nfresh");
    let (index, stats) = PageIndex::open_or_build(&config, true).unwrap();

    assert_eq!(stats.unwrap().pages_indexed, 6);
    assert_eq!(index.doc_count(), 6);
    assert_eq!(index.document("/posts/new/").unwrap()["title"], "New");
}

#[test]
fn test_outdated_schema_is_rebuilt() {
    let site = TestSite::blog();
    let config = site.config();

    drop(PageIndex::open_or_build(&config, false).unwrap());

    let manifest_path = site.index_path().join(MANIFEST_FILE);
    let mut manifest: IndexManifest =
        serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
    manifest.schema_version = 0;
    std::fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();

    assert!(matches!(
        PageIndex::open(&site.index_path()),
        Err(SearchError::StorageError(_))
    ));

    let (index, stats) = PageIndex::open_or_build(&config, false).unwrap();
    assert!(stats.is_some());
    assert_eq!(index.manifest().schema_version, SCHEMA_VERSION);
}

#[test]
fn test_corrupt_manifest_is_rebuilt() {
    let site = TestSite::blog();
    let config = site.config();

    drop(PageIndex::open_or_build(&config, false).unwrap());

    let manifest_path = site.index_path().join(MANIFEST_FILE);
    std::fs::write(&manifest_path, "{ not json").unwrap();

    assert!(matches!(
        PageIndex::open(&site.index_path()),
        Err(SearchError::StorageError(_))
    ));

    let (index, stats) = PageIndex::open_or_build(&config, false).unwrap();
    assert_eq!(stats.unwrap().pages_indexed, 5);
    assert_eq!(index.doc_count(), 5);
    assert_eq!(index.manifest().schema_version, SCHEMA_VERSION);
}

#[test]
fn test_missing_site_is_reported() {
    let site = TestSite::blog();
    let mut config = site.config();
    config.site.hugo_path = site.path().join("no-such-site");

    let result = PageIndex::open_or_build(&config, false);
    assert!(matches!(result, Err(SearchError::InvalidPath(_))));
}

#[test]
fn test_stored_document_fields() {
    let site = TestSite::blog();
    let (index, _) = PageIndex::open_or_build(&site.config(), false).unwrap();

    let doc = index.document("/posts/async-rust/").unwrap();

    assert_eq!(doc["uri"], "/posts/async-rust/");
    assert_eq!(doc["title"], "Async Rust");
    assert_eq!(doc["tags"], serde_json::json!(["rust", "async"]));
    assert_eq!(doc["section"], "posts");
    assert_eq!(doc["date"], "2024-03-01T10:00:00Z");

    // Top-level page: no section, no taxonomies, no date
    let about = index.document("/about/").unwrap();
    assert!(about.get("section").is_none());
    assert!(about.get("date").is_none());
    assert_eq!(about["tags"], serde_json::json!([]));
}
