// Page URL resolution as seen through the pipeline

use crate::common::TestSite;
use hugo_search::core::indexer::IndexingPipeline;

fn uris(pages: &[(&str, &str)]) -> Vec<String> {
    let site = TestSite::with_pages(pages);
    let pipeline = IndexingPipeline::new(&site.config().site).unwrap();
    let (pages, _) = pipeline.index_site(&site.content_root()).unwrap();

    let mut uris: Vec<String> = pages.into_iter().map(|p| p.uri).collect();
    uris.sort();
    uris
}

#[test]
fn test_section_and_home_pages() {
    let result = uris(&[
        ("_index.md", "home"),
        ("docs/_index.md", "docs"),
        ("docs/intro.md", "intro"),
    ]);

    assert_eq!(result, vec!["/", "/docs/", "/docs/intro/"]);
}

#[test]
fn test_page_bundle() {
    let result = uris(&[("posts/my-trip/index.md", "---\ntitle: Trip\n---\nphotos")]);
    assert_eq!(result, vec!["/posts/my-trip/"]);
}

#[test]
fn test_slug_and_url_overrides() {
    let result = uris(&[
        ("posts/long-file-name.md", "---\nslug: short\n---\nx"),
        ("posts/legacy.md", "---\nurl: old/path.html\n---\ny"),
    ]);

    assert_eq!(result, vec!["/old/path.html", "/posts/short/"]);
}

#[test]
fn test_case_is_preserved() {
    let result = uris(&[("Guides/Setup Notes.md", "text")]);
    assert_eq!(result, vec!["/Guides/Setup-Notes/"]);
}
