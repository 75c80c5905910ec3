// Facet counting over matching documents

use crate::common::{create_test_services, search_json, TestSite};
use hugo_search::core::error::SearchError;
use hugo_search::core::search::TermCount;
use serde_json::json;

fn term(term: &str, count: u64) -> TermCount {
    TermCount {
        term: term.to_string(),
        count,
    }
}

#[test]
fn test_tag_facet_over_matches() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({
            "query": {"query": "rust"},
            "facets": {"Tags": {"field": "tags"}}
        }),
    );

    let facet = &response.facets["Tags"];
    assert_eq!(facet.field, "tags");
    assert_eq!(facet.total, 3);
    assert_eq!(facet.missing, 1);
    assert_eq!(facet.other, 0);
    assert_eq!(facet.terms, vec![term("rust", 2), term("async", 1)]);
}

#[test]
fn test_facet_size_and_other() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({
            "query": {"match_all": {}},
            "size": 0,
            "facets": {"tags": {"field": "tags", "size": 1}}
        }),
    );

    assert!(response.hits.is_empty());
    assert_eq!(response.total_hits, 5);

    let facet = &response.facets["tags"];
    // rust: 2, async: 1, hugo: 1
    assert_eq!(facet.total, 4);
    assert_eq!(facet.terms, vec![term("rust", 2)]);
    assert_eq!(facet.other, 2);
    assert_eq!(facet.missing, 2);
}

#[test]
fn test_section_and_category_facets() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({
            "query": {"match_all": {}},
            "facets": {
                "sections": {"field": "section"},
                "categories": {"field": "categories"}
            }
        }),
    );

    let sections = &response.facets["sections"];
    assert_eq!(sections.terms, vec![term("posts", 4)]);
    assert_eq!(sections.missing, 1);

    let categories = &response.facets["categories"];
    assert_eq!(
        categories.terms,
        vec![term("programming", 1), term("web", 1)]
    );
}

#[test]
fn test_facets_with_no_matches() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({
            "query": {"query": "nothingmatchesthis"},
            "facets": {"tags": {"field": "tags"}}
        }),
    );

    let facet = &response.facets["tags"];
    assert_eq!(facet.total, 0);
    assert!(facet.terms.is_empty());
}

#[test]
fn test_unknown_facet_field() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let request = serde_json::from_value(json!({
        "query": {"match_all": {}},
        "facets": {"t": {"field": "title"}}
    }))
    .unwrap();

    assert!(matches!(
        services.search.search(request),
        Err(SearchError::InvalidField { .. })
    ));
}
