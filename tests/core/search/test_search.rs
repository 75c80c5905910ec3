// Integration tests for search functionality

use crate::common::{create_test_services, hit_ids, search_json, TestSite};
use hugo_search::core::error::SearchError;
use hugo_search::core::search::SearchRequest;
use hugo_search::core::services::Services;
use serde_json::json;

#[test]
fn test_query_string_search() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(&services, json!({"query": {"query": "rust"}}));

    assert_eq!(response.total_hits, 3);
    assert_eq!(response.hits.len(), 3);
    assert_eq!(response.status.successful, 1);
    assert!(response.max_score > 0.0);
    assert!(response.took > 0);
    assert!(response.hits.iter().all(|h| h.index == "search"));
    assert!(response.hits.iter().all(|h| h.fields.is_none()));

    // Title boost puts the titled pages ahead of the passing mention
    assert_eq!(response.hits.last().unwrap().id, "/about/");
    assert_eq!(response.hits[0].score, response.max_score);
}

#[test]
fn test_drafts_are_not_searchable() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(&services, json!({"query": {"query": "secret"}}));
    assert_eq!(response.total_hits, 0);
    assert!(response.hits.is_empty());
    assert_eq!(response.max_score, 0.0);
}

#[test]
fn test_shortcodes_are_not_searchable() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(&services, json!({"query": {"query": "diagram"}}));
    assert_eq!(response.total_hits, 0);
}

#[test]
fn test_match_clause_on_title() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({"query": {"match": "Rust", "field": "title"}}),
    );

    let mut ids = hit_ids(&response);
    ids.sort();
    assert_eq!(ids, vec!["/posts/async-rust/", "/posts/rust-errors/"]);
}

#[test]
fn test_match_phrase_clause() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({"query": {"match_phrase": "async programming"}}),
    );
    assert_eq!(hit_ids(&response), vec!["/posts/async-rust/"]);

    let reversed = search_json(
        &services,
        json!({"query": {"match_phrase": "programming async"}}),
    );
    assert_eq!(reversed.total_hits, 0);
}

#[test]
fn test_match_all_and_paging() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let first = search_json(
        &services,
        json!({"query": {"match_all": {}}, "size": 2, "sort": ["title"]}),
    );
    assert_eq!(first.total_hits, 5);
    assert_eq!(hit_ids(&first), vec!["/about/", "/posts/async-rust/"]);

    let last = search_json(
        &services,
        json!({"query": {"match_all": {}}, "size": 2, "from": 4, "sort": ["title"]}),
    );
    assert_eq!(hit_ids(&last), vec!["/posts/"]);

    let past_end = search_json(
        &services,
        json!({"query": {"match_all": {}}, "size": 2, "from": 10}),
    );
    assert_eq!(past_end.total_hits, 5);
    assert!(past_end.hits.is_empty());
}

#[test]
fn test_size_is_capped() {
    let site = TestSite::blog();
    let mut config = site.config();
    config.search.default_size = 2;
    config.search.max_size = 2;
    let services = Services::open(config, false).unwrap();

    let response = search_json(&services, json!({"query": {"match_all": {}}, "size": 50}));

    assert_eq!(response.total_hits, 5);
    assert_eq!(response.hits.len(), 2);
}

#[test]
fn test_sort_by_date() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let newest_first = search_json(
        &services,
        json!({"query": {"match_all": {}}, "sort": ["-date"]}),
    );
    assert_eq!(
        hit_ids(&newest_first),
        vec![
            "/posts/async-rust/",
            "/posts/hugo-shortcodes/",
            "/posts/rust-errors/",
            "/about/",
            "/posts/",
        ]
    );

    let oldest_first = search_json(
        &services,
        json!({"query": {"match_all": {}}, "sort": ["date"]}),
    );
    assert_eq!(
        hit_ids(&oldest_first)[..3],
        ["/posts/rust-errors/", "/posts/hugo-shortcodes/", "/posts/async-rust/"]
    );
}

#[test]
fn test_sort_by_title_descending() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({"query": {"query": "rust"}, "sort": ["-title"]}),
    );

    assert_eq!(
        hit_ids(&response),
        vec!["/posts/rust-errors/", "/posts/async-rust/", "/about/"]
    );
    assert!(response.hits.iter().all(|h| h.score > 0.0));
}

#[test]
fn test_ascending_score_sort() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({"query": {"query": "rust"}, "sort": ["_score"]}),
    );

    let scores: Vec<f32> = response.hits.iter().map(|h| h.score).collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(response.hits[0].id, "/about/");
}

#[test]
fn test_requested_fields() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({"query": {"match": "thiserror"}, "fields": ["title", "tags", "nope"]}),
    );

    let fields = response.hits[0].fields.as_ref().unwrap();
    assert_eq!(fields["title"], "Error Handling in Rust");
    assert_eq!(fields["tags"], json!(["rust"]));
    assert!(fields.get("nope").is_none());
    assert!(fields.get("content").is_none());

    let all = search_json(
        &services,
        json!({"query": {"match": "thiserror"}, "fields": ["*"]}),
    );
    let fields = all.hits[0].fields.as_ref().unwrap();
    assert_eq!(fields["uri"], "/posts/rust-errors/");
    assert_eq!(fields["date"], "2023-11-20T06:30:00Z");
    assert!(fields["content"].as_str().unwrap().contains("question mark"));
}

#[test]
fn test_highlight_fragments() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let response = search_json(
        &services,
        json!({"query": {"query": "tokio"}, "highlight": {"fields": ["content", "title"]}}),
    );

    let fragments = response.hits[0].fragments.as_ref().unwrap();
    assert!(fragments["content"][0].contains("<mark>tokio</mark>"));
    // No match in the title, so no title fragment
    assert!(!fragments.contains_key("title"));
}

#[test]
fn test_request_is_echoed() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let request = SearchRequest::query_string("hugo");
    let response = services.search.search(request.clone()).unwrap();

    assert_eq!(response.request, request);
}

#[test]
fn test_invalid_queries() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    let empty = services.search.search(SearchRequest::query_string("  "));
    assert!(matches!(empty, Err(SearchError::InvalidQuery(_))));

    let long = services
        .search
        .search(SearchRequest::query_string("rust ".repeat(200)));
    assert!(matches!(long, Err(SearchError::InvalidQuery(_))));

    let unknown_field = services
        .search
        .search(SearchRequest::query_string("author:someone"));
    assert!(matches!(unknown_field, Err(SearchError::InvalidQuery(_))));
}

#[test]
fn test_invalid_fields() {
    let site = TestSite::blog();
    let services = create_test_services(&site);

    for body in [
        json!({"query": {"match": "x", "field": "summary"}}),
        json!({"query": {"match_phrase": "x y", "field": "tags"}}),
        json!({"query": {"query": "rust"}, "sort": ["author"]}),
        json!({"query": {"query": "rust"}, "highlight": {"fields": ["tags"]}}),
    ] {
        let request = serde_json::from_value(body.clone()).unwrap();
        let result = services.search.search(request);
        assert!(
            matches!(result, Err(SearchError::InvalidField { .. })),
            "expected InvalidField for {body}"
        );
    }
}
