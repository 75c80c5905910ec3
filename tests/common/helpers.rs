// Test helper functions

use hugo_search::core::search::{SearchRequest, SearchResponse};
use hugo_search::core::services::Services;
use serde_json::Value;

use super::fixtures::TestSite;

/// Open services over a test site, building its index
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(site: &TestSite) -> Services {
    Services::open(site.config(), false).expect("Failed to open services")
}

/// Run a JSON search request against the services
#[allow(dead_code)] // Used in integration tests
pub fn search_json(services: &Services, body: Value) -> SearchResponse {
    let request: SearchRequest = serde_json::from_value(body).expect("Invalid search request");
    services.search.search(request).expect("Search failed")
}

/// Ids of the hits, in order
#[allow(dead_code)] // Used in integration tests
pub fn hit_ids(response: &SearchResponse) -> Vec<&str> {
    response.hits.iter().map(|hit| hit.id.as_str()).collect()
}
