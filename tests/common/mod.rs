// Common test utilities and fixtures

pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::TestSite;
#[allow(unused_imports)]
pub use helpers::{create_test_services, hit_ids, search_json};
