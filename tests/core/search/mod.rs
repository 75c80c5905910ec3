//! Search layer tests
//!
//! Query clauses, paging, sorting, facets and highlighting.

mod test_facets;
mod test_search;
