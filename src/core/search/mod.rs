//! Search module for BM25 full-text search.
//!
//! This module provides the request/response envelopes and the
//! service that executes them over the page index using Tantivy's
//! BM25 ranking.

mod request;
mod service;

pub use request::{
    Empty, FacetRequest, FacetResult, HighlightRequest, Hit, QueryClause, SearchRequest,
    SearchResponse, SearchStatus, TermCount,
};
pub use service::{SearchService, SortOrder};
