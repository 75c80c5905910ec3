//! Search request and response envelopes.
//!
//! The JSON shapes follow the Bleve HTTP API that Hugo search
//! front-ends already speak: a `query` clause, paging with
//! `size`/`from`, optional `fields`, `facets`, `highlight` and
//! `sort`, answered by an envelope with `hits`, `total_hits`,
//! `max_score`, `took` (nanoseconds) and `facets`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `{}` placeholder for `match_all`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Empty {}

/// Query clause of a search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryClause {
    /// `{"match_all": {}}`
    MatchAll { match_all: Empty },

    /// `{"match_phrase": "...", "field": "content"}`
    MatchPhrase {
        match_phrase: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// `{"match": "...", "field": "title"}`
    Match {
        #[serde(rename = "match")]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// `{"query": "title:rust +async"}`
    QueryString { query: String },

    /// A bare string is read as a query string
    Bare(String),
}

/// Facet request: `{"field": "tags", "size": 5}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetRequest {
    pub field: String,

    #[serde(default = "default_facet_size")]
    pub size: usize,
}

fn default_facet_size() -> usize {
    10
}

/// Highlight request: `{"fields": ["content"]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Body of `POST /api/<index>/_search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: QueryClause,

    /// Hits per page; server default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    #[serde(default)]
    pub from: usize,

    /// Stored fields to return; `["*"]` for all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, FacetRequest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightRequest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,
}

impl SearchRequest {
    /// Query-string request with every other option defaulted
    pub fn query_string(query: impl Into<String>) -> Self {
        Self {
            query: QueryClause::QueryString {
                query: query.into(),
            },
            size: None,
            from: 0,
            fields: None,
            facets: BTreeMap::new(),
            highlight: None,
            sort: Vec::new(),
        }
    }
}

/// Shard status block; a single local index always reports one shard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStatus {
    pub total: u32,
    pub failed: u32,
    pub successful: u32,
}

impl SearchStatus {
    pub fn ok() -> Self {
        Self {
            total: 1,
            failed: 0,
            successful: 1,
        }
    }
}

/// One matching document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub index: String,
    pub id: String,
    pub score: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragments: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

/// Facet counts for one requested facet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetResult {
    pub field: String,
    pub total: u64,
    pub missing: u64,
    pub other: u64,
    pub terms: Vec<TermCount>,
}

/// Search response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: SearchStatus,
    pub request: SearchRequest,
    pub hits: Vec<Hit>,
    pub total_hits: u64,
    pub max_score: f32,

    /// Elapsed time in nanoseconds
    pub took: u64,

    pub facets: BTreeMap<String, FacetResult>,
}
