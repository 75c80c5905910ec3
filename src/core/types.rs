//! Core data types for the hugo-search service.
//!
//! Search request and response envelopes live in
//! `core::search`; this module holds pages, statistics and the
//! small response bodies shared by the HTTP adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single Hugo content page, ready for indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Document id (same as `uri`)
    pub id: String,

    /// Public URL path, always starts and ends with `/`
    pub uri: String,

    pub title: String,

    /// Body rendered to plain text
    pub content: String,

    pub summary: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    /// First directory under `content/`, empty for top-level pages
    pub section: String,

    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub draft: bool,
}

/// Statistics from an indexing operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of pages written to the index
    pub pages_indexed: usize,

    /// Files that failed to parse
    pub files_skipped: usize,

    /// Draft pages left out
    pub drafts_skipped: usize,

    /// Indexing duration in milliseconds
    pub duration_ms: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response from the document count endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub status: String,
    pub count: u64,
}
