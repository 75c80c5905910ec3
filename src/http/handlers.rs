//! HTTP request handlers for the hugo-search API
//!
//! Implements handlers for the REST endpoints: health, index info,
//! document count, search and document lookup.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::{Result, SearchError};
use crate::core::search::{SearchRequest, SearchResponse};
use crate::core::services::Services;
use crate::core::storage::IndexManifest;
use crate::core::types::*;

/// Response from the index info endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfoResponse {
    pub status: String,
    pub name: String,
    pub doc_count: u64,
    pub manifest: IndexManifest,
}

/// Response from the document endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: String,
    pub fields: Map<String, Value>,
}

/// Health check handler
///
/// Returns server status and version information.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Index info handler
///
/// Reports the document count and build manifest of the index.
///
/// # Errors
///
/// - `IndexNotFound`: `index` is not the served index name
pub async fn index_info_handler(
    State(services): State<Arc<Services>>,
    Path(index): Path<String>,
) -> std::result::Result<Json<IndexInfoResponse>, SearchError> {
    check_index(&services, &index)?;

    Ok(Json(IndexInfoResponse {
        status: "ok".to_string(),
        name: index,
        doc_count: services.index.doc_count(),
        manifest: services.index.manifest().clone(),
    }))
}

/// Document count handler
pub async fn count_handler(
    State(services): State<Arc<Services>>,
    Path(index): Path<String>,
) -> std::result::Result<Json<CountResponse>, SearchError> {
    check_index(&services, &index)?;

    Ok(Json(CountResponse {
        status: "ok".to_string(),
        count: services.index.doc_count(),
    }))
}

/// Search handler
///
/// Runs a search request against the served index and returns the
/// full result envelope.
///
/// # Errors
///
/// - `IndexNotFound`: `index` is not the served index name
/// - `InvalidQuery`: query is empty, too long or unparsable
/// - `InvalidField`: unknown field in `match`, `facets` or `sort`
/// - `SearchFailed`: search execution failed
pub async fn search_handler(
    State(services): State<Arc<Services>>,
    Path(index): Path<String>,
    Json(req): Json<SearchRequest>,
) -> std::result::Result<Json<SearchResponse>, SearchError> {
    check_index(&services, &index)?;

    // Searches are synchronous; tantivy searchers are cheap to clone
    let response = services.search.search(req)?;

    Ok(Json(response))
}

/// Document lookup handler
///
/// `doc_id` is the page URL, usually percent-encoded. Slashes the
/// client dropped are restored before the lookup.
///
/// # Errors
///
/// - `IndexNotFound`: `index` is not the served index name
/// - `DocumentNotFound`: no page with that id
pub async fn document_handler(
    State(services): State<Arc<Services>>,
    Path((index, doc_id)): Path<(String, String)>,
) -> std::result::Result<Json<DocumentResponse>, SearchError> {
    check_index(&services, &index)?;

    let id = restore_doc_id(&doc_id);
    match services.index.document(&id) {
        Ok(fields) => Ok(Json(DocumentResponse { id, fields })),
        // dotted slug sent without its trailing slash
        Err(SearchError::DocumentNotFound(_)) if !id.ends_with('/') => {
            let id = format!("{id}/");
            let fields = services.index.document(&id)?;
            Ok(Json(DocumentResponse { id, fields }))
        }
        Err(e) => Err(e),
    }
}

fn check_index(services: &Services, index: &str) -> Result<()> {
    if index != services.index_name() {
        return Err(SearchError::IndexNotFound(index.to_string()));
    }
    Ok(())
}

/// Rebuild a page id from a path segment
///
/// Slashes the client sent are kept. A missing leading slash is
/// added; a missing trailing slash is added unless the last segment
/// looks like a file name.
pub fn restore_doc_id(raw: &str) -> String {
    if raw.is_empty() || raw == "/" {
        return "/".to_string();
    }

    let mut id = if raw.starts_with('/') {
        raw.to_string()
    } else {
        format!("/{raw}")
    };

    if !id.ends_with('/') {
        let last = id.rsplit('/').next().unwrap_or_default();
        if !last.contains('.') {
            id.push('/');
        }
    }

    id
}
