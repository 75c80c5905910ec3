//! hugo-search - full-text search for Hugo sites
//!
//! Indexes the content tree of a Hugo site with Tantivy and serves
//! it over a Bleve-compatible HTTP search API.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types
//!   - indexer (content walking, front matter, Markdown)
//!   - storage (page index, schema, manifest)
//!   - search (request envelopes, query execution)
//!   - services (unified service container)
//!
//! - **http**: REST API adapter (depends on core)
//!   - handlers, middleware, error mapping
//!
//! - **cli**: Flag parsing (depends on core)
//!
//! # Key Features
//!
//! - TOML, YAML and JSON front matter
//! - BM25 search via Tantivy with facets, highlighting and sorting
//! - Index built on first start, reused afterwards
//! - `POST /api/<index>/_search` plus count and document lookups

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP REST adapter
pub mod http;

// Command-line flags
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, SearchError};
pub use core::services::Services;
pub use core::types::*;
