//! Storage layer for the Tantivy page index.
//!
//! # Architecture
//!
//! - **schema**: page schema, field handles, document conversion
//! - **index**: `PageIndex` (open, build, lookups) and its manifest
//!
//! # Index Directory Structure
//!
//! ```text
//! {index_path}/
//! ├── hugo-search.json    # Build manifest
//! ├── meta.json           # Tantivy metadata
//! └── [segment files]
//! ```

mod index;
pub mod schema;

pub use index::{is_index_dir, IndexManifest, PageIndex, MANIFEST_FILE};
pub use schema::{PageFields, SCHEMA_VERSION};
