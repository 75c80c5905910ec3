//! Core domain logic (protocol-agnostic)
//!
//! This module contains everything that is independent of the
//! HTTP transport.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Pages and shared response bodies
//! - **indexer**: Hugo content walking and page extraction
//! - **storage**: Tantivy page index
//! - **search**: Search envelopes and execution
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod indexer;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, SearchError};
pub use services::Services;
