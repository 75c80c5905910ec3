//! Configuration management for the hugo-search service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! Command-line flags are applied on top by the `cli` module.

use crate::core::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address, `:PORT` binds every interface
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Attach a permissive CORS layer
    #[serde(default = "default_true")]
    pub cors: bool,
}

/// Hugo site configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Root of the Hugo site
    #[serde(default = "default_hugo_path")]
    pub hugo_path: PathBuf,

    /// Content directory, relative to `hugo_path`
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// File patterns to include (glob syntax)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Index pages marked `draft = true`
    #[serde(default)]
    pub include_drafts: bool,
}

/// On-disk index configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Index directory
    #[serde(default = "default_index_path")]
    pub path: PathBuf,

    /// Name exposed under `/api/<name>`; defaults to the file stem of `path`
    #[serde(default)]
    pub name: Option<String>,

    /// Writer heap budget in MB
    #[serde(default = "default_writer_heap_mb")]
    pub writer_heap_mb: usize,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of hits to return
    #[serde(default = "default_size")]
    pub default_size: usize,

    /// Maximum hits per request
    #[serde(default = "default_max_size")]
    pub max_size: usize,

    /// Maximum query string length
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Maximum characters per highlight fragment
    #[serde(default = "default_snippet_max_chars")]
    pub snippet_max_chars: usize,
}

// Default value functions
fn default_addr() -> String {
    ":8080".to_string()
}

fn default_true() -> bool {
    true
}

fn default_hugo_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_include_patterns() -> Vec<String> {
    vec![
        "*.md".to_string(),
        "*.markdown".to_string(),
        "*.html".to_string(),
    ]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
        "**/*.swp".to_string(),
        "**/*~".to_string(),
    ]
}

fn default_max_file_size() -> usize {
    10
}

fn default_index_path() -> PathBuf {
    PathBuf::from("indexes/search.bleve")
}

fn default_writer_heap_mb() -> usize {
    50
}

fn default_size() -> usize {
    10
}

fn default_max_size() -> usize {
    100
}

fn default_max_query_length() -> usize {
    500
}

fn default_snippet_max_chars() -> usize {
    200
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            cors: default_true(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hugo_path: default_hugo_path(),
            content_dir: default_content_dir(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
            max_file_size_mb: default_max_file_size(),
            include_drafts: false,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            name: None,
            writer_heap_mb: default_writer_heap_mb(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_size: default_size(),
            max_size: default_max_size(),
            max_query_length: default_max_query_length(),
            snippet_max_chars: default_snippet_max_chars(),
        }
    }
}

impl SiteConfig {
    /// Absolute-or-relative path of the content directory
    pub fn content_root(&self) -> PathBuf {
        self.hugo_path.join(&self.content_dir)
    }
}

/// Parse a Go-style listen address into a socket address
///
/// `:8080` binds every interface, `host:port` is resolved and the
/// first address wins.
pub fn parse_listen_addr(addr: &str) -> Result<SocketAddr> {
    let addr = addr.trim();
    let normalized = if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    };

    normalized
        .to_socket_addrs()
        .map_err(|e| SearchError::ConfigError(format!("Invalid listen address '{addr}': {e}")))?
        .next()
        .ok_or_else(|| {
            SearchError::ConfigError(format!("Listen address '{addr}' did not resolve"))
        })
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SearchError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// The file is `path` when given, else `HUGO_SEARCH_CONFIG`, else
    /// `./hugo-search.toml` when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Ok(config_path) = env::var("HUGO_SEARCH_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("hugo-search.toml").exists() {
            Self::from_file("hugo-search.toml")?
        } else {
            Self::default()
        };

        config.merge_env();

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(addr) = env::var("HUGO_SEARCH_ADDR") {
            self.server.addr = addr;
        }

        if let Ok(hugo_path) = env::var("HUGO_SEARCH_HUGO_PATH") {
            self.site.hugo_path = PathBuf::from(hugo_path);
        }

        if let Ok(index_path) = env::var("HUGO_SEARCH_INDEX_PATH") {
            self.index.path = PathBuf::from(index_path);
        }
        if let Ok(name) = env::var("HUGO_SEARCH_INDEX_NAME") {
            self.index.name = Some(name);
        }

        if let Ok(default_size) = env::var("HUGO_SEARCH_DEFAULT_SIZE") {
            if let Ok(size) = default_size.parse() {
                self.search.default_size = size;
            }
        }
        if let Ok(max_size) = env::var("HUGO_SEARCH_MAX_SIZE") {
            if let Ok(size) = max_size.parse() {
                self.search.max_size = size;
            }
        }
        if let Ok(max_query_len) = env::var("HUGO_SEARCH_MAX_QUERY_LENGTH") {
            if let Ok(len) = max_query_len.parse() {
                self.search.max_query_length = len;
            }
        }
    }

    /// Name the index is served under
    pub fn index_name(&self) -> String {
        if let Some(name) = &self.index.name {
            return name.clone();
        }

        self.index
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        parse_listen_addr(&self.server.addr)?;

        if self.index_name().is_empty() {
            return Err(SearchError::ConfigError(
                "Index name must be non-empty".to_string(),
            ));
        }

        // tantivy refuses writer budgets below 15MB
        if self.index.writer_heap_mb < 15 {
            return Err(SearchError::ConfigError(
                "Writer heap must be at least 15 MB".to_string(),
            ));
        }

        if self.search.default_size == 0 {
            return Err(SearchError::ConfigError(
                "Default size must be non-zero".to_string(),
            ));
        }

        if self.search.default_size > self.search.max_size {
            return Err(SearchError::ConfigError(
                "Default size cannot exceed max size".to_string(),
            ));
        }

        if self.search.max_query_length == 0 {
            return Err(SearchError::ConfigError(
                "Max query length must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.server.addr);
        tracing::info!("  Hugo path: {:?}", self.site.hugo_path);
        tracing::info!("  Content dir: {:?}", self.site.content_dir);
        tracing::info!(
            "  Include patterns: {} patterns",
            self.site.include_patterns.len()
        );
        tracing::info!(
            "  Exclude patterns: {} patterns",
            self.site.exclude_patterns.len()
        );
        tracing::info!("  Include drafts: {}", self.site.include_drafts);
        tracing::info!("  Index path: {:?}", self.index.path);
        tracing::info!("  Index name: {}", self.index_name());
        tracing::info!("  Default size: {}", self.search.default_size);
        tracing::info!("  Max size: {}", self.search.max_size);
        tracing::info!("  Max query length: {}", self.search.max_query_length);
    }
}
