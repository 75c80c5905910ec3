//! Unified service container for hugo-search
//!
//! Provides shared access to the opened index and the search
//! service.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::search::SearchService;
use crate::core::storage::PageIndex;
use crate::core::types::IndexStats;
use std::sync::Arc;

/// Unified services container
///
/// The HTTP adapter receives this through `Arc<Services>`.
#[derive(Clone)]
pub struct Services {
    /// Opened page index
    pub index: Arc<PageIndex>,

    /// Search service bound to the index
    pub search: Arc<SearchService>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Statistics of the build run at startup, if one happened
    pub build_stats: Option<IndexStats>,
}

impl Services {
    /// Validate the configuration, then open (or build) the index
    pub fn open(config: Config, reindex: bool) -> Result<Self> {
        config.validate()?;

        let (index, build_stats) = PageIndex::open_or_build(&config, reindex)?;
        let mut services = Self::from_index(config, index);
        services.build_stats = build_stats;

        Ok(services)
    }

    /// Wrap an already opened index
    pub fn from_index(config: Config, index: PageIndex) -> Self {
        let index = Arc::new(index);

        let search = Arc::new(SearchService::new(
            Arc::clone(&index),
            config.index_name(),
            config.search.clone(),
        ));

        Self {
            index,
            search,
            config: Arc::new(config),
            build_stats: None,
        }
    }

    /// Name the index is served under
    pub fn index_name(&self) -> &str {
        self.search.index_name()
    }
}
