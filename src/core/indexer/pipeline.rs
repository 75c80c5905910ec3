//! Indexing pipeline orchestration.
//!
//! Coordinates reading a Hugo site:
//! 1. Walk the content directory
//! 2. Split front matter from each file
//! 3. Render the body to plain text
//! 4. Collect pages for storage

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::core::config::SiteConfig;
use crate::core::error::Result;
use crate::core::indexer::page::build_page;
use crate::core::indexer::walker::{ContentFile, FileWalker};
use crate::core::types::{IndexStats, Page};

/// Turns a content tree into pages
pub struct IndexingPipeline {
    walker: FileWalker,
    include_drafts: bool,
}

impl IndexingPipeline {
    /// Create a pipeline from the site configuration
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let walker = FileWalker::new(
            site.include_patterns.clone(),
            site.exclude_patterns.clone(),
            site.max_file_size_mb,
        )?;

        Ok(Self {
            walker,
            include_drafts: site.include_drafts,
        })
    }

    /// Read every page below `content_root`
    ///
    /// Files that fail to read or parse are logged and counted as
    /// skipped; they never abort the run. When two files resolve to
    /// the same URL the first one (in path order) wins.
    pub fn index_site(&self, content_root: &Path) -> Result<(Vec<Page>, IndexStats)> {
        let start = Instant::now();

        tracing::info!("Collecting content from {:?}", content_root);
        let files = self.walker.collect_files(content_root)?;
        tracing::info!("Found {} content files", files.len());

        let mut pages = Vec::with_capacity(files.len());
        let mut seen = HashSet::new();
        let mut stats = IndexStats::default();

        for file in &files {
            let page = match self.process_file(file) {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Failed to process {:?}: {}", file.path, e);
                    stats.files_skipped += 1;
                    continue;
                }
            };

            if page.draft && !self.include_drafts {
                tracing::debug!(uri = %page.uri, "Skipping draft");
                stats.drafts_skipped += 1;
                continue;
            }

            if !seen.insert(page.id.clone()) {
                tracing::warn!(
                    uri = %page.uri,
                    path = %file.rel_path.display(),
                    "Duplicate page URL, keeping the first"
                );
                stats.files_skipped += 1;
                continue;
            }

            pages.push(page);
        }

        stats.pages_indexed = pages.len();
        stats.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Site read: {} pages, {} skipped, {} drafts in {}ms",
            stats.pages_indexed,
            stats.files_skipped,
            stats.drafts_skipped,
            stats.duration_ms
        );

        Ok((pages, stats))
    }

    fn process_file(&self, file: &ContentFile) -> Result<Page> {
        let bytes = fs::read(&file.path)?;
        let text = String::from_utf8_lossy(&bytes);
        build_page(file, &text)
    }
}
