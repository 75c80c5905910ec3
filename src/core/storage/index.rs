//! On-disk page index.
//!
//! Wraps a tantivy index directory together with the
//! `hugo-search.json` manifest written next to it.

use crate::core::config::Config;
use crate::core::error::{Result, SearchError};
use crate::core::indexer::IndexingPipeline;
use crate::core::storage::schema::{create_schema, PageFields, SCHEMA_VERSION, STORED_FIELDS};
use crate::core::types::{IndexStats, Page};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};
use tantivy::collector::TopDocs;
use tantivy::query::TermQuery;
use tantivy::schema::IndexRecordOption;
use tantivy::{Index, IndexReader, ReloadPolicy, Searcher, TantivyDocument, Term};

/// Manifest file name inside the index directory
pub const MANIFEST_FILE: &str = "hugo-search.json";

/// Build information stored next to the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub schema_version: u32,
    pub site_path: PathBuf,
    pub pages_indexed: usize,
    pub created_at: DateTime<Utc>,
}

/// A built, read-only page index
pub struct PageIndex {
    index: Index,
    reader: IndexReader,
    fields: PageFields,
    manifest: IndexManifest,
    dir: PathBuf,
}

impl std::fmt::Debug for PageIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageIndex")
            .field("dir", &self.dir)
            .field("manifest", &self.manifest)
            .finish()
    }
}

/// Whether `dir` already holds a tantivy index
pub fn is_index_dir(dir: &Path) -> bool {
    dir.join("meta.json").is_file()
}

impl PageIndex {
    /// Open an existing index
    ///
    /// # Errors
    ///
    /// - `IndexNotFound`: no index at `dir`
    /// - `StorageError`: unreadable index, missing manifest or an
    ///   index written with another schema version
    pub fn open(dir: &Path) -> Result<Self> {
        if !is_index_dir(dir) {
            return Err(SearchError::IndexNotFound(dir.display().to_string()));
        }

        let manifest = read_manifest(dir)?;
        if manifest.schema_version != SCHEMA_VERSION {
            return Err(SearchError::StorageError(format!(
                "Index at {} uses schema version {} (current: v{}), rebuild it with --reindex",
                dir.display(),
                manifest.schema_version,
                SCHEMA_VERSION
            )));
        }

        let index = Index::open_in_dir(dir)
            .map_err(|e| SearchError::StorageError(format!("Failed to open index: {e}")))?;

        Self::from_index(index, manifest, dir)
    }

    /// Build a fresh index at `dir` from `pages`
    ///
    /// An existing index at `dir` is replaced. A non-empty directory
    /// that is not an index is left alone and reported.
    pub fn build(
        dir: &Path,
        pages: &[Page],
        site_path: &Path,
        writer_heap_mb: usize,
    ) -> Result<Self> {
        if dir.exists() {
            let empty = fs::read_dir(dir)?.next().is_none();
            if !empty && !is_index_dir(dir) {
                return Err(SearchError::StorageError(format!(
                    "Refusing to overwrite {}: not an index directory",
                    dir.display()
                )));
            }
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)?;

        let schema = create_schema();
        let index = Index::create_in_dir(dir, schema.clone())
            .map_err(|e| SearchError::StorageError(format!("Failed to create index: {e}")))?;
        let fields = PageFields::resolve(&schema)?;

        let mut writer = index
            .writer::<TantivyDocument>(writer_heap_mb * 1_000_000)
            .map_err(|e| SearchError::StorageError(format!("Failed to create writer: {e}")))?;

        let now = Utc::now();
        for page in pages {
            writer
                .add_document(fields.to_document(page, now))
                .map_err(|e| SearchError::IndexingFailed(format!("Failed to add {}: {e}", page.id)))?;
        }

        writer
            .commit()
            .map_err(|e| SearchError::StorageError(format!("Failed to commit: {e}")))?;
        writer
            .wait_merging_threads()
            .map_err(|e| SearchError::StorageError(format!("Failed to finish merges: {e}")))?;

        let manifest = IndexManifest {
            schema_version: SCHEMA_VERSION,
            site_path: site_path.to_path_buf(),
            pages_indexed: pages.len(),
            created_at: now,
        };
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        Self::from_index(index, manifest, dir)
    }

    /// Open the configured index, building it from the site if needed
    ///
    /// Returns the build statistics when a build happened. An index
    /// with an outdated schema is rebuilt rather than rejected.
    pub fn open_or_build(config: &Config, force: bool) -> Result<(Self, Option<IndexStats>)> {
        let dir = &config.index.path;

        if !force && is_index_dir(dir) {
            match Self::open(dir) {
                Ok(index) => {
                    tracing::info!(
                        path = %dir.display(),
                        docs = index.doc_count(),
                        "Opened existing index"
                    );
                    return Ok((index, None));
                }
                Err(SearchError::StorageError(msg)) => {
                    tracing::warn!("{}; rebuilding", msg);
                }
                Err(e) => return Err(e),
            }
        }

        let site_path = &config.site.hugo_path;
        if !site_path.is_dir() {
            return Err(SearchError::InvalidPath(format!(
                "Hugo site not found: {}",
                site_path.display()
            )));
        }

        tracing::info!(
            site = %site_path.display(),
            index = %dir.display(),
            "Building index"
        );

        let pipeline = IndexingPipeline::new(&config.site)?;
        let (pages, stats) = pipeline.index_site(&config.site.content_root())?;
        let index = Self::build(dir, &pages, site_path, config.index.writer_heap_mb)?;

        Ok((index, Some(stats)))
    }

    fn from_index(index: Index, manifest: IndexManifest, dir: &Path) -> Result<Self> {
        let fields = PageFields::resolve(&index.schema())?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| SearchError::StorageError(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            index,
            reader,
            fields,
            manifest,
            dir: dir.to_path_buf(),
        })
    }

    /// Fetch a stored document by id and render every stored field
    pub fn document(&self, id: &str) -> Result<Map<String, JsonValue>> {
        let searcher = self.searcher();
        let query = TermQuery::new(
            Term::from_field_text(self.fields.id, id),
            IndexRecordOption::Basic,
        );

        let top = searcher
            .search(&query, &TopDocs::with_limit(1))
            .map_err(|e| SearchError::SearchFailed(format!("Lookup failed: {e}")))?;

        let (_, address) = top
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::DocumentNotFound(id.to_string()))?;

        let doc: TantivyDocument = searcher
            .doc(address)
            .map_err(|e| SearchError::SearchFailed(format!("Failed to retrieve document: {e}")))?;

        Ok(self.fields.render(&doc, STORED_FIELDS))
    }

    /// Number of documents in the index
    pub fn doc_count(&self) -> u64 {
        self.searcher().num_docs()
    }

    pub fn searcher(&self) -> Searcher {
        self.reader.searcher()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn fields(&self) -> &PageFields {
        &self.fields
    }

    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn read_manifest(dir: &Path) -> Result<IndexManifest> {
    let path = dir.join(MANIFEST_FILE);
    let contents = fs::read_to_string(&path).map_err(|e| {
        SearchError::StorageError(format!("Failed to read manifest {}: {e}", path.display()))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        SearchError::StorageError(format!("Invalid manifest {}: {e}", path.display()))
    })
}
