//! Content tree walker with pattern-based filtering.
//!
//! Walks a Hugo `content/` directory and yields the files that
//! should become pages. Unreadable entries are logged and skipped.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{Result, SearchError};

/// A content file found under the content root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    /// Path on disk
    pub path: PathBuf,

    /// Path relative to the content root
    pub rel_path: PathBuf,
}

/// Content walker with include/exclude globs and a size cap
pub struct FileWalker {
    include_patterns: Vec<Pattern>,
    exclude_patterns: Vec<Pattern>,
    max_file_size_bytes: u64,
}

fn compile(patterns: Vec<String>, kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .into_iter()
        .map(|p| {
            Pattern::new(&p)
                .map_err(|e| SearchError::ConfigError(format!("Invalid {kind} pattern '{p}': {e}")))
        })
        .collect()
}

impl FileWalker {
    /// Create a new walker
    ///
    /// # Errors
    ///
    /// `ConfigError` when a pattern is not valid glob syntax.
    pub fn new(
        include_patterns: Vec<String>,
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
    ) -> Result<Self> {
        Ok(Self {
            include_patterns: compile(include_patterns, "include")?,
            exclude_patterns: compile(exclude_patterns, "exclude")?,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    /// Collect matching content files below `root`, sorted by path
    pub fn collect_files(&self, root: &Path) -> Result<Vec<ContentFile>> {
        if !root.is_dir() {
            return Err(SearchError::InvalidPath(format!(
                "Content directory not found: {}",
                root.display()
            )));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.keep_entry(e, root))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            if let Ok(metadata) = entry.metadata() {
                if metadata.len() > self.max_file_size_bytes {
                    tracing::debug!(
                        path = %path.display(),
                        bytes = metadata.len(),
                        "Skipping large file"
                    );
                    continue;
                }
            }

            if !self.matches_patterns(path) {
                continue;
            }

            let rel_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            files.push(ContentFile {
                path: path.to_path_buf(),
                rel_path,
            });
        }

        Ok(files)
    }

    /// Prune hidden entries and excluded directories before descending
    fn keep_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();
        if path == root {
            return true;
        }

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false);
        if hidden {
            return false;
        }

        if entry.file_type().is_dir()
            && self.exclude_patterns.iter().any(|p| p.matches_path(path))
        {
            tracing::debug!(path = %path.display(), "Skipping excluded directory");
            return false;
        }

        true
    }

    fn matches_patterns(&self, path: &Path) -> bool {
        let Some(path_str) = path.to_str() else {
            return false;
        };
        let file_name = path.file_name().and_then(|f| f.to_str()).unwrap_or("");

        let included = self.include_patterns.is_empty()
            || self
                .include_patterns
                .iter()
                .any(|p| p.matches(path_str) || p.matches(file_name));

        included
            && !self
                .exclude_patterns
                .iter()
                .any(|p| p.matches(path_str) || p.matches(file_name))
    }
}
