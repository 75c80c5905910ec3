//! Hugo content indexing.
//!
//! Turns a Hugo `content/` tree into `Page` documents:
//!
//! - pattern-filtered directory walking
//! - TOML, YAML and JSON front matter
//! - Markdown to plain text (shortcodes stripped)
//! - Hugo-style URL derivation

pub mod front_matter;
pub mod markdown;
pub mod page;
pub mod pipeline;
pub mod walker;

pub use front_matter::FrontMatter;
pub use pipeline::IndexingPipeline;
pub use walker::{ContentFile, FileWalker};
