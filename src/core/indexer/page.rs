//! Page construction: front matter + body -> `Page`.

use std::path::{Component, Path};

use crate::core::error::{Result, SearchError};
use crate::core::indexer::front_matter::{self, FrontMatter};
use crate::core::indexer::markdown;
use crate::core::indexer::walker::ContentFile;
use crate::core::types::Page;

/// Characters kept for generated summaries
pub const SUMMARY_CHARS: usize = 300;

/// Build a page from a content file and its text
pub fn build_page(file: &ContentFile, text: &str) -> Result<Page> {
    let (fm, body) = front_matter::split(text).map_err(|message| SearchError::FrontMatter {
        path: file.rel_path.display().to_string(),
        message,
    })?;

    let uri = page_uri(&file.rel_path, &fm);
    let content = markdown::to_plain_text(body);
    let summary = fm
        .str("description")
        .or_else(|| fm.str("summary"))
        .map(str::to_string)
        .unwrap_or_else(|| markdown::summarize(&content, SUMMARY_CHARS));

    Ok(Page {
        id: uri.clone(),
        uri,
        title: page_title(&file.rel_path, &fm),
        content,
        summary,
        tags: fm.string_list("tags"),
        categories: fm.string_list("categories"),
        section: page_section(&file.rel_path),
        date: fm.date("date").or_else(|| fm.date("publishdate")),
        draft: fm.bool("draft").unwrap_or(false),
    })
}

/// Public URL of a page
///
/// An explicit `url` wins. Otherwise the path under `content/` is
/// used with `slug` replacing the file stem; `index.md` and
/// `_index.md` stand for their directory.
pub fn page_uri(rel_path: &Path, fm: &FrontMatter) -> String {
    if let Some(url) = fm.str("url") {
        let mut url = url.to_string();
        if !url.starts_with('/') {
            url.insert(0, '/');
        }
        let has_extension = url
            .rsplit('/')
            .next()
            .map(|last| last.contains('.'))
            .unwrap_or(false);
        if !has_extension && !url.ends_with('/') {
            url.push('/');
        }
        return url;
    }

    let mut segments: Vec<String> = rel_path
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => s.to_str().map(urlize),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let stem = rel_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    if stem != "index" && stem != "_index" {
        let slug = fm.str("slug").unwrap_or(stem);
        segments.push(urlize(slug));
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Section of a page: its first directory under `content/`
pub fn page_section(rel_path: &Path) -> String {
    let mut components = rel_path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(first)), Some(_)) => {
            first.to_str().unwrap_or_default().to_string()
        }
        _ => String::new(),
    }
}

fn page_title(rel_path: &Path, fm: &FrontMatter) -> String {
    if let Some(title) = fm.str("title") {
        return title.to_string();
    }

    let stem = rel_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    // bundles and section pages are named after their directory
    let name = if stem == "index" || stem == "_index" {
        rel_path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    } else {
        stem
    };

    name.replace(['-', '_'], " ").trim().to_string()
}

fn urlize(segment: &str) -> String {
    segment.trim().replace(char::is_whitespace, "-")
}
