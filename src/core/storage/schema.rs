//! Tantivy schema for Hugo pages.
//!
//! This module defines the page schema, resolves field handles
//! and converts between `Page` values and tantivy documents.

use crate::core::error::{Result, SearchError};
use crate::core::types::Page;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value as JsonValue};
use tantivy::schema::{DateOptions, Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::TantivyDocument;

/// Current schema version
/// Version 1: Initial page schema
pub const SCHEMA_VERSION: u32 = 1;

/// Stored fields, in the order they are rendered
pub const STORED_FIELDS: &[&str] = &[
    "id",
    "uri",
    "title",
    "content",
    "summary",
    "tags",
    "categories",
    "section",
    "date",
];

/// Fields that may hold several values
pub const MULTI_VALUED_FIELDS: &[&str] = &["tags", "categories"];

/// Fields facets can be computed on
pub const FACET_FIELDS: &[&str] = &["tags", "categories", "section"];

/// Analyzed full-text fields
pub const TEXT_FIELDS: &[&str] = &["title", "content"];

/// Create the Tantivy schema for page indexing
///
/// Fields:
/// - id, uri: page URL (STRING | STORED)
/// - title, content: full text (TEXT | STORED)
/// - summary: display only (STORED)
/// - tags, categories, section: exact terms (STRING | STORED)
/// - date: publish date (INDEXED | STORED)
/// - indexed_at: build timestamp (STORED)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field("id", STRING | STORED);
    builder.add_text_field("uri", STRING | STORED);

    builder.add_text_field("title", TEXT | STORED);
    builder.add_text_field("content", TEXT | STORED);
    builder.add_text_field("summary", STORED);

    builder.add_text_field("tags", STRING | STORED);
    builder.add_text_field("categories", STRING | STORED);
    builder.add_text_field("section", STRING | STORED);

    let date_options = DateOptions::default().set_indexed().set_stored();
    builder.add_date_field("date", date_options);
    builder.add_date_field("indexed_at", STORED);

    builder.build()
}

/// Resolved field handles for the page schema
#[derive(Debug, Clone, Copy)]
pub struct PageFields {
    pub id: Field,
    pub uri: Field,
    pub title: Field,
    pub content: Field,
    pub summary: Field,
    pub tags: Field,
    pub categories: Field,
    pub section: Field,
    pub date: Field,
    pub indexed_at: Field,
}

fn field(schema: &Schema, name: &str) -> Result<Field> {
    schema
        .get_field(name)
        .map_err(|e| SearchError::StorageError(format!("Missing {name} field: {e}")))
}

impl PageFields {
    /// Resolve every field, failing on a foreign schema
    pub fn resolve(schema: &Schema) -> Result<Self> {
        Ok(Self {
            id: field(schema, "id")?,
            uri: field(schema, "uri")?,
            title: field(schema, "title")?,
            content: field(schema, "content")?,
            summary: field(schema, "summary")?,
            tags: field(schema, "tags")?,
            categories: field(schema, "categories")?,
            section: field(schema, "section")?,
            date: field(schema, "date")?,
            indexed_at: field(schema, "indexed_at")?,
        })
    }

    /// Look up a field by its public name
    pub fn by_name(&self, name: &str) -> Option<Field> {
        let field = match name {
            "id" => self.id,
            "uri" => self.uri,
            "title" => self.title,
            "content" => self.content,
            "summary" => self.summary,
            "tags" => self.tags,
            "categories" => self.categories,
            "section" => self.section,
            "date" => self.date,
            _ => return None,
        };
        Some(field)
    }

    /// Build the tantivy document for a page
    pub fn to_document(&self, page: &Page, indexed_at: DateTime<Utc>) -> TantivyDocument {
        let mut doc = TantivyDocument::default();

        doc.add_text(self.id, &page.id);
        doc.add_text(self.uri, &page.uri);
        doc.add_text(self.title, &page.title);
        doc.add_text(self.content, &page.content);
        doc.add_text(self.summary, &page.summary);
        for tag in &page.tags {
            doc.add_text(self.tags, tag);
        }
        for category in &page.categories {
            doc.add_text(self.categories, category);
        }
        doc.add_text(self.section, &page.section);
        if let Some(date) = page.date {
            doc.add_date(self.date, to_tantivy_date(date));
        }
        doc.add_date(self.indexed_at, to_tantivy_date(indexed_at));

        doc
    }

    /// Render the requested stored fields as JSON
    ///
    /// Multi-valued fields become arrays, dates RFC 3339 strings.
    /// Unknown names are ignored; empty single values are omitted.
    pub fn render(&self, doc: &TantivyDocument, names: &[&str]) -> Map<String, JsonValue> {
        let mut out = Map::new();

        for name in names {
            let Some(field) = self.by_name(name) else {
                continue;
            };

            if MULTI_VALUED_FIELDS.contains(name) {
                out.insert(name.to_string(), JsonValue::from(self.strings(doc, field)));
                continue;
            }

            if *name == "date" {
                if let Some(date) = self.date(doc) {
                    out.insert(
                        name.to_string(),
                        JsonValue::String(date.to_rfc3339_opts(SecondsFormat::Secs, true)),
                    );
                }
                continue;
            }

            let text = self.text(doc, field);
            if !text.is_empty() {
                out.insert(name.to_string(), JsonValue::String(text));
            }
        }

        out
    }

    /// First string value of a field
    pub fn text(&self, doc: &TantivyDocument, field: Field) -> String {
        doc.get_first(field)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }

    /// Every non-empty string value of a field
    pub fn strings(&self, doc: &TantivyDocument, field: Field) -> Vec<String> {
        doc.get_all(field)
            .filter_map(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Publish date of a stored document
    pub fn date(&self, doc: &TantivyDocument) -> Option<DateTime<Utc>> {
        doc.get_first(self.date)
            .and_then(|v| v.as_datetime())
            .and_then(|dt| DateTime::from_timestamp(dt.into_timestamp_secs(), 0))
    }
}

fn to_tantivy_date(date: DateTime<Utc>) -> tantivy::DateTime {
    tantivy::DateTime::from_timestamp_secs(date.timestamp())
}
