//! Markdown to plain text conversion for indexing.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Parser, TagEnd};
use regex::Regex;

/// Hugo shortcodes: `{{< name args >}}` and `{{% name args %}}`
static SHORTCODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{[<%].*?[%>]\}\}").expect("shortcode regex"));

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("html tag regex"));

/// Render a Markdown body to whitespace-collapsed plain text
///
/// Shortcode invocations are dropped before parsing (their inner
/// text, for paired shortcodes, is kept). Raw HTML contributes its
/// text content only.
pub fn to_plain_text(markdown: &str) -> String {
    let source = SHORTCODE.replace_all(markdown, " ");
    let mut text = String::with_capacity(source.len());

    for event in Parser::new(&source) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::Html(html) | Event::InlineHtml(html) => {
                text.push_str(&HTML_TAG.replace_all(&html, " "));
            }
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableCell,
            ) => text.push(' '),
            _ => {}
        }
    }

    collapse_whitespace(&text)
}

/// Cut `text` to at most `max_chars` characters on a word boundary
pub fn summarize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..cut];
    let head = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => &head[..space],
        _ => head,
    };

    format!("{}…", head.trim_end())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
