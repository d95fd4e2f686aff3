//! Document conversion: raw source text to metadata plus an HTML fragment.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

use super::meta::{Meta, extract_frontmatter};

/// Result of converting one document.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub meta: Meta,
    pub html: String,
    /// Plain text of the first heading, used as a title fallback.
    pub first_heading: Option<String>,
}

/// Converts raw document text. Must not panic on malformed input:
/// markup problems render best-effort, only unusable metadata is an error.
pub trait DocumentConverter: Send + Sync {
    fn parse(&self, raw: &str) -> Result<ParsedDocument, String>;
}

/// CommonMark with GFM extensions.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownConverter {
    options: Options,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        Self { options }
    }
}

impl DocumentConverter for MarkdownConverter {
    fn parse(&self, raw: &str) -> Result<ParsedDocument, String> {
        let (meta, body) = extract_frontmatter(raw)?;

        let events: Vec<Event<'_>> = Parser::new_ext(body, self.options).collect();
        let first_heading = first_heading_text(&events);

        let mut out = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());

        Ok(ParsedDocument {
            meta,
            html: out,
            first_heading,
        })
    }
}

/// Text content of the first heading of any level.
fn first_heading_text(events: &[Event<'_>]) -> Option<String> {
    let start = events
        .iter()
        .position(|e| matches!(e, Event::Start(Tag::Heading { .. })))?;

    let mut text = String::new();
    for event in &events[start + 1..] {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::meta::get_str;

    #[test]
    fn test_markdown_to_html() {
        let doc = MarkdownConverter::default()
            .parse("---\ntitle: T\n---\n# Hello `code`\n\nSome *text*.")
            .unwrap();

        assert_eq!(get_str(&doc.meta, "title"), Some("T"));
        assert!(doc.html.contains("<h1>Hello <code>code</code></h1>"));
        assert!(doc.html.contains("<em>text</em>"));
        assert_eq!(doc.first_heading.as_deref(), Some("Hello code"));
    }

    #[test]
    fn test_no_heading() {
        let doc = MarkdownConverter::default().parse("just a paragraph").unwrap();
        assert!(doc.first_heading.is_none());
        assert_eq!(doc.html.trim(), "<p>just a paragraph</p>");
    }

    #[test]
    fn test_malformed_markup_is_best_effort() {
        let doc = MarkdownConverter::default()
            .parse("**unclosed [link](\n| table | without |\n<div>")
            .unwrap();
        assert!(!doc.html.is_empty());
    }

    #[test]
    fn test_bad_frontmatter_is_error() {
        assert!(MarkdownConverter::default().parse("+++\n= nope\n+++\n").is_err());
    }

    #[test]
    fn test_gfm_extensions() {
        let doc = MarkdownConverter::default()
            .parse("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~")
            .unwrap();
        assert!(doc.html.contains("<table>"));
        assert!(doc.html.contains("<del>gone</del>"));
    }
}
