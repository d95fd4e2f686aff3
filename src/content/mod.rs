//! Content sources: frontmatter, markdown conversion and page records.

pub mod convert;
mod loader;
pub mod meta;
mod page;
pub mod slug;

pub use convert::{DocumentConverter, MarkdownConverter, ParsedDocument};
pub use loader::{LoadError, LoadOutcome, load_pages};
pub use page::{PageRecord, page_url};
