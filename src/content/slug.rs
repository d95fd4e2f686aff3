//! URL slugs.
//!
//! Output is lowercase ASCII alphanumerics separated by single hyphens.
//! Non-ASCII text is transliterated first (`Grüße` -> `grusse`).

use deunicode::deunicode;

/// Fallback slug when nothing usable remains.
pub const UNTITLED: &str = "untitled";

/// Normalize arbitrary text into a slug. May return an empty string.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c != '\'' {
            // Apostrophes vanish ("don't" -> "dont"), everything else separates
            pending_hyphen = true;
        }
    }
    slug
}

/// First candidate that slugifies to something non-empty, else [`UNTITLED`].
pub fn first_slug<'a>(candidates: impl IntoIterator<Item = &'a str>) -> String {
    candidates
        .into_iter()
        .map(slugify)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Whether `s` already satisfies the slug invariant.
#[cfg(test)]
fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust 2024: what's new?  "), "rust-2024-whats-new");
        assert_eq!(slugify("a---b___c"), "a-b-c");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Grüße aus Köln"), "grusse-aus-koln");
        assert!(is_valid_slug(&slugify("日本語のタイトル")));
    }

    #[test]
    fn test_slugify_empty_result() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_first_slug_fallbacks() {
        assert_eq!(first_slug(["", "?!", "From Filename"]), "from-filename");
        assert_eq!(first_slug(["--", ""]), UNTITLED);
    }

    #[test]
    fn test_slug_invariant_holds() {
        for input in ["<script>alert(1)</script>", "../../etc/passwd", "Ünïcödé -- test", "C++ & C#"] {
            let slug = first_slug([input]);
            assert!(is_valid_slug(&slug), "{input:?} -> {slug:?}");
        }
    }
}
