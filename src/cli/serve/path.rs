//! URL to filesystem path resolution.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Resolve URL to filesystem path, handling index.html for directories.
///
/// Returns `None` for anything missing or outside `serve_root`.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url)?;

    // Reject paths with suspicious patterns early
    if clean.split(['/', '\\']).any(|segment| segment == "..") {
        return None;
    }

    let local = serve_root.join(&clean);

    // Canonicalize to resolve symlinks and verify path is under serve_root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Strip query and fragment, percent-decode, trim slashes.
///
/// Invalid UTF-8 after decoding resolves to nothing.
fn normalize_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    Some(decoded.trim_matches('/').to_string())
}

/// Path component of a request URL, without query.
pub fn url_path(url: &str) -> Cow<'_, str> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    percent_decode_str(path).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn site() -> TempDir {
        let temp = TempDir::new().unwrap();
        let post = temp.path().join("2024/01/02/hello-world");
        fs::create_dir_all(&post).unwrap();
        fs::write(temp.path().join("index.html"), "home").unwrap();
        fs::write(post.join("index.html"), "post").unwrap();
        fs::write(temp.path().join("style.css"), "body{}").unwrap();
        temp
    }

    fn resolved(url: &str, root: &Path) -> Option<String> {
        resolve_path(url, root).map(|p| fs::read_to_string(p).unwrap())
    }

    #[test]
    fn test_directory_falls_back_to_index() {
        let temp = site();
        assert_eq!(resolved("/", temp.path()).as_deref(), Some("home"));
        assert_eq!(
            resolved("/2024/01/02/hello-world/", temp.path()).as_deref(),
            Some("post")
        );
        assert_eq!(
            resolved("/2024/01/02/hello-world", temp.path()).as_deref(),
            Some("post")
        );
        // Directory without an index
        assert_eq!(resolved("/2024/01/", temp.path()), None);
    }

    #[test]
    fn test_query_and_encoding() {
        let temp = site();
        assert_eq!(resolved("/style.css?v=3", temp.path()).as_deref(), Some("body{}"));
        assert_eq!(resolved("/%73tyle.css", temp.path()).as_deref(), Some("body{}"));
        assert_eq!(resolved("/missing.css", temp.path()), None);
    }

    #[test]
    fn test_traversal_rejected() {
        let temp = site();
        assert_eq!(resolve_path("/../secret.txt", temp.path()), None);
        assert_eq!(resolve_path("/%2e%2e/secret.txt", temp.path()), None);
        assert_eq!(resolve_path("/2024/../../etc/passwd", temp.path()), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        let temp = site();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

        assert_eq!(resolve_path("/link/secret.txt", temp.path()), None);
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("/_reload/events?t=1"), "/_reload/events");
        assert_eq!(url_path("/a%20b/"), "/a b/");
    }
}
