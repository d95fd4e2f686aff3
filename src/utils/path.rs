//! Path normalization.

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first. Falls back to the path itself when already
/// absolute, or joined onto the current directory when relative.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Join a URL path (`/2024/01/02/slug/`) onto a directory.
///
/// Returns `None` if any segment would climb out of `base`.
pub fn join_url_path(base: &Path, url: &str) -> Option<PathBuf> {
    let mut out = base.to_path_buf();
    for component in Path::new(url.trim_matches('/')).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_path() {
        let base = Path::new("/site/public");
        assert_eq!(
            join_url_path(base, "/2024/01/02/hello/"),
            Some(PathBuf::from("/site/public/2024/01/02/hello"))
        );
        assert_eq!(join_url_path(base, "/"), Some(PathBuf::from("/site/public")));
    }

    #[test]
    fn test_join_url_path_rejects_parent() {
        assert_eq!(join_url_path(Path::new("/site/public"), "/../etc/"), None);
    }

    #[test]
    fn test_normalize_absolute_missing_path() {
        let p = Path::new("/definitely/not/here/quire");
        assert_eq!(normalize_path(p), p);
    }
}
