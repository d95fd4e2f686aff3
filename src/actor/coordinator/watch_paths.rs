use crate::actor::fs::WatchRoot;
use crate::config::SiteConfig;

/// Content and templates recursively, the project root shallowly for
/// sources kept next to the content directory.
///
/// Roots that do not exist yet are still listed; the watcher attaches them
/// once they appear.
pub(super) fn collect_watch_roots(config: &SiteConfig) -> Vec<WatchRoot> {
    let root = config.get_root();
    let mut roots = vec![WatchRoot::recursive(&config.build.content)];

    if config.build.templates != config.build.content {
        roots.push(WatchRoot::recursive(&config.build.templates));
    }

    let covered = roots.iter().any(|r| root.starts_with(&r.path));
    if !covered {
        roots.push(WatchRoot::shallow(root));
    }

    roots
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_default_roots() {
        let mut config = SiteConfig::default();
        config.finalize(Path::new("/site"));

        assert_eq!(
            collect_watch_roots(&config),
            vec![
                WatchRoot::recursive("/site/posts"),
                WatchRoot::recursive("/site/templates"),
                WatchRoot::shallow("/site"),
            ]
        );
    }

    #[test]
    fn test_content_at_root_covers_everything() {
        let mut config = test_parse_config("[build]\ncontent = \".\"\ntemplates = \".\"");
        config.finalize(Path::new("/site"));

        assert_eq!(collect_watch_roots(&config), vec![WatchRoot::recursive("/site")]);
    }
}
