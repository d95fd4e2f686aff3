//! One-shot build (`quire` / `quire build`).

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::site::run_full_build;

/// Build the site once. Any failure is returned so the process exits
/// non-zero.
pub fn build_once(config: &SiteConfig) -> Result<()> {
    run_full_build(config)
        .with_context(|| format!("build of {} failed", config.get_root().display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::config::test_config_at;

    #[test]
    fn test_build_once_writes_index() {
        let temp = TempDir::new().unwrap();
        let config = test_config_at(temp.path());
        fs::create_dir_all(&config.build.content).unwrap();
        fs::write(config.build.content.join("2024-05-05-may.md"), "# May").unwrap();

        build_once(&config).unwrap();
        assert!(config.build.output.join("index.html").is_file());
        assert!(config.build.output.join("2024/05/05/may/index.html").is_file());
    }

    #[test]
    fn test_build_once_reports_failure() {
        let temp = TempDir::new().unwrap();
        let mut config = test_config_at(temp.path());
        fs::write(temp.path().join("blocker"), "").unwrap();
        config.build.output = temp.path().join("blocker/public");

        let err = build_once(&config).unwrap_err();
        assert!(format!("{err:#}").contains("failed"));
    }
}
