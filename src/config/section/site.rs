//! `[site]` section configuration.
//!
//! Metadata handed to the page renderer and the SEO injector.

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    pub title: String,
    pub description: String,
    pub author: String,

    /// Public base URL (e.g. `https://example.com`). Enables `og:url` and
    /// canonical links.
    pub url: Option<String>,

    /// Language code for `<html lang>`.
    pub language: String,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            title: "Blog".into(),
            description: String::new(),
            author: String::new(),
            url: None,
            language: "en".into(),
        }
    }
}

impl SiteInfoConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(url) = &self.url {
            match url::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => diag.error(
                    "site.url",
                    format!("unsupported scheme `{}`, expected http or https", parsed.scheme()),
                ),
                Err(e) => diag.error("site.url", format!("invalid URL `{url}`: {e}")),
            }
        }
    }

    /// Absolute URL for a site path, if a base URL is configured.
    pub fn absolute_url(&self, path: &str) -> Option<String> {
        let raw = self.url.as_deref()?;
        // Without a trailing slash `join` would replace the last segment.
        let base = if raw.ends_with('/') {
            url::Url::parse(raw)
        } else {
            url::Url::parse(&format!("{raw}/"))
        }
        .ok()?;
        base.join(path.trim_start_matches('/'))
            .ok()
            .map(|u| u.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_site_config() {
        let config = test_parse_config("url = \"https://example.com/blog/\"\nlanguage = \"de\"");
        assert_eq!(config.site.title, "Test");
        assert_eq!(config.site.language, "de");
        assert_eq!(
            config.site.absolute_url("/2024/01/02/hello/").as_deref(),
            Some("https://example.com/blog/2024/01/02/hello/")
        );
    }

    #[test]
    fn test_absolute_url_without_base() {
        let site = SiteInfoConfig::default();
        assert_eq!(site.absolute_url("/x/"), None);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut diag = ConfigDiagnostics::new();
        let site = SiteInfoConfig {
            url: Some("ftp://example.com".into()),
            ..Default::default()
        };
        site.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.errors()[0].field, "site.url");
    }
}
