//! `[watch]` section configuration.
//!
//! ```toml
//! [watch]
//! debounce_ms = 100                     # Quiet period before a rebuild
//! content_extensions = ["md", "markdown"]
//! template_extensions = ["html", "templ"]
//! keepalive_secs = 30                   # Idle comment interval on /_reload/events
//! reload_buffer = 10                    # Pending reload signals kept
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub debounce_ms: u64,
    pub content_extensions: Vec<String>,
    pub template_extensions: Vec<String>,
    pub keepalive_secs: u64,
    pub reload_buffer: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            content_extensions: vec!["md".into(), "markdown".into()],
            template_extensions: vec!["html".into(), "templ".into()],
            keepalive_secs: 30,
            reload_buffer: 10,
        }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    pub fn is_content_ext(&self, ext: &str) -> bool {
        self.content_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn is_template_ext(&self, ext: &str) -> bool {
        self.template_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms == 0 {
            diag.error("watch.debounce_ms", "must be greater than 0");
        }
        if self.content_extensions.is_empty() {
            diag.error("watch.content_extensions", "at least one extension is required");
        }
        if self.keepalive_secs == 0 {
            diag.error("watch.keepalive_secs", "must be greater than 0");
        }
        if self.reload_buffer == 0 {
            diag.error("watch.reload_buffer", "must be greater than 0");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_watch_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.watch.debounce(), Duration::from_millis(100));
        assert_eq!(config.watch.keepalive(), Duration::from_secs(30));
        assert_eq!(config.watch.reload_buffer, 10);
        assert!(config.watch.is_content_ext("MD"));
        assert!(config.watch.is_template_ext("templ"));
        assert!(!config.watch.is_content_ext("txt"));
    }

    #[test]
    fn test_watch_config_validate() {
        let config = test_parse_config("[watch]\ndebounce_ms = 0\nreload_buffer = 0");
        let mut diag = ConfigDiagnostics::new();
        config.watch.validate(&mut diag);
        let fields: Vec<_> = diag.errors().iter().map(|d| d.field).collect();
        assert_eq!(fields, vec!["watch.debounce_ms", "watch.reload_buffer"]);
    }
}
