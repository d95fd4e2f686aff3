//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! content = "posts"                 # Markdown sources
//! output = "public"                 # Generated site (wiped on every build)
//! templates = "templates"           # index.html / post.html overrides
//! regenerate = ["templ", "generate"] # Run when a template source changes
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub content: PathBuf,
    pub output: PathBuf,
    pub templates: PathBuf,

    /// Template regeneration command. Empty means no regeneration step.
    pub regenerate: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "posts".into(),
            output: "public".into(),
            templates: "templates".into(),
            regenerate: Vec::new(),
        }
    }
}

impl BuildConfig {
    /// Checks run after paths are made absolute.
    ///
    /// The output directory is deleted wholesale on every build, so it must
    /// never be the project root or contain the content or template sources.
    pub fn validate(&self, root: &std::path::Path, diag: &mut ConfigDiagnostics) {
        if self.output == root || root.starts_with(&self.output) {
            diag.error("build.output", "must not be the project root or one of its parents");
        }
        if self.content.starts_with(&self.output) {
            diag.error("build.output", "must not contain the content directory");
        }
        if self.templates.starts_with(&self.output) {
            diag.error("build.output", "must not contain the templates directory");
        }
        if self.output.starts_with(&self.content) {
            diag.error("build.output", "must not live inside the content directory");
        }
        if self.regenerate.first().is_some_and(|p| p.trim().is_empty()) {
            diag.error("build.regenerate", "program name is empty");
        }
    }
}
