//! Site configuration (`quire.toml`).
//!
//! The file is optional: without one every section uses its defaults and
//! the project root is the working directory (or `--root`).
//!
//! | Section   | Purpose                                          |
//! |-----------|--------------------------------------------------|
//! | `[site]`  | Title, description, base URL, language           |
//! | `[build]` | Content/output/template paths, regenerate command |
//! | `[serve]` | Development server (interface, port, watch)      |
//! | `[watch]` | Debounce window, relevant extensions, reload SSE  |

mod error;
pub mod section;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{BuildConfig, ServeConfig, SiteInfoConfig, WatchConfig};

use crate::cli::{Cli, Commands};
use crate::log;
use crate::utils::path::normalize_path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "quire.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path of the config file (may not exist)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteInfoConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl SiteConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// An explicitly passed `--config` must exist; the default `quire.toml`
    /// is optional.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let root = normalize_path(&cli.root.as_ref().map_or_else(|| cwd.clone(), |r| cwd.join(r)));

        let (config_path, required) = match &cli.config {
            Some(path) => (root.join(path), true),
            None => (root.join(CONFIG_FILE), false),
        };

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else if required {
            return Err(ConfigError::Io(
                config_path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
            )
            .into());
        } else {
            crate::debug!("config"; "{} not found, using defaults", CONFIG_FILE);
            Self::default()
        };

        config.config_path = config_path;
        config.apply_command_options(cli);
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {} (ignored): {}",
                path.file_name().map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy()),
                ignored.join(", "));
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Resolve every configured path against the project root.
    pub fn finalize(&mut self, root: &Path) {
        self.root = normalize_path(root);
        self.build.content = normalize_path(&self.root.join(&self.build.content));
        self.build.output = normalize_path(&self.root.join(&self.build.output));
        self.build.templates = normalize_path(&self.root.join(&self.build.templates));
    }

    /// Validate all sections, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.site.validate(&mut diag);
        self.build.validate(&self.root, &mut diag);
        self.watch.validate(&mut diag);
        diag.into_result()
    }

    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        if let Some(Commands::Serve {
            interface,
            port,
            watch,
        }) = &cli.command
        {
            update_option(&mut self.serve.interface, interface.as_ref());
            update_option(&mut self.serve.port, port.as_ref());
            update_option(&mut self.serve.watch, watch.as_ref());
        }
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Path relative to the project root, for display.
    pub fn root_relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Update config option if CLI value is provided.
fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
    if let Some(option) = cli_option {
        *config_option = option.clone();
    }
}

/// Parse config with a minimal `[site]` header.
/// Panics on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!("[site]\ntitle = \"Test\"\ndescription = \"Test\"\n{extra}");
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Config rooted at a directory with default sections and absolute paths.
#[cfg(test)]
pub fn test_config_at(root: &Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.config_path = root.join(CONFIG_FILE);
    config.finalize(root);
    config
}
