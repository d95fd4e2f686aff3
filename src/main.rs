//! quire - a static blog builder with a live-reload development server.

mod actor;
mod cli;
mod config;
mod content;
mod core;
mod embed;
mod logger;
mod reload;
mod site;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Arc::new(SiteConfig::load(&cli)?);

    match &cli.command {
        None | Some(Commands::Build) => cli::build::build_once(&config),
        Some(Commands::Serve { .. }) => cli::serve::serve_site(config),
    }
}
