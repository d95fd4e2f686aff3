//! Configuration sections.
//!
//! | Module  | TOML Section | Purpose                                   |
//! |---------|--------------|-------------------------------------------|
//! | `build` | `[build]`    | Content/output/template paths, regenerate |
//! | `serve` | `[serve]`    | Development server                        |
//! | `site`  | `[site]`     | Site metadata used by templates and SEO   |
//! | `watch` | `[watch]`    | Watcher, debounce and reload channel      |

mod build;
mod serve;
mod site;
mod watch;

pub use build::BuildConfig;
pub use serve::ServeConfig;
pub use site::SiteInfoConfig;
pub use watch::WatchConfig;
