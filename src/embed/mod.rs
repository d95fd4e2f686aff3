//! Embedded static resources.
//!
//! - `site` - Default page templates, used when `templates/` has no override
//! - `serve` - Dev server live-reload client
//!
//! ```ignore
//! use embed::serve::{HOTRELOAD_JS, HotreloadVars};
//!
//! let js = HOTRELOAD_JS.render(&HotreloadVars { events_path: "/_reload/events" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod site {
    use super::Template;
    use crate::site::render::{IndexVars, PostVars};

    /// Fallback for `templates/index.html`.
    pub const INDEX_HTML: Template<IndexVars<'static>> =
        Template::new(include_str!("site/index.html"));

    /// Fallback for `templates/post.html`.
    pub const POST_HTML: Template<PostVars<'static>> =
        Template::new(include_str!("site/post.html"));
}

pub mod serve {
    use std::borrow::Cow;

    use super::{Template, TemplateVars};

    /// Variables for hotreload.js.
    pub struct HotreloadVars<'a> {
        pub events_path: &'a str,
    }

    impl TemplateVars for HotreloadVars<'_> {
        fn get(&self, name: &str) -> Option<Cow<'_, str>> {
            match name {
                "events_path" => Some(Cow::Borrowed(self.events_path)),
                _ => None,
            }
        }
    }

    /// Live-reload client: reloads the page on each `reload` event.
    pub const HOTRELOAD_JS: Template<HotreloadVars<'static>> =
        Template::new(include_str!("serve/hotreload.js"));
}
