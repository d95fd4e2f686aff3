//! Live-reload client injection for served HTML.

use std::sync::LazyLock;

use crate::embed::serve::{HOTRELOAD_JS, HotreloadVars};
use crate::reload::EVENTS_PATH;
use crate::utils::html::insert_before_last;
use crate::utils::mime;

static SCRIPT_TAG: LazyLock<String> = LazyLock::new(|| {
    let js = HOTRELOAD_JS.render(&HotreloadVars {
        events_path: EVENTS_PATH,
    });
    format!("<script>{js}</script>")
});

/// Inject the reload client before `</body>` when live reload is on and the
/// body is HTML. Documents without `</body>` get it appended.
pub fn maybe_inject_reload_client(body: Vec<u8>, content_type: &str, live_reload: bool) -> Vec<u8> {
    if live_reload && mime::is_html(content_type) {
        insert_before_last(&body, b"</body>", SCRIPT_TAG.as_bytes())
    } else {
        body
    }
}
