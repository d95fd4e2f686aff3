//! Template types for typed variable injection.
//!
//! Placeholders are written `{{name}}` (surrounding spaces allowed).
//! Substitution is a single pass, so values containing `{{...}}` are never
//! expanded again. Unknown placeholders are left as they are.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{[ \t]*([A-Za-z_][A-Za-z0-9_]*)[ \t]*\}\}").expect("placeholder pattern is valid")
});

/// Trait for template variable sets
pub trait TemplateVars {
    /// Value for `{{name}}`, already escaped for its context.
    fn get(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Substitute every known placeholder in `content`.
    fn apply(&self, content: &str) -> String {
        PLACEHOLDER
            .replace_all(content, |caps: &Captures<'_>| match self.get(&caps[1]) {
                Some(value) => value.into_owned(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }

    pub const fn content(&self) -> &'static str {
        self.content
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}
