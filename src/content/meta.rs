//! Frontmatter extraction.
//!
//! Two delimiters are recognized at the top of a document:
//!
//! ```text
//! ---                      +++
//! title: Hello             title = "Hello"
//! date: 2024-01-02         date = "2024-01-02"
//! tags: rust, web          tags = ["rust", "web"]
//! draft: true              draft = true
//! ---                      +++
//! ```
//!
//! The `---` form is a flat `key: value` list, not full YAML.

use serde_json::{Map, Value};

/// Metadata map produced by a converter.
pub type Meta = Map<String, Value>;

/// Split frontmatter off a document.
///
/// Returns `(meta, body)`. Documents without frontmatter yield an empty map
/// and the full text.
pub fn extract_frontmatter(content: &str) -> Result<(Meta, &str), String> {
    match detect_frontmatter(content) {
        Some((fm, body, true)) => {
            let meta = toml::from_str::<Meta>(fm)
                .map_err(|e| format!("invalid TOML frontmatter: {}", e.message()))?;
            Ok((meta, body))
        }
        Some((fm, body, false)) => Ok((parse_yaml_like(fm), body)),
        None => Ok((Meta::new(), content)),
    }
}

/// Returns `(frontmatter, body, is_toml)` if found.
fn detect_frontmatter(content: &str) -> Option<(&str, &str, bool)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        let Some(rest) = trimmed.strip_prefix(fence) else {
            continue;
        };
        // The opening fence must be alone on its line
        if !rest.starts_with(['\n', '\r']) {
            continue;
        }
        let closing = format!("\n{fence}");
        if let Some(end) = rest.find(&closing) {
            let fm = rest[..end].trim();
            let after = &rest[end + closing.len()..];
            let body = after
                .split_once('\n')
                .map_or("", |(_, body)| body)
                .trim_start_matches(['\r', '\n']);
            return Some((fm, body, is_toml));
        }
    }
    None
}

/// Parse a flat `key: value` block.
fn parse_yaml_like(content: &str) -> Meta {
    let mut meta = Meta::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let key = key.trim().to_ascii_lowercase();
        let value = unquote(value.trim());
        let parsed = match key.as_str() {
            // Always strings, even when they look like numbers
            "title" | "slug" | "description" | "date" => Value::String(value.to_string()),
            "tags" => Value::Array(parse_list(value)),
            _ => parse_yaml_value(value),
        };
        meta.insert(key, parsed);
    }
    meta
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(q).and_then(|s| s.strip_suffix(q)) {
            return inner;
        }
    }
    s
}

/// `a, b` and `[a, b]` both become a list.
fn parse_list(s: &str) -> Vec<Value> {
    let s = s
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(s);
    s.split(',')
        .map(|item| unquote(item.trim()))
        .filter(|item| !item.is_empty())
        .map(|item| Value::String(item.to_string()))
        .collect()
}

/// Scalars: booleans, null, integers, floats, comma lists, else string.
fn parse_yaml_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if s.eq_ignore_ascii_case("null") || s == "~" {
        return Value::Null;
    }
    if let Ok(n) = s.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = s.parse::<f64>()
        && let Some(num) = serde_json::Number::from_f64(n)
    {
        return Value::Number(num);
    }
    if s.contains(',') || (s.starts_with('[') && s.ends_with(']')) {
        return Value::Array(parse_list(s));
    }
    Value::String(s.to_string())
}

// ============================================================================
// Typed accessors
// ============================================================================

/// String field. TOML datetimes (`date = 2024-01-02`) come through serde as
/// a single-entry table and are unwrapped here.
pub fn get_str<'a>(meta: &'a Meta, key: &str) -> Option<&'a str> {
    let value = match meta.get(key)? {
        Value::Object(obj) if obj.len() == 1 => obj.values().next()?,
        other => other,
    };
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

pub fn get_bool(meta: &Meta, key: &str) -> bool {
    match meta.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// List of strings; a single string counts as a one-element list.
pub fn get_list(meta: &Meta, key: &str) -> Vec<String> {
    match meta.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => parse_list(s)
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
