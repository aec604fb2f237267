//! Short-name to MIME alias table.
//!
//! A fixed lookup table populated at compile time. Unknown names are treated
//! as already-canonical MIME strings and returned unchanged.

/// Canonical MIME type for JSON bodies.
pub const MIME_JSON: &str = "application/json";
/// Canonical MIME type for form-urlencoded bodies.
pub const MIME_FORM: &str = "application/x-www-form-urlencoded";
/// Canonical MIME type for HTML bodies.
pub const MIME_HTML: &str = "text/html";

/// Short alias → canonical MIME type.
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("json", MIME_JSON),
    ("html", MIME_HTML),
    ("form", MIME_FORM),
    ("form-data", MIME_FORM),
    ("urlencoded", MIME_FORM),
    ("xml", "application/xml"),
    ("text", "text/plain"),
];

/// Resolves a short type alias to its canonical MIME string.
///
/// Strings that are not in the alias table pass through unchanged, so
/// callers may hand in either `"json"` or an explicit `"text/x-foo"`.
pub fn resolve_alias(name: &str) -> &str {
    TYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, mime)| *mime)
        .unwrap_or(name)
}
