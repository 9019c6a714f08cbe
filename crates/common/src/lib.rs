//! Shared helpers for the ktorgen crates.
//!
//! Naming rules, Kotlin literal escaping and URL path templates live here so the
//! extractor, the validators and the code generator agree on them.

pub mod template;

pub use template::{PathTemplate, TemplatePart};

/// Sentinel used by annotation arguments that were not set by the user.
pub const KTORGEN_DEFAULT_NAME: &str = "__DEFAULT__";

/// Check whether an annotation argument still holds the unset sentinel.
pub fn is_unset(value: &str) -> bool {
    value == KTORGEN_DEFAULT_NAME
}

/// Replace the unset sentinel (or an empty value) with `fallback`.
pub fn name_or(value: &str, fallback: &str) -> String {
    if is_unset(value) || value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Blank means empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.chars().all(char::is_whitespace)
}

/// Remove every whitespace character, header names and values are compared this way.
pub fn remove_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Lower-case the first character: `BaseApi` -> `baseApi`.
pub fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-case the first character: `userApi` -> `UserApi`.
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Last segment of a dotted qualified name.
pub fn simple_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or(qualified_name, |(_, simple)| simple)
}

/// Package part of a dotted qualified name, assuming upper-case class segments.
pub fn package_of(qualified_name: &str) -> &str {
    let mut end = 0;
    let mut offset = 0;
    for segment in qualified_name.split('.') {
        if segment.starts_with(|c: char| c.is_ascii_uppercase()) {
            break;
        }
        end = offset + segment.len();
        offset = end + 1;
    }
    &qualified_name[..end]
}

/// Escape text for use inside a Kotlin double-quoted string literal.
///
/// `$` is escaped too, template interpolation is always emitted explicitly.
pub fn escape_kotlin_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '$' => escaped.push_str("\\$"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Quote a value as a Kotlin string literal.
pub fn kotlin_string(value: &str) -> String {
    format!("\"{}\"", escape_kotlin_string(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_name_or_replaces_sentinel_and_empty() {
        assert_eq!(name_or(KTORGEN_DEFAULT_NAME, "id"), "id");
        assert_eq!(name_or("", "id"), "id");
        assert_eq!(name_or("user_id", "id"), "user_id");
    }

    #[test]
    fn test_blank_and_whitespace() {
        assert!(is_blank("  \t"));
        assert!(is_blank(""));
        assert!(!is_blank(" a "));
        assert_eq!(remove_whitespace(" Content - Type "), "Content-Type");
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(lower_camel("BaseApi"), "baseApi");
        assert_eq!(lower_camel(""), "");
        assert_eq!(upper_first("userApi"), "UserApi");
    }

    #[test]
    fn test_qualified_name_parts() {
        assert_eq!(simple_name("com.example.TestService"), "TestService");
        assert_eq!(simple_name("TestService"), "TestService");
        assert_eq!(package_of("com.example.TestService"), "com.example");
        assert_eq!(package_of("com.example.Outer.Inner"), "com.example");
        assert_eq!(package_of("TestService"), "");
    }

    #[test]
    fn test_kotlin_string_escapes_templates() {
        assert_eq!(kotlin_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(kotlin_string("$id"), "\"\\$id\"");
        assert_eq!(kotlin_string("C:\\tmp"), "\"C:\\\\tmp\"");
    }
}
