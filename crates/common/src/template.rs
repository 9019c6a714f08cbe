//! URL path templates such as `users/{id}/posts/{postId}`.

use serde::Serialize;

/// One piece of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum TemplatePart {
    /// Text copied as-is.
    Literal(String),
    /// A `{name}` placeholder, holds the name without braces.
    Placeholder(String),
}

/// A path split into literal text and `{name}` placeholders.
///
/// A placeholder is a `{` followed by at least one character other than `}` and a
/// closing `}`. Anything else, including `{}` and an unclosed `{`, stays literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathTemplate {
    /// The path as written.
    pub raw: String,
    /// Literal and placeholder pieces in order.
    pub parts: Vec<TemplatePart>,
}

impl PathTemplate {
    /// Splits `raw`; never fails.
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if close > 0 => {
                    if !literal.is_empty() {
                        parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(TemplatePart::Placeholder(after[..close].to_string()));
                    rest = &after[close + 1..];
                }
                _ => {
                    literal.push('{');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            parts.push(TemplatePart::Literal(literal));
        }

        Self {
            raw: raw.to_string(),
            parts,
        }
    }

    /// Placeholder names in template order, duplicates included.
    pub fn placeholders(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                TemplatePart::Placeholder(name) => Some(name.as_str()),
                TemplatePart::Literal(_) => None,
            })
            .collect()
    }

    /// At least one `{name}`.
    pub fn has_placeholders(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, TemplatePart::Placeholder(_)))
    }

    /// Empty path.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The template with every placeholder replaced by `value`.
    pub fn substitute_all(&self, value: &str) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                TemplatePart::Literal(text) => text.as_str(),
                TemplatePart::Placeholder(_) => value,
            })
            .collect()
    }
}
