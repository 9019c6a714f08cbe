//! Null guards and loops around parameter values.
//!
//! Every role that reads a parameter value goes through [`for_each_value`] or
//! [`for_each_entry`], so nullability is handled the same way for queries,
//! headers, fields, parts, tags and fragments:
//! - non-null scalar: used directly
//! - nullable scalar: `p?.let { ... }`
//! - collection or vararg: `p.forEach { ... }`, with `?.` and `filterNotNull()`
//!   inserted for a nullable container or nullable elements

use crate::kotlin::{KtBlock, KtStmt};
use crate::model::{Container, ParameterModel, TypeShape};
use crate::model::types::{STRING, is_pair};

fn is_identifier(expr: &str) -> bool {
    expr.chars().next().is_some_and(|first| first.is_alphabetic() || first == '_')
        && expr.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// `"$expr"`, or `"${expr}"` when `expr` is not a plain identifier.
pub fn string_template(expr: &str) -> String {
    if is_identifier(expr) {
        format!("\"${expr}\"")
    } else {
        format!("\"${{{expr}}}\"")
    }
}

/// One non-null value inside the emitted guard or loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    expr: String,
    string_valued: bool,
}

impl Value {
    pub fn new(expr: impl Into<String>, string_valued: bool) -> Self {
        Self {
            expr: expr.into(),
            string_valued,
        }
    }

    /// The value as is.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The value as a `String`, templated unless it already is one.
    pub fn text(&self) -> String {
        if self.string_valued {
            self.expr.clone()
        } else {
            string_template(&self.expr)
        }
    }
}

/// Statements running `emit` once for every non-null value of `name`.
pub fn for_each_value(name: &str, shape: &TypeShape, emit: impl Fn(&Value) -> Vec<KtStmt>) -> Vec<KtStmt> {
    let string_valued = shape.is_string_valued();
    match shape.container {
        Container::Single if shape.container_nullable => {
            vec![KtBlock::new(format!("{name}?.let"), emit(&Value::new("it", string_valued))).into()]
        }
        Container::Single => emit(&Value::new(name, string_valued)),
        Container::Many => {
            let safe = if shape.container_nullable { "?" } else { "" };
            let mut source = format!("{name}{safe}");
            if shape.element_nullable {
                source.push_str(&format!(".filterNotNull(){safe}"));
            }
            vec![KtBlock::new(format!("{source}.forEach"), emit(&Value::new("it", string_valued))).into()]
        }
    }
}

/// Statements running `emit(key, value)` for every entry of a `Map<String, *>`
/// or `Pair<String, *>` parameter, skipping null values.
pub fn for_each_entry(parameter: &ParameterModel, emit: impl Fn(&str, &Value) -> Vec<KtStmt>) -> Vec<KtStmt> {
    let type_ref = &parameter.type_ref;
    let value_type = type_ref.argument(1);
    let string_valued = value_type.is_some_and(|value| value.is(STRING));
    // A star projection reads as `Any?`.
    let value_nullable = value_type.is_none_or(|value| value.nullable);
    let (item, key, value) = if is_pair(type_ref) {
        ("pair", "pair.first", "pair.second")
    } else {
        ("entry", "entry.key", "entry.value")
    };

    let body = if value_nullable {
        vec![KtBlock::lambda(format!("{value}?.let"), "value", emit(key, &Value::new("value", string_valued))).into()]
    } else {
        emit(key, &Value::new(value, string_valued))
    };

    let safe = if type_ref.nullable { "?" } else { "" };
    let name = &parameter.name;
    let entries = if is_pair(type_ref) {
        if parameter.is_vararg {
            format!("{name}.forEach")
        } else if type_ref.nullable {
            format!("{name}?.let")
        } else {
            format!("{name}.let")
        }
    } else {
        format!("{name}{safe}.forEach")
    };

    if parameter.is_vararg && !is_pair(type_ref) {
        let inner = KtBlock::lambda(format!("_map{safe}.forEach"), item, body);
        return vec![KtBlock::lambda(format!("{name}.forEach"), "_map", vec![inner.into()]).into()];
    }
    vec![KtBlock::lambda(entries, item, body).into()]
}
