//! Annotations copied or added to generated declarations.

use ktorgen_common::kotlin_string;

use super::ktor;
use crate::kotlin::ImportTable;
use crate::symbols::{AnnotationUse, AnnotationValue};

fn value(value: &AnnotationValue, imports: &mut ImportTable) -> String {
    match value {
        AnnotationValue::Bool(flag) => flag.to_string(),
        AnnotationValue::Int(number) => number.to_string(),
        AnnotationValue::Float(number) => number.to_string(),
        AnnotationValue::String(text) => kotlin_string(text),
        AnnotationValue::Array(items) => {
            let items: Vec<_> = items.iter().map(|item| self::value(item, imports)).collect();
            format!("[{}]", items.join(", "))
        }
        AnnotationValue::ClassRef { class } => format!("{}::class", imports.name(class)),
        AnnotationValue::EnumEntry { enum_type, entry } => format!("{}.{entry}", imports.name(enum_type)),
        AnnotationValue::Annotation { annotation } => body(annotation, imports),
    }
}

fn body(annotation: &AnnotationUse, imports: &mut ImportTable) -> String {
    let name = imports.name(&annotation.qualified_name);
    if annotation.arguments.is_empty() {
        return name;
    }
    let arguments: Vec<_> = annotation
        .arguments
        .iter()
        .map(|(key, argument)| format!("{key} = {}", value(argument, imports)))
        .collect();
    format!("{name}({})", arguments.join(", "))
}

/// `@Name(arg = value, ...)` for a host annotation.
pub fn render(annotation: &AnnotationUse, imports: &mut ImportTable) -> String {
    format!("@{}", body(annotation, imports))
}

/// `@Name` for every qualified annotation class name.
pub fn markers(names: &[String], imports: &mut ImportTable) -> Vec<String> {
    names.iter().map(|name| format!("@{}", imports.name(name))).collect()
}

/// `@OptIn(A::class, B::class)`, or nothing without markers.
pub fn opt_in<'a>(names: impl IntoIterator<Item = &'a String>, imports: &mut ImportTable) -> Option<String> {
    let mut classes: Vec<String> = Vec::new();
    for name in names {
        let class = format!("{}::class", imports.name(name));
        if !classes.contains(&class) {
            classes.push(class);
        }
    }
    if classes.is_empty() {
        return None;
    }
    Some(format!("@{}({})", imports.name(ktor::OPT_IN), classes.join(", ")))
}
