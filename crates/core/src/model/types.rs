//! Classification of resolved types into the shapes the generator knows how to emit.

use serde::Serialize;

use crate::symbols::TypeRef;

/// `kotlin.Unit`.
pub const UNIT: &str = "kotlin.Unit";
/// `kotlin.Any`.
pub const ANY: &str = "kotlin.Any";
/// `kotlin.String`.
pub const STRING: &str = "kotlin.String";
/// `kotlin.Result`.
pub const RESULT: &str = "kotlin.Result";
/// `kotlin.Pair`.
pub const PAIR: &str = "kotlin.Pair";
/// `kotlin.collections.Map`.
pub const MAP: &str = "kotlin.collections.Map";
/// `kotlin.collections.MutableMap`.
pub const MUTABLE_MAP: &str = "kotlin.collections.MutableMap";
/// `kotlinx.coroutines.flow.Flow`.
pub const FLOW: &str = "kotlinx.coroutines.flow.Flow";
/// Ktor client.
pub const HTTP_CLIENT: &str = "io.ktor.client.HttpClient";
/// Mutable request description.
pub const HTTP_REQUEST_BUILDER: &str = "io.ktor.client.request.HttpRequestBuilder";
/// Sent request.
pub const HTTP_REQUEST: &str = "io.ktor.client.request.HttpRequest";
/// Immutable request description.
pub const HTTP_REQUEST_DATA: &str = "io.ktor.client.request.HttpRequestData";
/// Unexecuted request.
pub const HTTP_STATEMENT: &str = "io.ktor.client.statement.HttpStatement";
/// One multipart part.
pub const PART_DATA: &str = "io.ktor.http.content.PartData";

const COLLECTIONS: &[&str] = &[
    "kotlin.Array",
    "kotlin.collections.List",
    "kotlin.collections.MutableList",
    "kotlin.collections.Collection",
    "kotlin.collections.MutableCollection",
    "kotlin.collections.Iterable",
    "kotlin.collections.Set",
    "kotlin.collections.MutableSet",
];

/// What a function return type asks the generated body to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "inner")]
pub enum ReturnKind {
    /// No response body.
    Unit,
    /// Response body deserialized into this type.
    Plain(TypeRef),
    /// Failures captured in `Result`.
    Result(Box<ReturnKind>),
    /// Cold stream emitting one value.
    Flow(Box<ReturnKind>),
    /// The populated `HttpRequestBuilder` itself.
    Builder,
    /// An unexecuted `HttpStatement`.
    Statement,
    /// `Result` or `Flow` without a concrete type argument.
    Unsupported,
}

impl ReturnKind {
    /// Classifies a declared return type.
    pub fn classify(type_ref: &TypeRef) -> Self {
        if type_ref.is(FLOW) {
            return match type_ref.argument(0) {
                Some(item) if item.is(RESULT) => match item.argument(0) {
                    Some(inner) => Self::Flow(Box::new(Self::Result(Box::new(Self::leaf(inner))))),
                    None => Self::Unsupported,
                },
                Some(item) => Self::Flow(Box::new(Self::leaf(item))),
                None => Self::Unsupported,
            };
        }
        if type_ref.is(RESULT) {
            return match type_ref.argument(0) {
                Some(inner) if inner.is(HTTP_REQUEST_BUILDER) => Self::Result(Box::new(Self::Builder)),
                Some(inner) if inner.is(HTTP_STATEMENT) => Self::Result(Box::new(Self::Statement)),
                Some(inner) => Self::Result(Box::new(Self::leaf(inner))),
                None => Self::Unsupported,
            };
        }
        if type_ref.is(HTTP_REQUEST_BUILDER) {
            return Self::Builder;
        }
        if type_ref.is(HTTP_STATEMENT) {
            return Self::Statement;
        }
        Self::leaf(type_ref)
    }

    fn leaf(type_ref: &TypeRef) -> Self {
        if type_ref.is(UNIT) {
            Self::Unit
        } else {
            Self::Plain(type_ref.clone())
        }
    }

    /// Shapes that never suspend: streams and request descriptions.
    pub fn is_non_suspending(&self) -> bool {
        match self {
            Self::Flow(_) | Self::Builder | Self::Statement => true,
            Self::Result(inner) => matches!(**inner, Self::Builder | Self::Statement),
            Self::Unit | Self::Plain(_) | Self::Unsupported => false,
        }
    }

    /// Returns `Unit`.
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

/// How a parameter contributes values: once, or once per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Container {
    /// One value.
    Single,
    /// A collection or vararg.
    Many,
}

/// Nullability and collection-ness of a parameter, the inputs of every null-guard decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeShape {
    /// Single value or collection.
    pub container: Container,
    /// The collection itself may be null.
    pub container_nullable: bool,
    /// The value type, the element type for collections.
    pub element: TypeRef,
    /// Elements may be null.
    pub element_nullable: bool,
}

impl TypeShape {
    /// Shape of a declared type; a vararg is always a collection of its element.
    pub fn of(type_ref: &TypeRef, is_vararg: bool) -> Self {
        if is_vararg {
            return Self {
                container: Container::Many,
                container_nullable: false,
                element: type_ref.clone(),
                element_nullable: type_ref.nullable,
            };
        }
        if COLLECTIONS.contains(&type_ref.qualified_name.as_str()) {
            if let Some(element) = type_ref.argument(0) {
                return Self {
                    container: Container::Many,
                    container_nullable: type_ref.nullable,
                    element: element.clone(),
                    element_nullable: element.nullable,
                };
            }
        }
        Self {
            container: Container::Single,
            container_nullable: type_ref.nullable,
            element: type_ref.clone(),
            element_nullable: type_ref.nullable,
        }
    }

    /// Elements are `String`, already encoded text when flagged so.
    pub fn is_string_valued(&self) -> bool {
        self.element.is(STRING)
    }
}

/// `Map` or `MutableMap`.
pub fn is_map(type_ref: &TypeRef) -> bool {
    type_ref.is(MAP) || type_ref.is(MUTABLE_MAP)
}

/// `kotlin.Pair`.
pub fn is_pair(type_ref: &TypeRef) -> bool {
    type_ref.is(PAIR)
}

/// `kotlin.Any`.
pub fn is_any(type_ref: &TypeRef) -> bool {
    type_ref.is(ANY)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeRef {
        TypeRef::named(name)
    }

    #[test]
    fn test_classify_plain_and_unit() {
        assert_eq!(ReturnKind::classify(&named(UNIT)), ReturnKind::Unit);
        assert_eq!(
            ReturnKind::classify(&named(STRING)),
            ReturnKind::Plain(named(STRING))
        );
    }

    #[test]
    fn test_classify_wrappers() {
        let flow_of_result = named(FLOW).with_arguments(vec![named(RESULT).with_arguments(vec![named(STRING)])]);
        assert_eq!(
            ReturnKind::classify(&flow_of_result),
            ReturnKind::Flow(Box::new(ReturnKind::Result(Box::new(ReturnKind::Plain(named(STRING))))))
        );
        let result_builder = named(RESULT).with_arguments(vec![named(HTTP_REQUEST_BUILDER)]);
        let kind = ReturnKind::classify(&result_builder);
        assert_eq!(kind, ReturnKind::Result(Box::new(ReturnKind::Builder)));
        assert!(kind.is_non_suspending());
        assert_eq!(ReturnKind::classify(&named(FLOW)), ReturnKind::Unsupported);
    }

    #[test]
    fn test_nested_results_stay_plain() {
        let inner = named(RESULT).with_arguments(vec![named(STRING)]);
        let nested = named(RESULT).with_arguments(vec![inner.clone()]);
        assert_eq!(
            ReturnKind::classify(&nested),
            ReturnKind::Result(Box::new(ReturnKind::Plain(inner)))
        );
    }

    #[test]
    fn test_shape_of_collections_and_vararg() {
        let list = named("kotlin.collections.List")
            .with_arguments(vec![named(STRING).nullable()])
            .nullable();
        let shape = TypeShape::of(&list, false);
        assert_eq!(shape.container, Container::Many);
        assert!(shape.container_nullable);
        assert!(shape.element_nullable);
        assert!(shape.is_string_valued());

        let vararg = TypeShape::of(&named("kotlin.Int"), true);
        assert_eq!(vararg.container, Container::Many);
        assert!(!vararg.container_nullable);
        assert!(!vararg.element_nullable);

        let single = TypeShape::of(&named("kotlin.Int").nullable(), false);
        assert_eq!(single.container, Container::Single);
        assert!(single.container_nullable);
    }
}
