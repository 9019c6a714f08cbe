//! Shape check shared by every map-like role.

use crate::model::types::{STRING, is_map, is_pair};
use crate::model::ParameterModel;
use crate::symbols::TypeRef;

/// Container kind of a map-like parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapShape {
    /// `Map<K, V>` or `MutableMap<K, V>`.
    Map,
    /// `Pair<K, V>`.
    Pair,
}

fn is_string_key(key: Option<&TypeRef>) -> bool {
    key.is_some_and(|key| key.is(STRING) && !key.nullable)
}

/// Classify the type of a `@HeaderMap`/`@QueryMap`/`@FieldMap`/`@PartMap` parameter.
///
/// The key must be a non-null `String`. With `string_values` the value must be
/// `String` as well, nullable or not. `None` means the shape is not accepted.
pub fn map_shape(parameter: &ParameterModel, string_values: bool) -> Option<MapShape> {
    let type_ref = &parameter.type_ref;
    let shape = if is_map(type_ref) {
        MapShape::Map
    } else if is_pair(type_ref) {
        MapShape::Pair
    } else {
        return None;
    };
    if !is_string_key(type_ref.argument(0)) {
        return None;
    }
    if string_values && !type_ref.argument(1).is_some_and(|value| value.is(STRING)) {
        return None;
    }
    Some(shape)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::types::{MAP, PAIR};

    fn parameter(type_ref: TypeRef) -> ParameterModel {
        ParameterModel {
            name: "values".into(),
            type_ref,
            is_vararg: false,
            roles: Vec::new(),
            builder: None,
            passthrough: Vec::new(),
        }
    }

    fn map(key: TypeRef, value: TypeRef) -> TypeRef {
        TypeRef::named(MAP).with_arguments(vec![key, value])
    }

    #[test]
    fn test_accepts_string_keys() {
        let shape = map_shape(&parameter(map(TypeRef::named(STRING), TypeRef::named("kotlin.Int"))), false);
        assert_eq!(shape, Some(MapShape::Map));
        let pair = TypeRef::named(PAIR).with_arguments(vec![TypeRef::named(STRING), TypeRef::named(STRING).nullable()]);
        assert_eq!(map_shape(&parameter(pair), true), Some(MapShape::Pair));
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert_eq!(map_shape(&parameter(TypeRef::named(STRING)), false), None);
        let nullable_key = map(TypeRef::named(STRING).nullable(), TypeRef::named(STRING));
        assert_eq!(map_shape(&parameter(nullable_key), false), None);
        let int_values = map(TypeRef::named(STRING), TypeRef::named("kotlin.Int"));
        assert_eq!(map_shape(&parameter(int_values), true), None);
    }
}
