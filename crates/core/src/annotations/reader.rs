//! Typed extraction of vocabulary annotations from host `AnnotationUse`s.
//!
//! This is the only place that looks arguments up by name. Everything past this
//! module works with the records in `annotations`.

use ktorgen_common::{KTORGEN_DEFAULT_NAME, is_unset, name_or};

use super::{
    CORE_PACKAGE, CookieValue, CookieValues, FactoryOverrides, FunctionAnnotation, HTTP_PACKAGE,
    HttpMethod, HttpMethodAnnotation, KtorGenAnnotation, KtorGenFunctionAnnotation,
    ParameterAnnotation, is_vocabulary,
};
use crate::symbols::{AnnotationUse, AnnotationValue};

const VOCABULARY_SIMPLE_NAMES: &[&str] = &[
    "GET",
    "POST",
    "PUT",
    "DELETE",
    "PATCH",
    "HEAD",
    "OPTIONS",
    "HTTP",
    "Header",
    "Headers",
    "HeaderParam",
    "HeaderMap",
    "Cookie",
    "Fragment",
    "FormUrlEncoded",
    "Multipart",
    "Body",
    "Url",
    "Path",
    "Query",
    "QueryName",
    "QueryMap",
    "Field",
    "FieldMap",
    "Part",
    "PartMap",
    "Tag",
    "PairString",
    "Generated",
    "KtorGen",
    "KtorGenFunction",
    "KtorGenFunctionKmp",
    "KtorGenIgnore",
    "KtorGenTopLevelFactory",
    "KtorGenCompanionExtFactory",
    "KtorGenHttpClientExtFactory",
];

const FIXED_METHODS: &[(&str, HttpMethod)] = &[
    ("GET", HttpMethod::Get),
    ("POST", HttpMethod::Post),
    ("PUT", HttpMethod::Put),
    ("DELETE", HttpMethod::Delete),
    ("PATCH", HttpMethod::Patch),
    ("HEAD", HttpMethod::Head),
    ("OPTIONS", HttpMethod::Options),
];

pub(crate) fn is_vocabulary_simple_name(name: &str) -> bool {
    VOCABULARY_SIMPLE_NAMES.contains(&name)
}

/// Name-based argument lookup over one annotation.
#[derive(Debug, Clone, Copy)]
struct Args<'a>(&'a AnnotationUse);

impl<'a> Args<'a> {
    fn get(&self, name: &str) -> Option<&'a AnnotationValue> {
        self.0.arguments.get(name)
    }

    fn string(&self, name: &str, default: &str) -> String {
        match self.get(name) {
            Some(AnnotationValue::String(value)) => value.clone(),
            Some(AnnotationValue::EnumEntry { entry, .. }) => entry.clone(),
            _ => default.to_string(),
        }
    }

    /// First present argument among `names`.
    fn string_of(&self, names: &[&str], default: &str) -> String {
        names
            .iter()
            .find(|name| self.get(name).is_some())
            .map_or_else(|| default.to_string(), |name| self.string(name, default))
    }

    fn bool(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(AnnotationValue::Bool(value)) => *value,
            _ => default,
        }
    }

    fn int(&self, name: &str, default: i64) -> i64 {
        match self.get(name) {
            Some(AnnotationValue::Int(value)) => *value,
            _ => default,
        }
    }

    fn strings(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(AnnotationValue::String(value)) => vec![value.clone()],
            Some(AnnotationValue::Array(values)) => values
                .iter()
                .filter_map(|value| match value {
                    AnnotationValue::String(text) => Some(text.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Class references, qualified names. Plain strings are accepted as names too.
    fn class_refs(&self, name: &str) -> Vec<String> {
        let single = |value: &AnnotationValue| match value {
            AnnotationValue::ClassRef { class } => Some(class.clone()),
            AnnotationValue::String(text) => Some(text.clone()),
            _ => None,
        };
        match self.get(name) {
            Some(AnnotationValue::Array(values)) => values.iter().filter_map(single).collect(),
            Some(other) => single(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    fn nested(&self, name: &str) -> Vec<&'a AnnotationUse> {
        match self.get(name) {
            Some(AnnotationValue::Annotation { annotation }) => vec![annotation],
            Some(AnnotationValue::Array(values)) => values
                .iter()
                .filter_map(|value| match value {
                    AnnotationValue::Annotation { annotation } => Some(annotation),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn read_cookie(args: Args<'_>) -> CookieValues {
    let value = args.string("value", KTORGEN_DEFAULT_NAME);
    let expires = args.int("expiresTimestamp", -1);
    CookieValues {
        name: args.string("name", ""),
        value: if is_unset(&value) {
            CookieValue::FromParameter
        } else {
            CookieValue::Literal(value)
        },
        max_age: args.int("maxAge", 0),
        expires_timestamp: (expires >= 0).then_some(expires),
        domain: args.string("domain", ""),
        path: args.string("path", ""),
        secure: args.bool("secure", false),
        http_only: args.bool("httpOnly", false),
        extensions: args
            .nested("extensions")
            .into_iter()
            .map(|pair| {
                let pair = Args(pair);
                (pair.string("first", ""), pair.string("second", ""))
            })
            .collect(),
    }
}

/// Everything the function-level vocabulary says about one function.
#[derive(Debug, Clone, Default)]
pub struct FunctionAnnotations {
    /// Every method annotation found, more than one is reported by the extractor.
    pub methods: Vec<HttpMethodAnnotation>,
    /// Header, cookie, fragment and body markers.
    pub metadata: Vec<FunctionAnnotation>,
    /// `@KtorGenFunction`, with `@KtorGenIgnore` folded in.
    pub options: KtorGenFunctionAnnotation,
    /// Non-vocabulary annotations, copied verbatim when propagation is on.
    pub passthrough: Vec<AnnotationUse>,
}

/// Sorts the annotations of one function by vocabulary.
pub fn read_function_annotations(uses: &[AnnotationUse]) -> FunctionAnnotations {
    let mut out = FunctionAnnotations::default();
    for annotation in uses {
        let args = Args(annotation);
        if let Some((_, method)) = FIXED_METHODS
            .iter()
            .find(|(name, _)| annotation.is(HTTP_PACKAGE, name))
        {
            out.methods.push(HttpMethodAnnotation {
                method: method.clone(),
                path: args.string_of(&["value", "path"], ""),
                has_body: false,
            });
        } else if annotation.is(HTTP_PACKAGE, "HTTP") {
            out.methods.push(HttpMethodAnnotation {
                method: HttpMethod::from_verb(&args.string("method", "")),
                path: args.string_of(&["path", "value"], ""),
                has_body: args.bool("hasBody", false),
            });
        } else if annotation.is(HTTP_PACKAGE, "Header") {
            out.metadata.push(FunctionAnnotation::Header {
                name: args.string("name", ""),
                value: args.string("value", ""),
            });
        } else if annotation.is(HTTP_PACKAGE, "Headers") {
            out.metadata.push(FunctionAnnotation::Headers {
                values: args.strings("value"),
            });
        } else if annotation.is(HTTP_PACKAGE, "Cookie") {
            out.metadata.push(FunctionAnnotation::Cookie {
                cookie: read_cookie(args),
            });
        } else if annotation.is(HTTP_PACKAGE, "Fragment") {
            out.metadata.push(FunctionAnnotation::Fragment {
                value: args.string("value", ""),
                encoded: args.bool("encoded", false),
            });
        } else if annotation.is(HTTP_PACKAGE, "FormUrlEncoded") {
            out.metadata.push(FunctionAnnotation::FormUrlEncoded);
        } else if annotation.is(HTTP_PACKAGE, "Multipart") {
            out.metadata.push(FunctionAnnotation::Multipart);
        } else if annotation.is(CORE_PACKAGE, "KtorGenFunction") {
            out.options = read_function_options(annotation);
        } else if annotation.is(CORE_PACKAGE, "KtorGenIgnore") {
            out.options.generate = false;
        } else if !is_vocabulary(&annotation.qualified_name) {
            out.passthrough.push(annotation.clone());
        }
    }
    out
}

/// Reads `@KtorGenFunction` arguments, defaults for absent ones.
pub fn read_function_options(annotation: &AnnotationUse) -> KtorGenFunctionAnnotation {
    let args = Args(annotation);
    KtorGenFunctionAnnotation {
        generate: args.bool("generate", true),
        propagate_annotations: args.bool("propagateAnnotations", true),
        annotations: args.class_refs("annotations"),
        opt_in_annotations: args.class_refs("optInAnnotations"),
        custom_header: args.string("customHeader", ""),
    }
}

/// Role annotations (defaults substituted from `parameter_name`) and passthrough annotations.
pub fn read_parameter_annotations(
    uses: &[AnnotationUse],
    parameter_name: &str,
) -> (Vec<ParameterAnnotation>, Vec<AnnotationUse>) {
    let mut roles = Vec::new();
    let mut passthrough = Vec::new();
    for annotation in uses {
        let args = Args(annotation);
        let named = |key: &str| name_or(&args.string(key, KTORGEN_DEFAULT_NAME), parameter_name);
        let encoded = || args.bool("encoded", false);
        let role = if annotation.is(HTTP_PACKAGE, "Body") {
            Some(ParameterAnnotation::Body)
        } else if annotation.is(HTTP_PACKAGE, "Url") {
            Some(ParameterAnnotation::Url)
        } else if annotation.is(HTTP_PACKAGE, "Path") {
            Some(ParameterAnnotation::Path {
                value: named("value"),
                encoded: encoded(),
            })
        } else if annotation.is(HTTP_PACKAGE, "Query") {
            Some(ParameterAnnotation::Query {
                value: named("value"),
                encoded: encoded(),
            })
        } else if annotation.is(HTTP_PACKAGE, "QueryName") {
            Some(ParameterAnnotation::QueryName { encoded: encoded() })
        } else if annotation.is(HTTP_PACKAGE, "QueryMap") {
            Some(ParameterAnnotation::QueryMap { encoded: encoded() })
        } else if annotation.is(HTTP_PACKAGE, "Field") {
            Some(ParameterAnnotation::Field {
                value: named("value"),
                encoded: encoded(),
            })
        } else if annotation.is(HTTP_PACKAGE, "FieldMap") {
            Some(ParameterAnnotation::FieldMap { encoded: encoded() })
        } else if annotation.is(HTTP_PACKAGE, "HeaderParam") || annotation.is(HTTP_PACKAGE, "Header") {
            let name = args.string_of(&["name", "value"], "");
            Some(ParameterAnnotation::Header {
                name: if is_unset(&name) { String::new() } else { name },
            })
        } else if annotation.is(HTTP_PACKAGE, "HeaderMap") {
            Some(ParameterAnnotation::HeaderMap)
        } else if annotation.is(HTTP_PACKAGE, "Part") {
            Some(ParameterAnnotation::Part {
                value: named("value"),
                encoding: args.string("encoding", "binary"),
            })
        } else if annotation.is(HTTP_PACKAGE, "PartMap") {
            Some(ParameterAnnotation::PartMap {
                encoding: args.string("encoding", "binary"),
            })
        } else if annotation.is(HTTP_PACKAGE, "Tag") {
            Some(ParameterAnnotation::Tag {
                value: named("value"),
            })
        } else if annotation.is(HTTP_PACKAGE, "Fragment") {
            Some(ParameterAnnotation::Fragment { encoded: encoded() })
        } else if annotation.is(HTTP_PACKAGE, "Cookie") {
            Some(ParameterAnnotation::Cookie {
                cookie: read_cookie(args),
            })
        } else {
            None
        };

        match role {
            Some(role) => roles.push(role),
            None if !is_vocabulary(&annotation.qualified_name) => passthrough.push(annotation.clone()),
            None => {}
        }
    }
    (roles, passthrough)
}

/// `@KtorGen` (first found) and the factory name overrides among `uses`.
pub fn read_class_options(uses: &[AnnotationUse]) -> (Option<KtorGenAnnotation>, FactoryOverrides) {
    let mut ktorgen = None;
    let mut factories = FactoryOverrides::default();
    for annotation in uses {
        let args = Args(annotation);
        if annotation.is(CORE_PACKAGE, "KtorGen") && ktorgen.is_none() {
            let defaults = KtorGenAnnotation::default();
            let visibility = args.string("visibilityModifier", &defaults.visibility_modifier);
            ktorgen = Some(KtorGenAnnotation {
                name: args.string("name", &defaults.name),
                base_path: args.string("basePath", ""),
                generate: args.bool("generate", defaults.generate),
                generate_top_level_function: args
                    .bool("generateTopLevelFunction", defaults.generate_top_level_function),
                generate_companion_ext_function: args.bool(
                    "generateCompanionExtFunction",
                    defaults.generate_companion_ext_function,
                ),
                generate_http_client_extension: args.bool(
                    "generateHttpClientExtension",
                    defaults.generate_http_client_extension,
                ),
                propagate_annotations: args
                    .bool("propagateAnnotations", defaults.propagate_annotations),
                annotations: args.class_refs("annotations"),
                opt_in_annotations: args.class_refs("optInAnnotations"),
                function_annotations: args.class_refs("functionAnnotations"),
                class_visibility_modifier: args.string("classVisibilityModifier", &visibility),
                constructor_visibility_modifier: args
                    .string("constructorVisibilityModifier", &visibility),
                function_visibility_modifier: args.string("functionVisibilityModifier", &visibility),
                visibility_modifier: visibility,
                custom_file_header: args.string("customFileHeader", ""),
                custom_class_header: args.string("customClassHeader", ""),
            });
        } else if annotation.is(CORE_PACKAGE, "KtorGenTopLevelFactory") {
            factories.top_level = Some(args.string("name", KTORGEN_DEFAULT_NAME));
        } else if annotation.is(CORE_PACKAGE, "KtorGenCompanionExtFactory") {
            factories.companion = Some(args.string("name", "create"));
        } else if annotation.is(CORE_PACKAGE, "KtorGenHttpClientExtFactory") {
            factories.http_client = Some(args.string("name", KTORGEN_DEFAULT_NAME));
        }
    }
    (ktorgen, factories)
}

/// Custom header of `@KtorGenFunctionKmp`, `None` when the annotation is missing.
pub fn read_kmp_function(uses: &[AnnotationUse]) -> Option<String> {
    uses.iter()
        .find(|annotation| annotation.is(CORE_PACKAGE, "KtorGenFunctionKmp"))
        .map(|annotation| Args(annotation).string("customHeader", ""))
}
