//! The closed annotation vocabulary.
//!
//! Every recognized annotation has one variant here with strongly-typed arguments.
//! Host annotations are turned into these records by [`reader`] and nowhere else.

pub mod reader;

use std::fmt;

use serde::Serialize;

pub use reader::{
    FunctionAnnotations, read_class_options, read_function_annotations, read_function_options,
    read_kmp_function, read_parameter_annotations,
};

/// Package of the HTTP role annotations.
pub const HTTP_PACKAGE: &str = "io.github.kingg22.ktorgen.http";
/// Package of the generator option annotations.
pub const CORE_PACKAGE: &str = "io.github.kingg22.ktorgen.core";
/// Common prefix of both vocabulary packages.
pub const VOCABULARY_PREFIX: &str = "io.github.kingg22.ktorgen.";

/// HTTP verb of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HttpMethod {
    /// `@GET`
    Get,
    /// `@POST`
    Post,
    /// `@PUT`
    Put,
    /// `@DELETE`
    Delete,
    /// `@PATCH`
    Patch,
    /// `@HEAD`
    Head,
    /// `@OPTIONS`
    Options,
    /// Any other verb given through `@HTTP(method = ...)`.
    Custom(String),
    /// No method annotation, the request is fully defined by a builder parameter.
    Absent,
}

impl HttpMethod {
    /// Map a verb onto the fixed methods, anything unknown stays custom.
    pub fn from_verb(verb: &str) -> Self {
        match verb.trim().to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Upper-case verb, empty when absent.
    pub fn verb(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Custom(verb) => verb,
            Self::Absent => "",
        }
    }

    /// Name of the predefined `io.ktor.http.HttpMethod` companion constant.
    pub fn ktor_constant(&self) -> Option<&'static str> {
        match self {
            Self::Get => Some("Get"),
            Self::Post => Some("Post"),
            Self::Put => Some("Put"),
            Self::Delete => Some("Delete"),
            Self::Patch => Some("Patch"),
            Self::Head => Some("Head"),
            Self::Options => Some("Options"),
            Self::Custom(_) | Self::Absent => None,
        }
    }

    /// GET, HEAD, OPTIONS and TRACE conventionally carry no request body.
    pub fn supports_request_body(&self) -> bool {
        match self {
            Self::Get | Self::Head | Self::Options => false,
            Self::Custom(verb) => verb != "TRACE",
            Self::Post | Self::Put | Self::Delete | Self::Patch | Self::Absent => true,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            other => f.write_str(other.verb()),
        }
    }
}

/// Resolved method and path of one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpMethodAnnotation {
    /// The verb.
    pub method: HttpMethod,
    /// Path exactly as written in the annotation.
    pub path: String,
    /// `@HTTP(hasBody = true)` overrides the per-verb body convention.
    pub has_body: bool,
}

impl HttpMethodAnnotation {
    /// No method annotation at all.
    pub fn absent() -> Self {
        Self {
            method: HttpMethod::Absent,
            path: String::new(),
            has_body: false,
        }
    }

    /// Whether the request may carry a body.
    pub fn allows_body(&self) -> bool {
        self.has_body || self.method.supports_request_body()
    }
}

/// Where a cookie value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CookieValue {
    /// `value` left unset, the annotated parameter provides it.
    FromParameter,
    /// Fixed value from the annotation.
    Literal(String),
}

/// Arguments of one `@Cookie`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieValues {
    /// Cookie name.
    pub name: String,
    /// Literal value or the annotated parameter.
    pub value: CookieValue,
    /// `maxAge` in seconds, 0 when unset.
    pub max_age: i64,
    /// `None` when `expiresTimestamp` is negative.
    pub expires_timestamp: Option<i64>,
    /// Empty when unset.
    pub domain: String,
    /// Empty when unset.
    pub path: String,
    /// `secure` flag.
    pub secure: bool,
    /// `httpOnly` flag.
    pub http_only: bool,
    /// `extensions` as name and value pairs.
    pub extensions: Vec<(String, String)>,
}

/// Function-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FunctionAnnotation {
    /// `@Header(name, value)`.
    Header {
        /// Header name.
        name: String,
        /// Header value.
        value: String,
    },
    /// `@Headers("Name: Value", ...)`, kept raw so the validator can report bad entries.
    Headers {
        /// Raw entries.
        values: Vec<String>,
    },
    /// `@Cookie` with a literal value.
    Cookie {
        /// Cookie arguments.
        cookie: CookieValues,
    },
    /// `@Fragment` with a fixed value.
    Fragment {
        /// Fragment text.
        value: String,
        /// Already URL-encoded.
        encoded: bool,
    },
    /// `@FormUrlEncoded`
    FormUrlEncoded,
    /// `@Multipart`
    Multipart,
}

/// Roles a parameter can play while building the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleKind {
    /// Request body.
    Body,
    /// Full or relative URL replacing the path.
    Url,
    /// Path placeholder value.
    Path,
    /// Query parameter.
    Query,
    /// Query parameter without a value.
    QueryName,
    /// Map of query parameters.
    QueryMap,
    /// Form field.
    Field,
    /// Map of form fields.
    FieldMap,
    /// Header value.
    Header,
    /// Map of headers.
    HeaderMap,
    /// Multipart part.
    Part,
    /// Map of multipart parts.
    PartMap,
    /// Request attribute.
    Tag,
    /// URL fragment.
    Fragment,
    /// Cookie value.
    Cookie,
}

impl RoleKind {
    /// Only cookies and headers may be attached several times to one parameter.
    pub fn is_repeatable(self) -> bool {
        matches!(self, Self::Cookie | Self::Header)
    }

    /// Annotation as written in diagnostics, `@Query`.
    pub fn annotation_name(self) -> &'static str {
        match self {
            Self::Body => "@Body",
            Self::Url => "@Url",
            Self::Path => "@Path",
            Self::Query => "@Query",
            Self::QueryName => "@QueryName",
            Self::QueryMap => "@QueryMap",
            Self::Field => "@Field",
            Self::FieldMap => "@FieldMap",
            Self::Header => "@HeaderParam",
            Self::HeaderMap => "@HeaderMap",
            Self::Part => "@Part",
            Self::PartMap => "@PartMap",
            Self::Tag => "@Tag",
            Self::Fragment => "@Fragment",
            Self::Cookie => "@Cookie",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.annotation_name())
    }
}

/// Parameter-level role annotation with defaults already substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ParameterAnnotation {
    /// `@Body`
    Body,
    /// `@Url`
    Url,
    /// `@Path`
    Path {
        /// Placeholder name.
        value: String,
        /// Value is already URL-encoded.
        encoded: bool,
    },
    /// `@Query`
    Query {
        /// Parameter name.
        value: String,
        /// Value is already URL-encoded.
        encoded: bool,
    },
    /// `@QueryName`
    QueryName {
        /// Name is already URL-encoded.
        encoded: bool,
    },
    /// `@QueryMap`
    QueryMap {
        /// Entries are already URL-encoded.
        encoded: bool,
    },
    /// `@Field`
    Field {
        /// Field name.
        value: String,
        /// Value is already URL-encoded.
        encoded: bool,
    },
    /// `@FieldMap`
    FieldMap {
        /// Entries are already URL-encoded.
        encoded: bool,
    },
    /// `@HeaderParam`, or `@Header` on a parameter.
    Header {
        /// Header name, empty when missing.
        name: String,
    },
    /// `@HeaderMap`
    HeaderMap,
    /// `@Part`
    Part {
        /// Part name.
        value: String,
        /// Content transfer encoding.
        encoding: String,
    },
    /// `@PartMap`
    PartMap {
        /// Content transfer encoding.
        encoding: String,
    },
    /// `@Tag`
    Tag {
        /// Attribute key name.
        value: String,
    },
    /// `@Fragment`
    Fragment {
        /// Value is already URL-encoded.
        encoded: bool,
    },
    /// `@Cookie`
    Cookie {
        /// Cookie arguments.
        cookie: CookieValues,
    },
}

impl ParameterAnnotation {
    /// The role this annotation assigns.
    pub fn kind(&self) -> RoleKind {
        match self {
            Self::Body => RoleKind::Body,
            Self::Url => RoleKind::Url,
            Self::Path { .. } => RoleKind::Path,
            Self::Query { .. } => RoleKind::Query,
            Self::QueryName { .. } => RoleKind::QueryName,
            Self::QueryMap { .. } => RoleKind::QueryMap,
            Self::Field { .. } => RoleKind::Field,
            Self::FieldMap { .. } => RoleKind::FieldMap,
            Self::Header { .. } => RoleKind::Header,
            Self::HeaderMap => RoleKind::HeaderMap,
            Self::Part { .. } => RoleKind::Part,
            Self::PartMap { .. } => RoleKind::PartMap,
            Self::Tag { .. } => RoleKind::Tag,
            Self::Fragment { .. } => RoleKind::Fragment,
            Self::Cookie { .. } => RoleKind::Cookie,
        }
    }
}

/// `@KtorGen` on the interface or its companion. Raw strings, unset values still hold the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KtorGenAnnotation {
    /// Generated class name.
    pub name: String,
    /// Prefix of every relative path.
    pub base_path: String,
    /// `false` skips the interface.
    pub generate: bool,
    /// Emit the top-level factory function.
    pub generate_top_level_function: bool,
    /// Emit the companion extension factory.
    pub generate_companion_ext_function: bool,
    /// Emit the `HttpClient` extension factory.
    pub generate_http_client_extension: bool,
    /// Copy non-vocabulary annotations onto the generated code.
    pub propagate_annotations: bool,
    /// Extra annotations for the generated class.
    pub annotations: Vec<String>,
    /// Markers wrapped in `@OptIn` on the generated code.
    pub opt_in_annotations: Vec<String>,
    /// Extra annotations for the factory functions.
    pub function_annotations: Vec<String>,
    /// Visibility shared by every generated declaration.
    pub visibility_modifier: String,
    /// Visibility of the class.
    pub class_visibility_modifier: String,
    /// Visibility of the primary constructor.
    pub constructor_visibility_modifier: String,
    /// Visibility of the factory functions.
    pub function_visibility_modifier: String,
    /// Comment placed at the top of the file.
    pub custom_file_header: String,
    /// KDoc of the class.
    pub custom_class_header: String,
}

impl Default for KtorGenAnnotation {
    fn default() -> Self {
        let unset = ktorgen_common::KTORGEN_DEFAULT_NAME.to_string();
        Self {
            name: unset.clone(),
            base_path: String::new(),
            generate: true,
            generate_top_level_function: true,
            generate_companion_ext_function: false,
            generate_http_client_extension: false,
            propagate_annotations: true,
            annotations: Vec::new(),
            opt_in_annotations: Vec::new(),
            function_annotations: Vec::new(),
            visibility_modifier: unset.clone(),
            class_visibility_modifier: unset.clone(),
            constructor_visibility_modifier: unset.clone(),
            function_visibility_modifier: unset,
            custom_file_header: String::new(),
            custom_class_header: String::new(),
        }
    }
}

/// Factory-name overrides from `@KtorGenTopLevelFactory` and friends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryOverrides {
    /// `@KtorGenTopLevelFactory(name)`
    pub top_level: Option<String>,
    /// `@KtorGenCompanionExtFactory(name)`
    pub companion: Option<String>,
    /// `@KtorGenHttpClientExtFactory(name)`
    pub http_client: Option<String>,
}

/// `@KtorGenFunction`, or its absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KtorGenFunctionAnnotation {
    /// `false` leaves the function out; it must then have a default body.
    pub generate: bool,
    /// Copy non-vocabulary annotations onto the override.
    pub propagate_annotations: bool,
    /// Extra annotations for the override.
    pub annotations: Vec<String>,
    /// Markers wrapped in `@OptIn` on the override.
    pub opt_in_annotations: Vec<String>,
    /// KDoc of the override.
    pub custom_header: String,
}

impl Default for KtorGenFunctionAnnotation {
    fn default() -> Self {
        Self {
            generate: true,
            propagate_annotations: true,
            annotations: Vec::new(),
            opt_in_annotations: Vec::new(),
            custom_header: String::new(),
        }
    }
}

/// True for any annotation that belongs to the vocabulary packages.
pub fn is_vocabulary(qualified_name: &str) -> bool {
    qualified_name.starts_with(VOCABULARY_PREFIX)
        || (!qualified_name.contains('.') && reader::is_vocabulary_simple_name(qualified_name))
}
