//! User-facing diagnostic texts.
//!
//! Messages that end with a space or a colon are completed with the offending value.

// Discovery and extraction
/// `@KtorGen` on a class, object or function.
pub const KTOR_GEN_TYPE_NOT_ALLOWED: &str =
    "Only interfaces and their companion objects can be annotated with @KtorGen.";
/// Interface without a containing file.
pub const INTERFACE_NOT_HAVE_FILE: &str =
    "Interface is not declared in a source file, its implementation cannot be generated.";
/// `expect` or `external` interface.
pub const EXPECT_OR_EXTERNAL_NOT_SUPPORTED: &str =
    "expect or external declarations are not supported. Declare the interface in common code and use @KtorGenFunctionKmp for platform factories. Found on ";
/// Two HTTP method annotations on one function.
pub const ONLY_ONE_HTTP_METHOD_IS_ALLOWED: &str = "Only one HTTP method is allowed.";
/// Function without a resolvable return type.
pub const FUNCTION_NOT_RETURN_TYPE: &str = "Return type is not defined.";
/// Function-level `@Cookie` without `value`.
pub const COOKIE_ON_FUNCTION_WITHOUT_VALUE: &str = "@Cookie on a function needs a value.";
/// Declarations still unresolved after the last deferred round.
pub const UNRESOLVED_SYMBOLS: &str = "Symbols could not be resolved: ";

// Class level
/// Generated class visibility outside public, internal, private.
pub const ONLY_PUBLIC_INTERNAL_CLASS: &str =
    "Generated class visibility must be public, internal or private. ";
/// Private or protected constructor.
pub const PRIVATE_CONSTRUCTOR: &str = "Constructor visibility must not be private or protected. ";
/// Private or protected factory.
pub const PRIVATE_FUNCTION: &str = "Factory function visibility must not be private or protected. ";
/// Visibility string that is not a Kotlin keyword.
pub const INVALID_VISIBILITY_MODIFIER: &str = "Unknown visibility modifier. ";
/// Private class with every factory disabled.
pub const PRIVATE_CLASS_NO_ACCESS: &str =
    "A private generated class needs at least one factory function, otherwise it cannot be used.";
/// Private interface.
pub const PRIVATE_INTERFACE_CANT_GENERATE: &str =
    "A private interface cannot be implemented by a generated class. ";
/// Companion factory without a companion.
pub const MISSING_COMPANION_TO_GENERATE: &str =
    "Companion factory requested but the interface declares no companion object.";
/// `@KtorGen` on both the interface and its companion.
pub const TWO_KTORGEN_ANNOTATIONS: &str =
    "@KtorGen is present on the interface and on its companion object, keep only one.";
/// Abstract function excluded with `generate = false`.
pub const ABSTRACT_FUNCTION_IGNORED: &str =
    "Abstract function is excluded from generation, the generated class would not compile. Add a default implementation or generate it.";
/// `Any` as body or return type.
pub const ANY_TYPE_INVALID: &str = "Any is not allowed as a request or response type, use a concrete type.";
/// Neither an HTTP method nor a builder parameter.
pub const NO_HTTP_ANNOTATION: &str =
    "No HTTP method annotation and no HttpRequestBuilder parameter to define the request.";
/// Parameter with no role and no builder type.
pub const PARAMETER_WITHOUT_ANNOTATION: &str = "Parameter without a KtorGen annotation.";
/// Parameter with several non-repeatable roles.
pub const PARAMETER_WITH_LOT_ANNOTATIONS: &str =
    "Parameter with more than one KtorGen annotation, only @Cookie and @HeaderParam can be repeated.";
/// Any vararg parameter.
pub const VARARG_PARAMETER_EXPERIMENTAL: &str =
    "vararg parameters are experimental, check the generated code.";
/// Two `HttpRequestBuilder` parameters.
pub const ONLY_ONE_HTTP_REQUEST_BUILDER: &str = "Only one HttpRequestBuilder parameter is allowed.";

// Types
/// Type variable or star projection in a signature.
pub const TYPE_VARIABLE_OR_WILDCARD: &str =
    "Function or parameters types must not include a type variable or wildcard: ";
/// Non-suspend function with a suspending return shape.
pub const SUSPEND_FUNCTION_OR_FLOW: &str =
    "Function must be suspend, or return Flow, HttpRequestBuilder or HttpStatement. Current return type: ";
/// `@HEAD` returning something other than `Unit`.
pub const HTTP_METHOD_HEAD_NOT_RETURN_BODY: &str = "HEAD responses have no body, the function must return Unit.";

// URL
/// `@Url` next to a non-empty method path.
pub const URL_WITH_PATH_VALUE: &str =
    "@Url parameter cannot be combined with a path in the HTTP method annotation.";
/// Path that does not parse as a URL.
pub const URL_SYNTAX_ERROR: &str = "URL path has invalid syntax. ";
/// `//` inside a relative path.
pub const DOUBLE_SLASH_IN_URL_PATH: &str = "Double slash in URL path. ";
/// Several `@Url` parameters, or a vararg one.
pub const MULTIPLE_URL_FOUND: &str = "Only one @Url parameter is allowed and it cannot be vararg.";
/// Nullable `@Url` parameter.
pub const URL_PARAMETER_TYPE_MAY_NOT_BE_NULLABLE: &str = "@Url parameter type may not be nullable.";
/// `@Url` next to `@Path`.
pub const URL_WITH_PATH_PARAMETER: &str = "@Url cannot be combined with @Path parameters.";
/// Blank function-level `@Fragment`.
pub const URL_FRAGMENT_IN_FUNCTION_IS_BLANK: &str = "@Fragment value on the function is blank.";
/// More than one fragment source.
pub const MULTIPLE_URL_FRAGMENT: &str = "Only one fragment is allowed, on the function or on one parameter.";

// Path
/// `@Path` without placeholders to bind.
pub const PATH_CAN_ONLY_BE_USED_WITH_RELATIVE_URL_ON: &str =
    "@Path can only be used with a relative URL that has placeholders";
/// Placeholder with no `@Path`, or `@Path` with no placeholder.
pub const MISSING_PATH_VALUE: &str = "Missing or unmatched @Path value for URL ";
/// Placeholder written twice in the path.
pub const DUPLICATE_PATH_PLACEHOLDER: &str = "Duplicate placeholder in URL ";
/// Placeholder bound by several `@Path` parameters.
pub const PATH_PLACEHOLDER_BOUND_MORE_THAN_ONCE: &str =
    "More than one @Path parameter binds the same placeholder in URL ";
/// Nullable `@Path` parameter.
pub const PATH_PARAMETER_TYPE_MAY_NOT_BE_NULLABLE: &str = "@Path parameter type may not be nullable.";

// Headers
/// Header without a colon, a name or a value.
pub const INVALID_HEADER_FORMAT: &str =
    "Header needs a non-blank name and value, written as 'Name: Value'.";
/// Several Content-Type sources.
pub const ONLY_ONE_CONTENT_TYPE_IS_ALLOWED: &str =
    "Only one Content-Type header is allowed, @FormUrlEncoded and @Multipart already set it.";
/// `@Body` without a Content-Type header.
pub const CONTENT_TYPE_BODY_UNKNOWN: &str =
    "Content type for body maybe unknown. Add a Content-Type header or configure the client default.";

// Map-like parameters
/// `@HeaderMap` of the wrong type.
pub const HEADER_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING: &str =
    "@HeaderMap parameter type must be Map<String, String> or Pair<String, String>.";
/// `@QueryMap` of the wrong type.
pub const QUERY_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING: &str =
    "@QueryMap parameter type must be Map<String, *> or Pair<String, *>.";
/// `@FieldMap` of the wrong type.
pub const FIELD_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING: &str =
    "@FieldMap parameter type must be Map<String, *> or Pair<String, *>.";
/// `@PartMap` of the wrong type.
pub const PART_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING: &str =
    "@PartMap parameter type must be Map<String, *> or Pair<String, *>.";

// Body
/// `@Body` on a method without a body, prefixed by the method.
pub const BODY_USAGE_INVALID_HTTP_METHOD: &str =
    " method must not include body. See https://datatracker.ietf.org/doc/html/rfc7231#section-4.3.1";
/// Mixed body styles.
pub const CONFLICT_BODY_TYPE: &str =
    "Conflicting body type, use only one of @Body, @FormUrlEncoded or @Multipart.";
/// Several `@Body` parameters, or a vararg one.
pub const INVALID_BODY_PARAMETER: &str = "Only one @Body parameter is allowed and it cannot be vararg.";
/// Fields without `@FormUrlEncoded`.
pub const FORM_ENCODED_ANNOTATION_MISSING_FOUND_FIELD: &str =
    "@Field or @FieldMap found without @FormUrlEncoded, the function is treated as form url encoded.";
/// `@FormUrlEncoded` without fields.
pub const FORM_ENCODED_MUST_CONTAIN_AT_LEAST_ONE_FIELD: &str =
    "@FormUrlEncoded needs at least one @Field or @FieldMap parameter.";
/// `@FormUrlEncoded` on a method without a body.
pub const FORM_ENCODED_ANNOTATION_MISMATCH_HTTP_METHOD: &str =
    "FormUrlEncoded can only be specified on HTTP methods with request body (e.g., @POST).";
/// Parts without `@Multipart`.
pub const MULTIPART_ANNOTATION_MISSING_FOUND_PART: &str =
    "@Part or @PartMap found without @Multipart, the function is treated as multipart.";
/// `@Multipart` without parts.
pub const MULTIPART_MUST_CONTAIN_AT_LEAST_ONE_PART: &str =
    "@Multipart needs at least one @Part or @PartMap parameter.";
/// `@Multipart` on a method without a body.
pub const MULTIPART_CAN_ONLY_BE_SPECIFIED_ON_HTTP_METHODS: &str =
    "Multipart can only be specified on HTTP methods with request body (e.g., @POST).";

// Cookies
/// Vararg parameter with several `@Cookie` annotations.
pub const VARARG_PARAMETER_WITH_LOT_ANNOTATIONS: &str =
    "vararg parameter with several @Cookie annotations can be invalid, use a Map or ignore if sure.";

// Multiplatform
/// `@KtorGenFunctionKmp` on a non-`expect` function.
pub const EXPECT_FUNCTION_NOT_EXPECT: &str =
    "A function annotated with @KtorGenFunctionKmp must be 'expect' in common source set";
/// `@KtorGenFunctionKmp` while experimental mode is off.
pub const EXPECT_FUNCTION_NEEDS_EXPERIMENTAL: &str =
    "@KtorGenFunctionKmp is experimental, enable it with 'ktorgen_experimental=true'. Skipping ";
/// Expect parameter count differs from the constructor.
pub const EXPECT_FUNCTION_SIZE_MISMATCH: &str =
    "Expect function parameters do not match the generated constructor. ";
/// Expect parameter type differs from the constructor.
pub const EXPECT_FUNCTION_TYPE_MISMATCH: &str =
    "Expect function parameter type does not match the generated constructor. ";

/// Suffix appended to function-scoped messages.
pub fn declaration(signature: &str) -> String {
    format!("\nDeclaration: {signature}")
}
