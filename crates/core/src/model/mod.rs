//! Intermediate representation built by the extractor.
//!
//! One `InterfaceModel` per source interface, owning its functions and their
//! parameters. Models are read-only once built: validators report against them
//! and the generator reads them.

pub mod types;

use std::collections::BTreeSet;
use std::fmt::Write as _;

use ktorgen_common::PathTemplate;
use serde::Serialize;

pub use types::{Container, ReturnKind, TypeShape};

use crate::annotations::{
    CookieValues, FunctionAnnotation, HttpMethodAnnotation, KtorGenFunctionAnnotation,
    ParameterAnnotation, RoleKind,
};
use crate::symbols::{AnnotationUse, TypeRef, Visibility};

/// Constructor parameter holding the client when the interface declares no client property.
pub const DEFAULT_CLIENT_NAME: &str = "_httpClient";

/// One annotated interface, ready for validation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceModel {
    /// Fully qualified interface name.
    pub qualified_name: String,
    /// Interface name without the package.
    pub simple_name: String,
    /// Package of the interface and of the generated file.
    pub package_name: String,
    /// Declared visibility of the interface.
    pub visibility: Visibility,
    /// Resolved `@KtorGen` options.
    pub options: ClassOptions,
    /// Supertypes other than `Any`, delegated by the generated class.
    pub supertypes: Vec<TypeRef>,
    /// Abstract properties other than the client one, in declaration order.
    pub properties: Vec<PropertyModel>,
    /// Name of an abstract `HttpClient` property, which then becomes the client parameter.
    pub client_property: Option<String>,
    /// Functions in declaration order.
    pub functions: Vec<FunctionModel>,
    /// Companion object, if declared.
    pub companion: Option<CompanionModel>,
    /// `@KtorGen` sits on the interface itself.
    pub ktorgen_on_interface: bool,
    /// Multiplatform factories declared for this interface.
    pub expect_functions: Vec<ExpectFunction>,
    /// Imports of the source file, carried over to the generated file.
    pub imports: Vec<String>,
    /// Path of the source file, used in diagnostics.
    pub source_file: String,
}

impl InterfaceModel {
    /// Name of the constructor parameter holding the client.
    pub fn client_name(&self) -> &str {
        self.client_property.as_deref().unwrap_or(DEFAULT_CLIENT_NAME)
    }

    /// Functions the generated class overrides.
    pub fn generated_functions(&self) -> impl Iterator<Item = &FunctionModel> {
        self.functions.iter().filter(|function| function.generate)
    }

    /// Whether a companion object is declared.
    pub fn has_companion(&self) -> bool {
        self.companion.is_some()
    }

    /// `KtorGen` was found on both the interface and its companion.
    pub fn has_two_ktorgen(&self) -> bool {
        self.ktorgen_on_interface && self.companion.as_ref().is_some_and(|companion| companion.has_ktorgen)
    }
}

/// `@KtorGen` options with every default resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOptions {
    /// Name of the generated class, `_UserApiImpl` by default.
    pub generated_name: String,
    /// Prefix joined to every relative function path.
    pub base_path: String,
    /// `false` skips the interface.
    pub generate: bool,
    /// Factory name when the factory is enabled.
    pub top_level_factory: Option<String>,
    /// Companion extension factory name when enabled.
    pub companion_factory: Option<String>,
    /// `HttpClient` extension factory name when enabled.
    pub http_client_factory: Option<String>,
    /// Copy non-vocabulary annotations onto the generated class.
    pub propagate_annotations: bool,
    /// Extra annotations for the generated class.
    pub annotations: Vec<String>,
    /// Markers wrapped in `@OptIn`.
    pub opt_in_annotations: Vec<String>,
    /// Extra annotations for the factory functions.
    pub function_annotations: Vec<String>,
    /// Raw modifier strings, the class-level validator checks them.
    pub class_visibility: String,
    /// Constructor visibility keyword.
    pub constructor_visibility: String,
    /// Factory visibility keyword.
    pub function_visibility: String,
    /// Comment emitted before the package directive.
    pub custom_file_header: String,
    /// KDoc of the generated class.
    pub custom_class_header: String,
}

impl ClassOptions {
    /// At least one factory is enabled.
    pub fn has_any_factory(&self) -> bool {
        self.top_level_factory.is_some()
            || self.companion_factory.is_some()
            || self.http_client_factory.is_some()
    }
}

/// Abstract property implemented as a constructor property.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyModel {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub type_ref: TypeRef,
    /// Declared `var`.
    pub mutable: bool,
}

/// Companion object of the interface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionModel {
    /// Companion name.
    pub name: String,
    /// `@KtorGen` sits on the companion.
    pub has_ktorgen: bool,
}

/// A top-level `@KtorGenFunctionKmp` factory returning the interface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectFunction {
    /// Function name.
    pub name: String,
    /// Package of the declaration.
    pub package_name: String,
    /// Declared visibility.
    pub visibility: Visibility,
    /// Declared `expect`, otherwise a plain common function.
    pub is_expect: bool,
    /// Parameter names and types in order.
    pub parameters: Vec<(String, TypeRef)>,
    /// Declared return type.
    pub return_type: TypeRef,
    /// KDoc for the generated `actual`.
    pub custom_header: String,
    /// Annotations copied onto the `actual`.
    pub passthrough: Vec<AnnotationUse>,
    /// Path of the declaring file.
    pub source_file: Option<String>,
}

/// One interface function.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionModel {
    /// Function name.
    pub name: String,
    /// Declared return type.
    pub return_type: TypeRef,
    /// Classification of the return type.
    pub return_kind: ReturnKind,
    /// Declared `suspend`.
    pub is_suspend: bool,
    /// No default body.
    pub is_abstract: bool,
    /// Overridden by the generated class.
    pub generate: bool,
    /// Method and raw path.
    pub http_method: HttpMethodAnnotation,
    /// Effective URL template: base path joined with the method path.
    pub path: PathTemplate,
    /// Function-level metadata annotations.
    pub annotations: Vec<FunctionAnnotation>,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterModel>,
    /// `@KtorGenFunction` options.
    pub options: KtorGenFunctionAnnotation,
    /// Names of the declared type parameters.
    pub type_parameters: Vec<String>,
    /// Non-vocabulary annotations, copied to the override when propagation is on.
    pub passthrough: Vec<AnnotationUse>,
}

impl FunctionModel {
    /// Marked `@FormUrlEncoded`.
    pub fn has_form_marker(&self) -> bool {
        self.annotations
            .iter()
            .any(|annotation| matches!(annotation, FunctionAnnotation::FormUrlEncoded))
    }

    /// Marked `@Multipart`.
    pub fn has_multipart_marker(&self) -> bool {
        self.annotations
            .iter()
            .any(|annotation| matches!(annotation, FunctionAnnotation::Multipart))
    }

    /// Marked `@FormUrlEncoded`, or implied by `@Field`/`@FieldMap` parameters.
    pub fn is_form_url(&self) -> bool {
        self.has_form_marker() || self.has_role(RoleKind::Field) || self.has_role(RoleKind::FieldMap)
    }

    /// Marked `@Multipart`, or implied by `@Part`/`@PartMap` parameters.
    pub fn is_multipart(&self) -> bool {
        self.has_multipart_marker() || self.has_role(RoleKind::Part) || self.has_role(RoleKind::PartMap)
    }

    /// A parameter is annotated `@Body`.
    pub fn has_body_parameter(&self) -> bool {
        self.has_role(RoleKind::Body)
    }

    /// Any of the three body kinds is present.
    pub fn has_body(&self) -> bool {
        self.has_body_parameter() || self.is_form_url() || self.is_multipart()
    }

    /// Any parameter plays `kind`.
    pub fn has_role(&self, kind: RoleKind) -> bool {
        self.parameters.iter().any(|parameter| parameter.has_role(kind))
    }

    /// Parameters playing `kind`, in declaration order.
    pub fn parameters_with(&self, kind: RoleKind) -> impl Iterator<Item = &ParameterModel> {
        self.parameters.iter().filter(move |parameter| parameter.has_role(kind))
    }

    /// Role-less parameters customizing the builder.
    pub fn builder_parameters(&self) -> impl Iterator<Item = &ParameterModel> {
        self.parameters.iter().filter(|parameter| parameter.builder.is_some())
    }

    /// `@Header` entries and the `"Name: Value"` strings of `@Headers`, unparsed.
    pub fn raw_headers(&self) -> Vec<String> {
        let mut out = Vec::new();
        for annotation in &self.annotations {
            match annotation {
                FunctionAnnotation::Header { name, value } => out.push(format!("{name}: {value}")),
                FunctionAnnotation::Headers { values } => out.extend(values.iter().cloned()),
                _ => {}
            }
        }
        out
    }

    /// Function-level `@Cookie` annotations.
    pub fn cookies(&self) -> impl Iterator<Item = &CookieValues> {
        self.annotations.iter().filter_map(|annotation| match annotation {
            FunctionAnnotation::Cookie { cookie } => Some(cookie),
            _ => None,
        })
    }

    /// Function-level `@Fragment`: value and `encoded` flag.
    pub fn fragment(&self) -> Option<(&str, bool)> {
        self.annotations.iter().find_map(|annotation| match annotation {
            FunctionAnnotation::Fragment { value, encoded } => Some((value.as_str(), *encoded)),
            _ => None,
        })
    }

    /// One-line rendering used in diagnostics, with `highlight` wrapped in `**`.
    pub fn signature(&self, class_name: &str, highlight: Option<&str>) -> String {
        let mut out = format!("{class_name}.");
        if self.http_method.method != crate::annotations::HttpMethod::Absent {
            let _ = write!(out, "@{}(\"{}\") ", self.http_method.method, self.http_method.path);
        }
        let _ = write!(out, "{}(", self.name);
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            for role in parameter.role_kinds() {
                let _ = write!(out, "{role} ");
            }
            if parameter.is_vararg {
                out.push_str("vararg ");
            }
            if highlight == Some(parameter.name.as_str()) {
                let _ = write!(out, "**{}**", parameter.name);
            } else {
                out.push_str(&parameter.name);
            }
            let _ = write!(out, ": {}", parameter.type_ref.simple_name());
            if parameter.type_ref.nullable {
                out.push('?');
            }
        }
        let _ = write!(out, "): {}", self.return_type.simple_name());
        if self.return_type.nullable {
            out.push('?');
        }
        out
    }
}

/// How a role-less parameter customizes the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BuilderKind {
    /// `HttpRequestBuilder`, `HttpRequest` or `HttpRequestData`, copied with `takeFrom`.
    TakeFrom,
    /// `HttpRequestBuilder.() -> Unit`, invoked on the builder.
    Lambda,
}

/// One function parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterModel {
    /// Parameter name.
    pub name: String,
    /// Declared type; the element type for a vararg.
    pub type_ref: TypeRef,
    /// Declared `vararg`.
    pub is_vararg: bool,
    /// Role annotations, defaults substituted.
    pub roles: Vec<ParameterAnnotation>,
    /// Builder kind of a role-less builder parameter.
    pub builder: Option<BuilderKind>,
    /// Non-vocabulary annotations.
    pub passthrough: Vec<AnnotationUse>,
}

impl ParameterModel {
    /// Distinct roles, ordered.
    pub fn role_kinds(&self) -> BTreeSet<RoleKind> {
        self.roles.iter().map(ParameterAnnotation::kind).collect()
    }

    /// Plays `kind`.
    pub fn has_role(&self, kind: RoleKind) -> bool {
        self.roles.iter().any(|role| role.kind() == kind)
    }

    /// First annotation of `kind`.
    pub fn role(&self, kind: RoleKind) -> Option<&ParameterAnnotation> {
        self.roles.iter().find(|role| role.kind() == kind)
    }

    /// Every annotation of `kind`, cookies and headers may repeat.
    pub fn roles_of(&self, kind: RoleKind) -> impl Iterator<Item = &ParameterAnnotation> {
        self.roles.iter().filter(move |role| role.kind() == kind)
    }

    /// Declared type is nullable.
    pub fn is_nullable(&self) -> bool {
        self.type_ref.nullable
    }

    /// Container and element view of the type.
    pub fn shape(&self) -> TypeShape {
        TypeShape::of(&self.type_ref, self.is_vararg)
    }
}
