//! Host declarations handed over by the symbol-discovery collaborator.
//!
//! The JSON shape mirrors what a Kotlin symbol processor can see: declarations with
//! their annotations (arguments already resolved), modifiers and resolved types.
//! Nothing here interprets annotations, see `annotations::reader` for that.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use ktorgen_common::{package_of, simple_name};
use serde::{Deserialize, Serialize};

use crate::error::SymbolError;

/// Everything discovered in one processing round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTable {
    /// Interface declarations annotated for generation, and their siblings.
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
    /// Top-level functions, multiplatform `expect` factories live here.
    #[serde(default)]
    pub functions: Vec<FunctionDeclaration>,
}

impl SymbolTable {
    /// Parse a table from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, SymbolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a table from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, SymbolError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Append the declarations of another table, used when a round spans several files.
    pub fn merge(&mut self, other: SymbolTable) {
        self.classes.extend(other.classes);
        self.functions.extend(other.functions);
    }
}

/// Kind of a class-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// `interface`
    #[default]
    Interface,
    /// `class`
    Class,
    /// `object`
    Object,
    /// `companion object`
    Companion,
    /// `enum class`
    Enum,
    /// `annotation class`
    Annotation,
}

/// Kotlin visibility, ordered from the most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// `private`
    Private,
    /// `protected`
    Protected,
    /// `internal`
    Internal,
    /// `public`, also the default when the host omits it.
    #[default]
    Public,
}

impl Visibility {
    /// The Kotlin keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }

    /// Case-insensitive parse of a visibility keyword.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Self::Public),
            "internal" => Some(Self::Internal),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Declaration modifier keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// `suspend`
    Suspend,
    /// `abstract`
    Abstract,
    /// `open`
    Open,
    /// `override`
    Override,
    /// `expect`
    Expect,
    /// `actual`
    Actual,
    /// `external`
    External,
    /// `sealed`
    Sealed,
    /// `fun`, as in `fun interface`
    Fun,
    /// `data`
    Data,
    /// `inline`
    Inline,
    /// `value`
    Value,
    /// `operator`
    Operator,
    /// `infix`
    Infix,
    /// Any modifier the generator does not look at.
    #[serde(other)]
    Other,
}

/// Source file of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    /// Path as reported by the host, used in diagnostics.
    pub path: String,
    /// Import directives of the file, copied when annotations are propagated.
    #[serde(default)]
    pub imports: Vec<String>,
}

/// A class-like declaration; only interfaces become candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    /// Fully qualified name, `com.example.UserApi`.
    pub qualified_name: String,
    /// Package, derived from the qualified name when absent.
    #[serde(default)]
    pub package_name: Option<String>,
    /// Declaration kind.
    #[serde(default)]
    pub kind: ClassKind,
    /// Declared visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Declared modifiers.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Annotations with resolved arguments.
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
    /// Direct supertypes.
    #[serde(default)]
    pub supertypes: Vec<TypeRef>,
    /// Member properties.
    #[serde(default)]
    pub properties: Vec<PropertyDeclaration>,
    /// Member functions.
    #[serde(default)]
    pub functions: Vec<FunctionDeclaration>,
    /// Declared companion object.
    #[serde(default)]
    pub companion: Option<CompanionDeclaration>,
    /// Containing file.
    #[serde(default)]
    pub file: Option<FileRef>,
    /// KDoc text, without the comment markers.
    #[serde(default)]
    pub doc: Option<String>,
}

impl ClassDeclaration {
    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    /// Declared package, or the qualified name minus its last segment.
    pub fn package(&self) -> &str {
        self.package_name
            .as_deref()
            .unwrap_or_else(|| package_of(&self.qualified_name))
    }

    /// Whether `modifier` is declared.
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// Companion object of an interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionDeclaration {
    /// Name of the companion, `Companion` unless declared otherwise.
    #[serde(default = "default_companion_name")]
    pub name: String,
    /// Annotations on the companion, factory overrides among them.
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
}

fn default_companion_name() -> String {
    "Companion".to_string()
}

/// Member property of an interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDeclaration {
    /// Property name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// `var` rather than `val`.
    #[serde(default)]
    pub mutable: bool,
    /// Annotations on the property.
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
}

/// A member or top-level function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    /// Simple name.
    pub name: String,
    /// Package of a top-level function.
    #[serde(default)]
    pub package_name: Option<String>,
    /// Declared visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Declared modifiers.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Annotations with resolved arguments.
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
    /// Names of the declared type parameters.
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Value parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
    /// Return type, `None` when the host could not see one.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    /// Containing file.
    #[serde(default)]
    pub file: Option<FileRef>,
    /// KDoc text, without the comment markers.
    #[serde(default)]
    pub doc: Option<String>,
}

impl FunctionDeclaration {
    /// Whether `modifier` is declared.
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Declared package, empty for the root package.
    pub fn package(&self) -> &str {
        self.package_name.as_deref().unwrap_or_default()
    }
}

/// A value parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDeclaration {
    /// Parameter name.
    pub name: String,
    /// Declared type; the element type for a vararg.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Declared with `vararg`.
    #[serde(default)]
    pub is_vararg: bool,
    /// Annotations on the parameter.
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
}

/// A resolved type at a typed position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    /// Fully qualified name, or the variable name for a type parameter.
    pub qualified_name: String,
    /// Marked nullable with `?`.
    #[serde(default)]
    pub nullable: bool,
    /// Generic arguments in order.
    #[serde(default)]
    pub arguments: Vec<TypeArgument>,
    /// False when the host could not resolve the type this round.
    #[serde(default = "resolved_by_default")]
    pub resolved: bool,
    /// The reference names a generic type variable such as `T`.
    #[serde(default)]
    pub type_parameter: bool,
    /// Signature when the type is a function type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<Box<FunctionType>>,
}

fn resolved_by_default() -> bool {
    true
}

/// Signature of a function type such as `HttpRequestBuilder.() -> Unit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionType {
    /// Receiver type, if any.
    #[serde(default)]
    pub receiver: Option<TypeRef>,
    /// Parameter types.
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// Return type.
    pub return_type: TypeRef,
    /// Declared `suspend`.
    #[serde(default)]
    pub suspend: bool,
}

/// A generic argument: `*` or a concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTypeArgument", into = "RawTypeArgument")]
pub enum TypeArgument {
    /// Star projection.
    Star,
    /// Concrete type argument.
    Type(TypeRef),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTypeArgument {
    Marker(String),
    Type(TypeRef),
}

impl TryFrom<RawTypeArgument> for TypeArgument {
    type Error = String;

    fn try_from(raw: RawTypeArgument) -> Result<Self, Self::Error> {
        match raw {
            RawTypeArgument::Marker(marker) if marker == "*" => Ok(Self::Star),
            RawTypeArgument::Marker(other) => Err(format!(
                "type argument must be \"*\" or a type object, found \"{other}\""
            )),
            RawTypeArgument::Type(type_ref) => Ok(Self::Type(type_ref)),
        }
    }
}

impl From<TypeArgument> for RawTypeArgument {
    fn from(argument: TypeArgument) -> Self {
        match argument {
            TypeArgument::Star => Self::Marker("*".to_string()),
            TypeArgument::Type(type_ref) => Self::Type(type_ref),
        }
    }
}

impl TypeRef {
    /// Non-null, resolved, without arguments.
    pub fn named(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            nullable: false,
            arguments: Vec::new(),
            resolved: true,
            type_parameter: false,
            function: None,
        }
    }

    /// Replace the arguments with concrete types.
    pub fn with_arguments(mut self, arguments: Vec<TypeRef>) -> Self {
        self.arguments = arguments.into_iter().map(TypeArgument::Type).collect();
        self
    }

    /// Same type, nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    /// Exact qualified name match, nullability ignored.
    pub fn is(&self, qualified_name: &str) -> bool {
        self.qualified_name == qualified_name
    }

    /// Concrete type argument at `index`, `None` for a star or a missing argument.
    pub fn argument(&self, index: usize) -> Option<&TypeRef> {
        match self.arguments.get(index)? {
            TypeArgument::Type(type_ref) => Some(type_ref),
            TypeArgument::Star => None,
        }
    }

    /// Qualified names of every unresolved type reachable from this one.
    pub fn collect_unresolved(&self, out: &mut Vec<String>) {
        if !self.resolved && !out.contains(&self.qualified_name) {
            out.push(self.qualified_name.clone());
        }
        for argument in &self.arguments {
            if let TypeArgument::Type(type_ref) = argument {
                type_ref.collect_unresolved(out);
            }
        }
        if let Some(function) = &self.function {
            if let Some(receiver) = &function.receiver {
                receiver.collect_unresolved(out);
            }
            for parameter in &function.parameters {
                parameter.collect_unresolved(out);
            }
            function.return_type.collect_unresolved(out);
        }
    }

    /// True when a type variable or a star projection appears anywhere in the type.
    pub fn has_type_variable_or_star(&self) -> bool {
        self.type_parameter
            || self.arguments.iter().any(|argument| match argument {
                TypeArgument::Star => true,
                TypeArgument::Type(type_ref) => type_ref.has_type_variable_or_star(),
            })
            || self.function.as_ref().is_some_and(|function| {
                function
                    .receiver
                    .as_ref()
                    .is_some_and(TypeRef::has_type_variable_or_star)
                    || function.parameters.iter().any(TypeRef::has_type_variable_or_star)
                    || function.return_type.has_type_variable_or_star()
            })
    }

    /// Structural equality that ignores resolution state.
    pub fn same_type(&self, other: &TypeRef) -> bool {
        self.to_string() == other.to_string()
    }
}

/// Kotlin-like rendering with qualified names, used in messages and signature keys.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(function) = &self.function {
            if self.nullable {
                f.write_str("(")?;
            }
            if function.suspend {
                f.write_str("suspend ")?;
            }
            if let Some(receiver) = &function.receiver {
                write!(f, "{receiver}.")?;
            }
            f.write_str("(")?;
            for (index, parameter) in function.parameters.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{parameter}")?;
            }
            write!(f, ") -> {}", function.return_type)?;
            if self.nullable {
                f.write_str(")?")?;
            }
            return Ok(());
        }

        f.write_str(&self.qualified_name)?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            for (index, argument) in self.arguments.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                match argument {
                    TypeArgument::Star => f.write_str("*")?,
                    TypeArgument::Type(type_ref) => write!(f, "{type_ref}")?,
                }
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// An annotation instance with resolved arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationUse {
    /// Fully qualified name, or the simple name when the host left it unqualified.
    pub qualified_name: String,
    /// Arguments by parameter name.
    #[serde(default)]
    pub arguments: BTreeMap<String, AnnotationValue>,
}

impl AnnotationUse {
    /// Annotation without arguments.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            arguments: BTreeMap::new(),
        }
    }

    /// Add or replace an argument.
    pub fn arg(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    /// Matches `package.simple` exactly, or `simple` when the host left the name unqualified.
    pub fn is(&self, package: &str, simple: &str) -> bool {
        if self.qualified_name.contains('.') {
            self.qualified_name.len() == package.len() + 1 + simple.len()
                && self.qualified_name.starts_with(package)
                && self.qualified_name.ends_with(simple)
                && self.qualified_name.as_bytes()[package.len()] == b'.'
        } else {
            self.qualified_name == simple
        }
    }
}

/// Resolved annotation argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// `true` / `false`
    Bool(bool),
    /// Integer constant.
    Int(i64),
    /// Floating point constant.
    Float(f64),
    /// String constant.
    String(String),
    /// Array argument.
    Array(Vec<AnnotationValue>),
    /// Class literal, `Foo::class`.
    ClassRef {
        /// Qualified name of the class.
        class: String,
    },
    /// Enum entry reference.
    EnumEntry {
        /// Qualified name of the enum class.
        #[serde(rename = "enum")]
        enum_type: String,
        /// Entry name.
        entry: String,
    },
    /// Nested annotation.
    Annotation {
        /// The nested annotation itself.
        annotation: AnnotationUse,
    },
}
