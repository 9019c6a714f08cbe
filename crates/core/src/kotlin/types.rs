//! Kotlin IR types for code generation.
//!
//! Only what the generator produces:
//! - KtStmt / KtBlock: statements and brace blocks of function bodies
//! - KtFunction / KtParam: overrides, factories and `actual` functions
//! - KtClass: the implementation class with its primary constructor
//! - KtFile: one output file
//!
//! Type and member names are stored already rendered, see `ImportTable`.

/// Statement inside a function body or a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KtStmt {
    /// `val name = init`
    Val {
        /// Local name.
        name: String,
        /// Rendered initializer.
        init: String,
    },
    /// Expression statement: `this.method = HttpMethod.Get`
    Expr(String),
    /// `return` with an optional value
    Return(Option<String>),
    /// Brace block: `p?.let {` ... `}`
    Block(KtBlock),
    /// Pre-rendered code, indented line by line
    Raw(String),
}

impl From<KtBlock> for KtStmt {
    fn from(block: KtBlock) -> Self {
        Self::Block(block)
    }
}

/// `open {` body `}close`, with optional `} label {` continuations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KtBlock {
    /// Text before the opening brace, may be empty.
    pub open: String,
    /// Lambda parameters written after the brace: `{ entry ->`.
    pub parameters: Option<String>,
    /// Statements inside the braces.
    pub body: Vec<KtStmt>,
    /// `catch (e: Exception)` style continuations.
    pub branches: Vec<(String, Vec<KtStmt>)>,
    /// Text right after the closing brace: `.body<String>()`.
    pub close: String,
}

impl KtBlock {
    /// Plain block: `open {` body `}`.
    pub fn new(open: impl Into<String>, body: Vec<KtStmt>) -> Self {
        Self {
            open: open.into(),
            body,
            ..Self::default()
        }
    }

    /// Lambda block with named parameters.
    pub fn lambda(open: impl Into<String>, parameters: impl Into<String>, body: Vec<KtStmt>) -> Self {
        Self {
            open: open.into(),
            parameters: Some(parameters.into()),
            body,
            ..Self::default()
        }
    }

    /// Appends a `} label {` continuation.
    pub fn branch(mut self, label: impl Into<String>, body: Vec<KtStmt>) -> Self {
        self.branches.push((label.into(), body));
        self
    }

    /// Text after the closing brace.
    pub fn close(mut self, text: impl Into<String>) -> Self {
        self.close = text.into();
        self
    }
}

/// Function or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KtParam {
    /// Rendered annotations without the trailing space: `@Suppress("x")`.
    pub annotations: Vec<String>,
    /// `private val` or `override var`, turning a constructor parameter into a property.
    pub property: Option<String>,
    /// Declared `vararg`.
    pub vararg: bool,
    /// Parameter name.
    pub name: String,
    /// Rendered type.
    pub type_name: String,
}

impl KtParam {
    /// Plain parameter.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Turns the parameter into a constructor property.
    pub fn property(mut self, declaration: impl Into<String>) -> Self {
        self.property = Some(declaration.into());
        self
    }
}

/// Member or top-level function with a block body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KtFunction {
    /// KDoc text, one entry per line.
    pub doc: Option<String>,
    /// Rendered annotations.
    pub annotations: Vec<String>,
    /// Visibility first, then `override`, `actual`, `suspend`.
    pub modifiers: Vec<String>,
    /// Extension receiver: `HttpClient`, `TestService.Companion`.
    pub receiver: Option<String>,
    /// Function name.
    pub name: String,
    /// Parameters in order.
    pub params: Vec<KtParam>,
    /// Rendered return type, omitted for `Unit`.
    pub return_type: Option<String>,
    /// Body statements.
    pub body: Vec<KtStmt>,
}

/// Class with a primary constructor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KtClass {
    /// KDoc text.
    pub doc: Option<String>,
    /// Rendered annotations.
    pub annotations: Vec<String>,
    /// Visibility and `class` modifiers.
    pub modifiers: Vec<String>,
    /// Class name.
    pub name: String,
    /// Primary constructor modifiers.
    pub constructor_modifiers: Vec<String>,
    /// Primary constructor parameters.
    pub constructor: Vec<KtParam>,
    /// Rendered supertypes, delegation included: `Closeable by closeable`.
    pub supertypes: Vec<String>,
    /// Member functions.
    pub functions: Vec<KtFunction>,
}

/// One `.kt` file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KtFile {
    /// `@file:` annotations, rendered without the prefix: `Suppress("unused")`.
    pub file_annotations: Vec<String>,
    /// Leading `//` comment.
    pub comment: Option<String>,
    /// Package directive.
    pub package: String,
    /// Qualified imports, already sorted and deduplicated.
    pub imports: Vec<String>,
    /// Top-level classes.
    pub classes: Vec<KtClass>,
    /// Top-level functions.
    pub functions: Vec<KtFunction>,
}
