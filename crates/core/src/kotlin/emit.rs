//! Kotlin code emission via the Emit trait.
//!
//! Bodies are indented with four spaces. Every file ends with a single newline.

use super::types::{KtBlock, KtClass, KtFile, KtFunction, KtParam, KtStmt};

const INDENT: &str = "    ";

/// Parameter lists longer than this are written one parameter per line.
const MAX_INLINE_PARAMS: usize = 80;

/// Trait for emitting Kotlin code from IR nodes.
pub trait Emit {
    /// Convert the IR node to Kotlin source text.
    fn emit(&self) -> String;
}

fn push_doc(output: &mut String, doc: Option<&str>, prefix: &str) {
    let Some(doc) = doc else {
        return;
    };
    output.push_str(&format!("{prefix}/**\n"));
    for line in doc.trim_end().lines() {
        if line.trim().is_empty() {
            output.push_str(&format!("{prefix} *\n"));
        } else {
            output.push_str(&format!("{prefix} * {}\n", line.replace("*/", "*&#47;")));
        }
    }
    output.push_str(&format!("{prefix} */\n"));
}

fn push_annotations(output: &mut String, annotations: &[String], prefix: &str) {
    for annotation in annotations {
        output.push_str(&format!("{prefix}{annotation}\n"));
    }
}

fn modifiers_prefix(modifiers: &[String]) -> String {
    modifiers.iter().map(|modifier| format!("{modifier} ")).collect()
}

/// `(a: A, b: B)` on one line, or one parameter per line with a trailing comma.
fn emit_params(params: &[KtParam], prefix: &str) -> String {
    let rendered: Vec<_> = params.iter().map(Emit::emit).collect();
    let inline = rendered.join(", ");
    if inline.len() <= MAX_INLINE_PARAMS {
        return format!("({inline})");
    }
    let mut output = "(\n".to_string();
    for param in rendered {
        output.push_str(&format!("{prefix}{INDENT}{param},\n"));
    }
    output.push_str(&format!("{prefix})"));
    output
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for KtStmt {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl KtStmt {
    /// Emit with indentation level (4 spaces per level).
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = INDENT.repeat(indent);
        match self {
            Self::Val { name, init } => format!("{prefix}val {name} = {init}\n"),
            Self::Expr(expr) => format!("{prefix}{expr}\n"),
            Self::Return(value) => match value {
                Some(value) => format!("{prefix}return {value}\n"),
                None => format!("{prefix}return\n"),
            },
            Self::Block(block) => block.emit_indented(indent),
            Self::Raw(code) => code
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        "\n".to_string()
                    } else {
                        format!("{prefix}{line}\n")
                    }
                })
                .collect(),
        }
    }
}

fn emit_body(output: &mut String, body: &[KtStmt], indent: usize) {
    for stmt in body {
        output.push_str(&stmt.emit_indented(indent));
    }
}

impl KtBlock {
    /// Emits this block at the given indentation level.
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = INDENT.repeat(indent);
        let mut output = if self.open.is_empty() {
            format!("{prefix}{{")
        } else {
            format!("{prefix}{} {{", self.open)
        };
        if let Some(parameters) = &self.parameters {
            output.push_str(&format!(" {parameters} ->"));
        }
        output.push('\n');
        emit_body(&mut output, &self.body, indent + 1);
        for (label, body) in &self.branches {
            output.push_str(&format!("{prefix}}} {label} {{\n"));
            emit_body(&mut output, body, indent + 1);
        }
        output.push_str(&format!("{prefix}}}{}\n", self.close));
        output
    }
}

// =============================================================================
// Functions
// =============================================================================

impl Emit for KtParam {
    fn emit(&self) -> String {
        let mut output = String::new();
        for annotation in &self.annotations {
            output.push_str(annotation);
            output.push(' ');
        }
        if let Some(property) = &self.property {
            output.push_str(property);
            output.push(' ');
        }
        if self.vararg {
            output.push_str("vararg ");
        }
        output.push_str(&format!("{}: {}", self.name, self.type_name));
        output
    }
}

impl Emit for KtFunction {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl KtFunction {
    /// Emits this function at the given indentation level.
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = INDENT.repeat(indent);
        let mut output = String::new();
        push_doc(&mut output, self.doc.as_deref(), &prefix);
        push_annotations(&mut output, &self.annotations, &prefix);

        let receiver = self
            .receiver
            .as_ref()
            .map(|receiver| format!("{receiver}."))
            .unwrap_or_default();
        let return_type = self
            .return_type
            .as_ref()
            .map(|return_type| format!(": {return_type}"))
            .unwrap_or_default();
        output.push_str(&format!(
            "{prefix}{}fun {receiver}{}{}{return_type}",
            modifiers_prefix(&self.modifiers),
            self.name,
            emit_params(&self.params, &prefix)
        ));

        output.push_str(" {\n");
        emit_body(&mut output, &self.body, indent + 1);
        output.push_str(&format!("{prefix}}}\n"));
        output
    }
}

// =============================================================================
// Classes
// =============================================================================

impl Emit for KtClass {
    fn emit(&self) -> String {
        let mut output = String::new();
        push_doc(&mut output, self.doc.as_deref(), "");
        push_annotations(&mut output, &self.annotations, "");

        output.push_str(&format!("{}class {}", modifiers_prefix(&self.modifiers), self.name));
        if !self.constructor_modifiers.is_empty() || !self.constructor.is_empty() {
            output.push(' ');
            output.push_str(&format!(
                "{}constructor{}",
                modifiers_prefix(&self.constructor_modifiers),
                emit_params(&self.constructor, "")
            ));
        }
        if !self.supertypes.is_empty() {
            output.push_str(&format!(" : {}", self.supertypes.join(", ")));
        }

        if self.functions.is_empty() {
            output.push('\n');
            return output;
        }
        output.push_str(" {\n");
        for (index, function) in self.functions.iter().enumerate() {
            if index > 0 {
                output.push('\n');
            }
            output.push_str(&function.emit_indented(1));
        }
        output.push_str("}\n");
        output
    }
}

// =============================================================================
// Files
// =============================================================================

impl Emit for KtFile {
    fn emit(&self) -> String {
        let mut sections = Vec::new();

        if !self.file_annotations.is_empty() {
            sections.push(
                self.file_annotations
                    .iter()
                    .map(|annotation| format!("@file:{annotation}\n"))
                    .collect::<String>(),
            );
        }
        if let Some(comment) = &self.comment {
            sections.push(
                comment
                    .trim_end()
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            "//\n".to_string()
                        } else {
                            format!("// {line}\n")
                        }
                    })
                    .collect::<String>(),
            );
        }
        if !self.package.is_empty() {
            sections.push(format!("package {}\n", self.package));
        }
        if !self.imports.is_empty() {
            sections.push(
                self.imports
                    .iter()
                    .map(|import| format!("import {import}\n"))
                    .collect::<String>(),
            );
        }
        for class in &self.classes {
            sections.push(class.emit());
        }
        for function in &self.functions {
            sections.push(function.emit());
        }

        sections.join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_simple_statements() {
        let val = KtStmt::Val {
            name: "_formDataContent".into(),
            init: "Parameters.build()".into(),
        };
        assert_eq!(val.emit(), "val _formDataContent = Parameters.build()\n");
        assert_eq!(KtStmt::Return(None).emit_indented(1), "    return\n");
        assert_eq!(KtStmt::Return(Some("it".into())).emit(), "return it\n");
    }

    #[test]
    fn test_emit_raw_keeps_empty_lines() {
        let raw = KtStmt::Raw("first\n\nsecond".into());
        assert_eq!(raw.emit_indented(1), "    first\n\n    second\n");
    }

    #[test]
    fn test_emit_nested_blocks() {
        let block = KtBlock::new(
            "this.url",
            vec![KtBlock::lambda("id?.let", "value", vec![KtStmt::Expr("this.fragment = value".into())]).into()],
        );
        assert_eq!(
            KtStmt::from(block).emit(),
            "this.url {\n    id?.let { value ->\n        this.fragment = value\n    }\n}\n"
        );
    }

    #[test]
    fn test_emit_block_with_branches_and_close() {
        let block = KtBlock::new("return try", vec![KtStmt::Expr("work()".into())])
            .branch("catch (e: Exception)", vec![KtStmt::Expr("Result.failure(e)".into())])
            .close(".also { }");
        assert_eq!(
            block.emit_indented(0),
            "return try {\n    work()\n} catch (e: Exception) {\n    Result.failure(e)\n}.also { }\n"
        );
    }

    #[test]
    fn test_emit_param() {
        let mut param = KtParam::new("values", "String").property("override val");
        param.vararg = true;
        param.annotations.push("@Suppress(\"x\")".into());
        assert_eq!(param.emit(), "@Suppress(\"x\") override val vararg values: String");
    }

    #[test]
    fn test_emit_function() {
        let function = KtFunction {
            doc: Some("Generated".into()),
            annotations: vec!["@Deprecated(\"old\")".into()],
            modifiers: vec!["override".into(), "suspend".into()],
            name: "test".into(),
            params: vec![KtParam::new("id", "String")],
            return_type: Some("String".into()),
            body: vec![KtStmt::Return(Some("id".into()))],
            ..KtFunction::default()
        };
        assert_eq!(
            function.emit(),
            "/**\n * Generated\n */\n@Deprecated(\"old\")\noverride suspend fun test(id: String): String {\n    return id\n}\n"
        );
    }

    #[test]
    fn test_emit_long_params_wrap() {
        let params: Vec<_> = (0..6)
            .map(|index| KtParam::new(format!("parameterNumber{index}"), "kotlin.String"))
            .collect();
        let function = KtFunction {
            receiver: Some("HttpClient".into()),
            name: "create".into(),
            params,
            ..KtFunction::default()
        };
        let code = function.emit();
        assert!(code.starts_with("fun HttpClient.create(\n    parameterNumber0: kotlin.String,\n"), "{code}");
        assert!(code.contains("    parameterNumber5: kotlin.String,\n) {\n}\n"), "{code}");
    }

    #[test]
    fn test_emit_class() {
        let class = KtClass {
            annotations: vec!["@Generated".into()],
            modifiers: vec!["public".into()],
            name: "_TestServiceImpl".into(),
            constructor_modifiers: vec!["public".into()],
            constructor: vec![KtParam::new("_httpClient", "HttpClient").property("private val")],
            supertypes: vec!["TestService".into()],
            functions: vec![
                KtFunction {
                    name: "a".into(),
                    ..KtFunction::default()
                },
                KtFunction {
                    name: "b".into(),
                    ..KtFunction::default()
                },
            ],
            ..KtClass::default()
        };
        assert_eq!(
            class.emit(),
            "@Generated\npublic class _TestServiceImpl public constructor(private val _httpClient: HttpClient) : TestService {\n    fun a() {\n    }\n\n    fun b() {\n    }\n}\n"
        );
    }

    #[test]
    fn test_emit_file_sections() {
        let file = KtFile {
            file_annotations: vec!["Suppress(\"unused\")".into()],
            comment: Some("Generated code\n\nDo not edit".into()),
            package: "com.example".into(),
            imports: vec!["io.ktor.client.HttpClient".into()],
            ..KtFile::default()
        };
        assert_eq!(
            file.emit(),
            "@file:Suppress(\"unused\")\n\n// Generated code\n//\n// Do not edit\n\npackage com.example\n\nimport io.ktor.client.HttpClient\n"
        );
    }

    #[test]
    fn test_doc_cannot_close_comment() {
        let function = KtFunction {
            doc: Some("a */ b".into()),
            name: "f".into(),
            ..KtFunction::default()
        };
        assert!(function.emit().contains(" * a *&#47; b\n"));
    }
}
