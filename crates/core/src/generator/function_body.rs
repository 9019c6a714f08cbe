//! Override bodies, one shape per `ReturnKind`.
//!
//! | return kind          | body                                                       |
//! |----------------------|------------------------------------------------------------|
//! | `Unit`               | `client.request { .. }`                                    |
//! | `T`                  | `return client.request { .. }.body<T>()`                   |
//! | `Result<T>`          | `return try { .. Result.success } catch { Result.failure }` |
//! | `Flow<T>`            | `return flow { .. emit }`                                  |
//! | `Flow<Result<T>>`    | `flow` around the `try`, `emit` outside of it               |
//! | `HttpRequestBuilder` | `return HttpRequestBuilder().apply { .. }`                 |
//! | `HttpStatement`      | `return HttpStatement(HttpRequestBuilder().apply { .. }, client)` |

use super::ktor;
use super::request::RequestWriter;
use crate::error::FatalError;
use crate::kotlin::{ImportTable, KtBlock, KtStmt};
use crate::model::types::{HTTP_REQUEST_BUILDER, HTTP_STATEMENT};
use crate::model::{FunctionModel, ReturnKind};
use crate::symbols::TypeRef;

const FLOW_RESULT: &str = "_result";
const EMIT_IT: &str = ".let { emit(it) }";
const SUCCESS_IT: &str = ".let { Result.success(it) }";

/// Statements of the override of `function`, calling `client`.
pub fn function_body(
    function: &FunctionModel,
    client: &str,
    imports: &mut ImportTable,
) -> Result<Vec<KtStmt>, FatalError> {
    let populated = RequestWriter::new(function, imports).write()?;
    let mut writer = BodyWriter {
        function,
        client,
        imports,
        populated,
    };
    writer.body()
}

struct BodyWriter<'a> {
    function: &'a FunctionModel,
    client: &'a str,
    imports: &'a mut ImportTable,
    /// Request population, shared by whichever block shape the return kind needs.
    populated: Vec<KtStmt>,
}

impl BodyWriter<'_> {
    fn body(&mut self) -> Result<Vec<KtStmt>, FatalError> {
        let function = self.function;
        match &function.return_kind {
            ReturnKind::Unit => Ok(vec![self.request("", "").into()]),
            ReturnKind::Plain(type_ref) => {
                let close = self.body_call(type_ref);
                Ok(vec![self.request("return ", &close).into()])
            }
            ReturnKind::Builder => Ok(vec![self.builder("return ", "").into()]),
            ReturnKind::Statement => Ok(vec![self.statement("return ", "").into()]),
            ReturnKind::Result(inner) => {
                let guarded = self.success(inner)?;
                let ensure_active = function.is_suspend && !inner_is_request_description(inner);
                Ok(vec![self.try_catch("return try", guarded, ensure_active).into()])
            }
            ReturnKind::Flow(inner) => self.flow(inner),
            ReturnKind::Unsupported => Err(self.unsupported()),
        }
    }

    fn flow(&mut self, inner: &ReturnKind) -> Result<Vec<KtStmt>, FatalError> {
        let body = match inner {
            ReturnKind::Unit => vec![self.request("", "").into(), emit("Unit")],
            ReturnKind::Plain(type_ref) => {
                let close = format!("{}{EMIT_IT}", self.body_call(type_ref));
                vec![self.request("", &close).into()]
            }
            ReturnKind::Result(result) => {
                let guarded = self.success(result)?;
                vec![
                    self.try_catch(&format!("val {FLOW_RESULT} = try"), guarded, true).into(),
                    emit(FLOW_RESULT),
                ]
            }
            _ => return Err(self.unsupported()),
        };
        let flow = self.imports.member(ktor::FLOW_BUILDER);
        Ok(vec![KtBlock::new(format!("return {flow}"), body).into()])
    }

    /// Statements of the `try` block producing `Result.success(..)`.
    fn success(&mut self, inner: &ReturnKind) -> Result<Vec<KtStmt>, FatalError> {
        Ok(match inner {
            ReturnKind::Unit => vec![self.request("", "").into(), KtStmt::Expr("Result.success(Unit)".into())],
            ReturnKind::Plain(type_ref) => {
                let close = format!("{}{SUCCESS_IT}", self.body_call(type_ref));
                vec![self.request("", &close).into()]
            }
            ReturnKind::Builder => vec![self.builder("", SUCCESS_IT).into()],
            ReturnKind::Statement => vec![self.statement("", SUCCESS_IT).into()],
            _ => return Err(self.unsupported()),
        })
    }

    fn try_catch(&mut self, open: &str, guarded: Vec<KtStmt>, ensure_active: bool) -> KtBlock {
        let mut recovery = Vec::new();
        if ensure_active {
            let context = self.imports.member(ktor::CURRENT_COROUTINE_CONTEXT);
            let ensure_active = self.imports.member(ktor::ENSURE_ACTIVE);
            recovery.push(KtStmt::Expr(format!("{context}().{ensure_active}()")));
        }
        recovery.push(KtStmt::Expr("Result.failure(e)".into()));
        KtBlock::new(open, guarded).branch("catch (e: Exception)", recovery)
    }

    // =========================================================================
    // Request blocks
    // =========================================================================

    fn populate(&self) -> Vec<KtStmt> {
        self.populated.clone()
    }

    /// `client.request { .. }` executing the request.
    fn request(&mut self, prefix: &str, close: &str) -> KtBlock {
        let request = self.imports.member(ktor::REQUEST);
        let body = self.populate();
        KtBlock::new(format!("{prefix}{}.{request}", self.client), body).close(close)
    }

    /// `HttpRequestBuilder().apply { .. }` describing the request.
    fn builder(&mut self, prefix: &str, close: &str) -> KtBlock {
        let builder = self.imports.name(HTTP_REQUEST_BUILDER);
        let body = self.populate();
        KtBlock::new(format!("{prefix}{builder}().apply"), body).close(close)
    }

    fn statement(&mut self, prefix: &str, close: &str) -> KtBlock {
        let statement = self.imports.name(HTTP_STATEMENT);
        let builder = self.imports.name(HTTP_REQUEST_BUILDER);
        let body = self.populate();
        KtBlock::new(format!("{prefix}{statement}({builder}().apply"), body)
            .close(format!(", {}){close}", self.client))
    }

    fn body_call(&mut self, type_ref: &TypeRef) -> String {
        let body = self.imports.member(ktor::BODY);
        let type_name = self.imports.type_name(type_ref);
        format!(".{body}<{type_name}>()")
    }

    fn unsupported(&self) -> FatalError {
        FatalError::implementation(format!(
            "no body shape for return type {} of function '{}'",
            self.function.return_type, self.function.name
        ))
    }
}

fn inner_is_request_description(inner: &ReturnKind) -> bool {
    matches!(inner, ReturnKind::Builder | ReturnKind::Statement)
}

fn emit(value: &str) -> KtStmt {
    KtStmt::Expr(format!("emit({value})"))
}
