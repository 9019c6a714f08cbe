//! Declarations to IR.
//!
//! The extractor never validates protocol rules, it only reads what the host handed
//! over. It reports three kinds of problems: unsupported declarations (`die`),
//! types the host could not resolve yet (deferred) and declarations it cannot turn
//! into a model at all (rejected, with errors already recorded).

mod class;
mod function;
mod parameter;

pub use class::{extract_interface, is_candidate};
pub use function::{effective_path, extract_function};
pub use parameter::{builder_kind, extract_parameter};

/// Outcome of extracting one declaration.
#[derive(Debug)]
pub enum Extraction<T> {
    /// Extracted and ready for validation.
    Ready(T),
    /// Qualified names the host could not resolve this round.
    Deferred(Vec<String>),
    /// Errors were recorded, there is nothing to validate or generate.
    Rejected,
    /// `KtorGen(generate = false)`.
    Skipped,
}

impl<T> Extraction<T> {
    /// Holds a value.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The value, when ready.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Deferred(_) | Self::Rejected | Self::Skipped => None,
        }
    }
}
