//! Kotlin source IR and its text emission.
//!
//! The generator builds `KtFile`s and never concatenates source text itself;
//! `Emit` turns the IR into formatted Kotlin.

mod emit;
mod imports;
mod types;

pub use emit::Emit;
pub use imports::ImportTable;
pub use types::{KtBlock, KtClass, KtFile, KtFunction, KtParam, KtStmt};
