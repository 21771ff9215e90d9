//! Trace table lexer: turns a captured expression string into tokens.
//!
//! Expressions go through [`canonicalize`] first, which rewrites the
//! pseudocode spellings (`^`, `=`, `TRUE`, `AND`, ...) into the operator
//! and keyword forms the tokenizer understands.

pub mod canonical;
pub mod lexer;
pub mod token;

pub use canonical::canonicalize;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};
