//! Shared types for the trace table interpreter.
//!
//! This crate defines the statement and expression AST, the dynamically
//! tagged [`Value`], source spans, and the error taxonomy used across the
//! lexer, parser and execution engine.

mod error;
mod span;
mod value;
pub mod ast;

pub use error::{ErrorCategory, ExprError, TraceError};
pub use span::{SourceFile, Span};
pub use value::Value;

/// Name of the reserved variable that holds the last value sent to the display.
pub const DISPLAY: &str = "Display";

/// Result type used throughout the interpreter.
pub type Result<T> = std::result::Result<T, TraceError>;
