//! Result aliases for the evaluator and engine.
//!
//! The error types themselves live in `tracetable-types` so host crates can
//! name them without depending on the engine.

pub use tracetable_types::{ErrorCategory, ExprError, TraceError};

/// Result of evaluating one expression; not yet tied to a line.
pub type ExprResult<T> = Result<T, ExprError>;

/// Result of executing a statement; errors carry their source line.
pub type EvalResult<T> = Result<T, TraceError>;
