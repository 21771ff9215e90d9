use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category, derived from the [`TraceError`] variant.
///
/// Lines that match no statement template are not errors at all; they are
/// classified `blank` and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Expression,
    ControlFlow,
    LoopStack,
    Limit,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression => write!(f, "expression"),
            Self::ControlFlow => write!(f, "control-flow"),
            Self::LoopStack => write!(f, "loop-stack"),
            Self::Limit => write!(f, "limit"),
        }
    }
}

/// Failure while tokenizing, parsing or evaluating one captured expression.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ExprError {
    #[error("syntax error at {span}: {message}")]
    Syntax { message: String, span: Span },

    #[error("name '{0}' is not defined")]
    UnboundVariable(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result would exceed {limit} elements")]
    TooLarge { limit: usize },

    /// The line matched a template but is missing a required part.
    #[error("malformed statement: {0}")]
    MalformedStatement(String),
}

impl ExprError {
    /// Attach the 1-based line of the statement being executed.
    pub fn at_line(self, line: u32) -> TraceError {
        TraceError::Expression { line, source: self }
    }
}

/// A fatal run error. The engine stops at the statement that raised it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum TraceError {
    #[error("line {line}: {source}")]
    Expression { line: u32, source: ExprError },

    /// Block scan ran off either end of the program.
    #[error("line {line}: no matching {expected} found")]
    UnbalancedBlock { line: u32, expected: String },

    #[error("line {line}: END FOR without an active loop")]
    EmptyLoopStack { line: u32 },

    #[error("line {line}: END FOR does not close the loop opened on line {owner}")]
    MismatchedLoopFrame { line: u32, owner: u32 },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
}

impl TraceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Expression { .. } => ErrorCategory::Expression,
            Self::UnbalancedBlock { .. } => ErrorCategory::ControlFlow,
            Self::EmptyLoopStack { .. } | Self::MismatchedLoopFrame { .. } => {
                ErrorCategory::LoopStack
            }
            Self::StepLimitExceeded { .. } => ErrorCategory::Limit,
        }
    }

    /// 1-based line of the failing statement, when there is one.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Expression { line, .. }
            | Self::UnbalancedBlock { line, .. }
            | Self::EmptyLoopStack { line }
            | Self::MismatchedLoopFrame { line, .. } => Some(*line),
            Self::StepLimitExceeded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_errors_carry_line() {
        let err = ExprError::UnboundVariable("y".into()).at_line(4);
        assert_eq!(err.to_string(), "line 4: name 'y' is not defined");
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.category(), ErrorCategory::Expression);
    }

    #[test]
    fn categories() {
        let unbalanced = TraceError::UnbalancedBlock {
            line: 2,
            expected: "end_while".into(),
        };
        assert_eq!(unbalanced.category(), ErrorCategory::ControlFlow);
        assert_eq!(
            TraceError::EmptyLoopStack { line: 1 }.category(),
            ErrorCategory::LoopStack
        );
        assert_eq!(
            TraceError::StepLimitExceeded { limit: 10 }.line(),
            None
        );
    }

    #[test]
    fn syntax_error_message_mentions_column() {
        let err = ExprError::Syntax {
            message: "unexpected ')'".into(),
            span: Span::point(3),
        };
        assert_eq!(err.to_string(), "syntax error at col 3: unexpected ')'");
    }
}
