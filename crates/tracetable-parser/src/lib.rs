//! Trace table parser.
//!
//! Two independent grammars live here:
//! - the line grammar: each source line is matched against an ordered list
//!   of keyword templates ([`match_line`]) to build a [`Program`];
//! - the expression grammar: a captured expression string is canonicalized,
//!   tokenized and parsed into an [`Expr`] ([`parse_expression`]).
//!
//! [`Program`]: tracetable_types::ast::Program
//! [`Expr`]: tracetable_types::ast::Expr

mod parse_expr;
mod parser;
mod program;
mod template;

pub use parser::{parse_expression, Parser, MAX_EXPR_DEPTH, MAX_EXPR_HEIGHT};
pub use program::{parse_program, parse_source, read_program, END_SENTINEL};
pub use template::{match_line, Template, TEMPLATES};
