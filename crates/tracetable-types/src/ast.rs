//! Statement and expression AST.
//!
//! A [`Program`] is the flat, index-addressable list of [`Statement`]s the
//! execution engine walks. Statements keep their captured expressions as
//! raw text; the evaluator parses an [`Expr`] from that text each time the
//! statement runs, so syntax errors surface at the failing statement.

use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// What a source line was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    StartWhile,
    SetVar,
    Display,
    If,
    Else,
    EndIf,
    EndWhile,
    StartFor,
    EndFor,
    ForEach,
    /// No template matched: comments, empty lines, anything unrecognised.
    Blank,
}

impl StatementKind {
    /// The snake_case label used in logs and serialized output.
    pub fn label(self) -> &'static str {
        match self {
            Self::StartWhile => "start_while",
            Self::SetVar => "set_var",
            Self::Display => "display",
            Self::If => "if",
            Self::Else => "else",
            Self::EndIf => "end_if",
            Self::EndWhile => "end_while",
            Self::StartFor => "start_for",
            Self::EndFor => "end_for",
            Self::ForEach => "for_each",
            Self::Blank => "blank",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One matched source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    /// Captured expression strings, trimmed, in template order.
    pub exprs: Vec<String>,
    /// 1-based source line.
    pub line: u32,
}

impl Statement {
    pub fn new(kind: StatementKind, exprs: Vec<String>, line: u32) -> Self {
        Self { kind, exprs, line }
    }

    /// The `n`th captured expression, if the line supplied one.
    pub fn expr(&self, n: usize) -> Option<&str> {
        self.exprs.get(n).map(String::as_str)
    }
}

/// The parsed program: one statement per source line, immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node with its column span.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Levels in the tree rooted here; a leaf is 1.
    height: u32,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        let below = match &kind {
            ExprKind::NumberLit(_)
            | ExprKind::StringLit(_)
            | ExprKind::BoolLit(_)
            | ExprKind::Identifier(_) => 0,
            ExprKind::SeqLit(elems) => elems.iter().map(Expr::height).max().unwrap_or(0),
            ExprKind::Index { target, index } => target.height.max(index.height),
            ExprKind::Unary { operand, .. } => operand.height,
            ExprKind::Binary { left, right, .. } => left.height.max(right.height),
            ExprKind::Compare { first, rest } => rest
                .iter()
                .map(|(_, operand)| operand.height)
                .fold(first.height, u32::max),
            ExprKind::Paren(inner) => inner.height,
        };
        Self {
            kind,
            span,
            height: below.saturating_add(1),
        }
    }

    /// Evaluating or dropping a node recurses this many levels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    NumberLit(f64),
    StringLit(String),
    BoolLit(bool),
    /// `[a, b, c]`
    SeqLit(Vec<Expr>),
    /// Variable lookup; the only way an expression reaches program state.
    Identifier(String),
    /// `target[index]`
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `a < b <= c`: each link compares neighbouring operands.
    Compare {
        first: Box<Expr>,
        rest: Vec<(CmpOp, Expr)>,
    },
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        }
    }
}
