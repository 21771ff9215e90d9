//! Token types for the expression lexer.

use std::fmt;
use tracetable_types::Span;

/// A single token with its column span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every token kind the expression grammar uses.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    NumberLit(f64),
    StringLit(String),
    True,
    False,

    Identifier(String),

    // ── Logical keywords ─────────────────────────────────────
    And,
    Or,
    Not,

    // ── Arithmetic ───────────────────────────────────────────
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,

    // ── Comparison ───────────────────────────────────────────
    EqEq,
    BangEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    // ── Delimiters ───────────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    Eof,
}

impl TokenKind {
    /// Map a canonical keyword spelling to its token, if it is one.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        match word {
            "True" => Some(TokenKind::True),
            "False" => Some(TokenKind::False),
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "not" => Some(TokenKind::Not),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumberLit(n) => write!(f, "{n}"),
            Self::StringLit(s) => write!(f, "'{s}'"),
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::Not => write!(f, "not"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::StarStar => write!(f, "**"),
            Self::Slash => write!(f, "/"),
            Self::SlashSlash => write!(f, "//"),
            Self::Percent => write!(f, "%"),
            Self::EqEq => write!(f, "=="),
            Self::BangEq => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::LessEq => write!(f, "<="),
            Self::Greater => write!(f, ">"),
            Self::GreaterEq => write!(f, ">="),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Eof => write!(f, "end of expression"),
        }
    }
}
