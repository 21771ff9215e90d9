//! Core parser infrastructure: token cursor, error reporting, entry point.

use tracetable_lexer::token::{Token, TokenKind};
use tracetable_lexer::{canonicalize, Lexer};
use tracetable_types::ast::{Expr, ExprKind};
use tracetable_types::{ExprError, Span};

/// Maximum nesting of parenthesised, bracketed, unary and `**` sub-expressions.
pub const MAX_EXPR_DEPTH: u32 = 64;

/// Maximum height of a parsed expression tree. Operator chains such as
/// `a + b + c` parse flat but evaluate one level per operator.
pub const MAX_EXPR_HEIGHT: u32 = 200;

/// Canonicalize, tokenize and parse one captured expression.
pub fn parse_expression(expression: &str) -> Result<Expr, ExprError> {
    let canonical = canonicalize(expression);
    let tokens = Lexer::new(&canonical).lex()?;
    Parser::new(tokens).parse()
}

/// Recursive-descent parser over one expression's tokens.
///
/// Fails on the first error; there is nothing to recover into since an
/// expression is a single line fragment.
pub struct Parser {
    /// The token stream (ends with `Eof`).
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Current expression nesting depth.
    pub(crate) depth: u32,
}

impl Parser {
    /// Create a new parser from a token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the whole token stream as a single expression.
    pub fn parse(mut self) -> Result<Expr, ExprError> {
        if self.at_end() {
            return Err(self.error_at_current("expected an expression"));
        }
        let expr = self.parse_expr()?;
        if !self.at_end() {
            return Err(self.error_at_current(format!(
                "unexpected '{}' after expression",
                self.peek_kind()
            )));
        }
        Ok(expr)
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        self.peek().map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    /// Advance the cursor by one and return the consumed token's span.
    pub(crate) fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or(Span::point(1))
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().map(|t| t.span).unwrap_or(Span::point(1))
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token kind, or fail.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Span, ExprError> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(format!(
                "expected '{}', got '{}'",
                expected,
                self.peek_kind()
            )))
        }
    }

    // ── Depth Tracking ────────────────────────────────────────────────────────

    /// Enter one nesting level; fails past [`MAX_EXPR_DEPTH`].
    pub(crate) fn enter(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_EXPR_DEPTH {
            return Err(self.error_at_current(format!(
                "expression nested deeper than {MAX_EXPR_DEPTH} levels"
            )));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Build a composite node; fails once the tree grows past
    /// [`MAX_EXPR_HEIGHT`].
    pub(crate) fn node(&self, kind: ExprKind, span: Span) -> Result<Expr, ExprError> {
        let expr = Expr::new(kind, span);
        if expr.height() > MAX_EXPR_HEIGHT {
            return Err(ExprError::Syntax {
                message: format!("expression deeper than {MAX_EXPR_HEIGHT} operators"),
                span,
            });
        }
        Ok(expr)
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build a syntax error at the current token position.
    pub(crate) fn error_at_current(&self, message: impl Into<String>) -> ExprError {
        ExprError::Syntax {
            message: message.into(),
            span: self.current_span(),
        }
    }
}
