//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 8. `or`
//! 7. `and`
//! 6. `not` (prefix)
//! 5. `==`, `!=`, `<`, `>`, `<=`, `>=` (chainable: `a < b < c`)
//! 4. `+`, `-`
//! 3. `*`, `/`, `//`, `%`
//! 2. unary `-`, `+`
//! 1. `**` (right associative; its right operand may carry a unary sign)
//! 0. `[index]` (postfix), literals, identifiers, `( ... )`, `[ ... ]`

use tracetable_lexer::token::TokenKind;
use tracetable_types::ast::*;
use tracetable_types::ExprError;

use crate::parser::Parser;

type ParseResult = Result<Expr, ExprError>;

impl Parser {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a full expression.
    pub(crate) fn parse_expr(&mut self) -> ParseResult {
        self.enter()?;
        let result = self.parse_or();
        self.leave();
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `OrExpr = AndExpr { "or" AndExpr }`
    fn parse_or(&mut self) -> ParseResult {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = self.binary(left, BinOp::Or, right)?;
        }
        Ok(left)
    }

    /// `AndExpr = NotExpr { "and" NotExpr }`
    fn parse_and(&mut self) -> ParseResult {
        let mut left = self.parse_not()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_not()?;
            left = self.binary(left, BinOp::And, right)?;
        }
        Ok(left)
    }

    /// `NotExpr = "not" NotExpr | CompExpr`
    fn parse_not(&mut self) -> ParseResult {
        if self.check(&TokenKind::Not) {
            let start = self.advance();
            self.enter()?;
            let operand = self.parse_not();
            self.leave();
            let operand = operand?;
            let span = start.merge(operand.span);
            return self.node(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            );
        }
        self.parse_comparison()
    }

    /// `CompExpr = AddExpr { CompOp AddExpr }`
    fn parse_comparison(&mut self) -> ParseResult {
        let first = self.parse_add()?;
        let mut rest = Vec::new();
        while let Some(op) = self.match_comparison_op() {
            self.advance();
            rest.push((op, self.parse_add()?));
        }
        if rest.is_empty() {
            return Ok(first);
        }
        let span = rest
            .iter()
            .fold(first.span, |span, (_, operand)| span.merge(operand.span));
        self.node(
            ExprKind::Compare {
                first: Box::new(first),
                rest,
            },
            span,
        )
    }

    /// Check if current token is a comparison operator.
    fn match_comparison_op(&self) -> Option<CmpOp> {
        match self.peek_kind() {
            TokenKind::EqEq => Some(CmpOp::Eq),
            TokenKind::BangEq => Some(CmpOp::NotEq),
            TokenKind::Less => Some(CmpOp::Less),
            TokenKind::LessEq => Some(CmpOp::LessEq),
            TokenKind::Greater => Some(CmpOp::Greater),
            TokenKind::GreaterEq => Some(CmpOp::GreaterEq),
            _ => None,
        }
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> ParseResult {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/" | "//" | "%") UnaryExpr }`
    fn parse_mul(&mut self) -> ParseResult {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::SlashSlash => BinOp::FloorDiv,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    /// `UnaryExpr = ("-" | "+") UnaryExpr | PowerExpr`
    fn parse_unary(&mut self) -> ParseResult {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_power(),
        };
        let start = self.advance();
        self.enter()?;
        let operand = self.parse_unary();
        self.leave();
        let operand = operand?;
        let span = start.merge(operand.span);
        self.node(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// `PowerExpr = PostfixExpr [ "**" UnaryExpr ]`
    ///
    /// `-2 ** 2` is `-(2 ** 2)`, and `2 ** -1` is allowed.
    fn parse_power(&mut self) -> ParseResult {
        let base = self.parse_postfix()?;
        if self.eat(&TokenKind::StarStar) {
            self.enter()?;
            let exponent = self.parse_unary();
            self.leave();
            return self.binary(base, BinOp::Pow, exponent?);
        }
        Ok(base)
    }

    /// `PostfixExpr = PrimaryExpr { "[" Expr "]" }`
    fn parse_postfix(&mut self) -> ParseResult {
        let mut expr = self.parse_primary()?;
        while self.eat(&TokenKind::LBracket) {
            let index = self.parse_expr()?;
            self.expect(&TokenKind::RBracket)?;
            let span = expr.span.merge(self.previous_span());
            expr = self.node(
                ExprKind::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                },
                span,
            )?;
        }
        Ok(expr)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> ParseResult {
        let start = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::NumberLit(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::NumberLit(n), start))
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(Expr::new(ExprKind::StringLit(s), start))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(true), start))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(false), start))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expr::new(ExprKind::Identifier(name), start))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                self.node(ExprKind::Paren(Box::new(inner)), span)
            }
            TokenKind::LBracket => self.parse_seq_literal(),
            other => Err(self.error_at_current(format!("unexpected '{other}'"))),
        }
    }

    /// `SeqLit = "[" [ Expr { "," Expr } [ "," ] ] "]"`
    fn parse_seq_literal(&mut self) -> ParseResult {
        let start = self.advance();
        let mut elems = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            elems.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        let span = start.merge(self.previous_span());
        self.node(ExprKind::SeqLit(elems), span)
    }

    fn binary(&self, left: Expr, op: BinOp, right: Expr) -> ParseResult {
        let span = left.span.merge(right.span);
        self.node(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }
}
