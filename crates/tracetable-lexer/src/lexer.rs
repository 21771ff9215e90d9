//! Expression lexer: converts canonicalized expression text to tokens.
//!
//! Stops at the first error: a bad character fails the whole expression,
//! and with it the statement being executed.

use tracetable_types::{ExprError, Span};

use crate::token::{Token, TokenKind};

/// Lexer over one canonicalized expression.
pub struct Lexer {
    /// The expression as characters; columns index into this.
    chars: Vec<char>,
    /// Current index into `chars`.
    pos: usize,
}

impl Lexer {
    /// Create a new lexer for the given expression text.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Lex the whole expression. The token stream always ends with
    /// [`TokenKind::Eof`].
    pub fn lex(mut self) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    /// Consume `expected` if it is next.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// 1-based column of a character index.
    fn col(index: usize) -> u32 {
        index as u32 + 1
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(Self::col(start), Self::col(self.pos.saturating_sub(1).max(start)))
    }

    fn error(&self, message: impl Into<String>, start: usize) -> ExprError {
        ExprError::Syntax {
            message: message.into(),
            span: self.span_from(start),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn next_token(&mut self) -> Result<Token, ExprError> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }

        let start = self.pos;
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, Span::point(Self::col(start))));
        };

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '%' => TokenKind::Percent,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '*' => {
                if self.eat('*') {
                    TokenKind::StarStar
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.eat('/') {
                    TokenKind::SlashSlash
                } else {
                    TokenKind::Slash
                }
            }
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else {
                    return Err(self.error("unexpected '='", start));
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::BangEq
                } else {
                    return Err(self.error("unexpected '!'", start));
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }
            '"' | '\'' => self.scan_string(ch, start)?,
            c if c.is_ascii_digit() => self.scan_number(start)?,
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.scan_number(start)?,
            c if c.is_alphabetic() || c == '_' => self.scan_word(start),
            other => return Err(self.error(format!("unexpected character '{other}'"), start)),
        };

        Ok(Token::new(kind, self.span_from(start)))
    }

    /// Scan a string literal; the opening quote is already consumed.
    fn scan_string(&mut self, quote: char, start: usize) -> Result<TokenKind, ExprError> {
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error("unterminated string literal", start)),
                Some(c) if c == quote => return Ok(TokenKind::StringLit(value)),
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c) => value.push(c),
                    None => return Err(self.error("unterminated string literal", start)),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// Scan an integer or decimal literal with an optional exponent.
    /// The first character is already consumed.
    fn scan_number(&mut self, start: usize) -> Result<TokenKind, ExprError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.chars[start] != '.' {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let digits_at = match self.peek_at(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.peek_at(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digits_at {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map(TokenKind::NumberLit)
            .map_err(|_| self.error(format!("invalid number '{text}'"), start))
    }

    /// Scan an identifier or canonical keyword. The first character is
    /// already consumed.
    fn scan_word(&mut self, start: usize) -> TokenKind {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        TokenKind::keyword(&word).unwrap_or(TokenKind::Identifier(word))
    }
}
