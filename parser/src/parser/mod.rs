//! Parser for query option text.
//!
//! This module is organized into submodules by parsing category:
//! - `filter`: Boolean filter expressions with precedence
//! - `apply`: Transformation pipeline steps
//! - `path`: Resource paths and key predicates
//! - `literal`: Scalar and structured literal values

mod apply;
mod filter;
mod literal;
mod path;

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};
use mockd_filter::FilterExpr;

// ==================== PARSER STATE ====================

/// Parser state.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser from source text.
    pub fn new(input: &str) -> ParseResult<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }
}

// ==================== TOKEN HELPERS ====================

impl Parser {
    pub(crate) fn peek(&self) -> &Token {
        let index = self.pos.min(self.tokens.len().saturating_sub(1));
        &self.tokens[index]
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len().saturating_sub(1));
        &self.tokens[index].kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_ident(&self, name: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(s) if s.eq_ignore_ascii_case(name))
    }

    pub(crate) fn at_end(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Expect an identifier or a keyword used as a name.
    pub(crate) fn expect_name(&mut self) -> ParseResult<String> {
        let token = self.peek().clone();
        let name = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            kind if kind.is_keyword() => kind.name().to_string(),
            _ => return Err(self.unexpected("name")),
        };
        self.advance();
        Ok(name)
    }

    /// Dotted name such as `com.sap.vocabularies.Hierarchy.v1.TopLevels`.
    pub(crate) fn expect_qualified_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_ident()?;
        while self.check(&TokenKind::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_name()?);
        }
        Ok(name)
    }

    pub(crate) fn expect_count(&mut self) -> ParseResult<usize> {
        match self.peek().kind {
            TokenKind::Int(n) if n >= 0 => {
                self.advance();
                Ok(n as usize)
            }
            _ => Err(self.unexpected("non-negative integer")),
        }
    }

    pub(crate) fn expect_end(&mut self) -> ParseResult<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    /// Error for the current token.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        if matches!(token.kind, TokenKind::Eof) {
            ParseError::unexpected_eof(token.span, expected)
        } else {
            ParseError::unexpected_token(token.span, expected, token.kind.name())
        }
    }
}

// ==================== PUBLIC API ====================

/// Parse a transformation pipeline (`$apply` text).
pub fn parse_apply(input: &str) -> ParseResult<Vec<TransformationStep>> {
    let mut parser = Parser::new(input)?;
    let steps = parser.parse_pipeline()?;
    parser.expect_end()?;
    Ok(steps)
}

/// Parse a standalone filter expression (`$filter` text).
pub fn parse_filter(input: &str) -> ParseResult<FilterExpr> {
    let mut parser = Parser::new(input)?;
    let expr = parser.parse_filter_expr()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parse an `$orderby` list.
pub fn parse_orderby(input: &str) -> ParseResult<Vec<OrderTerm>> {
    let mut parser = Parser::new(input)?;
    let terms = parser.parse_order_terms()?;
    parser.expect_end()?;
    Ok(terms)
}

/// Parse a resource path (`/Set(key)/Nav/...`).
pub fn parse_resource_path(input: &str) -> ParseResult<ResourcePath> {
    let mut parser = Parser::new(input)?;
    if parser.check(&TokenKind::Slash) {
        parser.advance();
    }
    let path = parser.parse_path()?;
    parser.expect_end()?;
    Ok(path)
}

// ==================== TESTS ====================
