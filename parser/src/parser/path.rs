//! Resource path parsing.

use super::Parser;
use crate::ast::{KeyPredicate, PathSegment, ResourcePath};
use crate::error::ParseResult;
use crate::lexer::TokenKind;

impl Parser {
    /// Parse `[$root/]Segment[(key)][/Segment[(key)]]*`.
    pub(crate) fn parse_path(&mut self) -> ParseResult<ResourcePath> {
        let mut path = ResourcePath::default();

        if self.check(&TokenKind::Dollar) {
            self.advance();
            if !self.check_ident("root") {
                return Err(self.unexpected("root"));
            }
            self.advance();
            self.expect(&TokenKind::Slash)?;
            path.rooted = true;
        }

        path.segments.push(self.parse_segment()?);
        while self.check(&TokenKind::Slash) {
            self.advance();
            path.segments.push(self.parse_segment()?);
        }

        Ok(path)
    }

    fn parse_segment(&mut self) -> ParseResult<PathSegment> {
        let name = self.expect_qualified_name()?;
        let mut segment = PathSegment::new(name);
        if self.check(&TokenKind::LParen) {
            self.advance();
            segment.key = Some(self.parse_key_predicate()?);
            self.expect(&TokenKind::RParen)?;
        }
        Ok(segment)
    }

    fn parse_key_predicate(&mut self) -> ParseResult<KeyPredicate> {
        let named = matches!(self.peek().kind, TokenKind::Ident(_))
            && matches!(self.peek_at(1), TokenKind::Equals);
        if !named {
            return Ok(KeyPredicate::Single(self.parse_literal()?));
        }

        let mut parts = Vec::new();
        loop {
            let name = self.expect_ident()?;
            self.expect(&TokenKind::Equals)?;
            parts.push((name, self.parse_literal()?));
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(KeyPredicate::Named(parts))
    }
}
