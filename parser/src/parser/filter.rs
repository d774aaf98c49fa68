//! Filter expression parsing.
//!
//! Precedence, loosest first:
//! - `or`
//! - `and`
//! - `not`
//! - comparisons (`eq ne gt ge lt le`) and string functions

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::TokenKind;
use mockd_core::Value;
use mockd_filter::{FilterExpr, FilterOp};

/// One side of a comparison.
enum Operand {
    Property(String),
    Literal(Value),
}

impl Parser {
    /// Parse a filter expression.
    pub(crate) fn parse_filter_expr(&mut self) -> ParseResult<FilterExpr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<FilterExpr> {
        let mut left = self.parse_and()?;
        while self.check(&TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = left.or(right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<FilterExpr> {
        let mut left = self.parse_not()?;
        while self.check(&TokenKind::And) {
            self.advance();
            let right = self.parse_not()?;
            left = left.and(right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> ParseResult<FilterExpr> {
        if self.check(&TokenKind::Not) {
            self.advance();
            let inner = self.parse_not()?;
            return Ok(inner.not());
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<FilterExpr> {
        if self.check(&TokenKind::LParen) {
            self.advance();
            let expr = self.parse_filter_expr()?;
            self.expect(&TokenKind::RParen)?;
            return Ok(expr);
        }

        if let TokenKind::Ident(name) = &self.peek().kind {
            if matches!(self.peek_at(1), TokenKind::LParen) {
                if let Some(op) = FilterOp::from_function(name) {
                    self.advance();
                    return self.parse_string_function(op);
                }
            }
        }

        self.parse_comparison()
    }

    /// `contains(Name,'x')` and friends.
    fn parse_string_function(&mut self, op: FilterOp) -> ParseResult<FilterExpr> {
        self.expect(&TokenKind::LParen)?;
        let identifier = self.expect_ident()?;
        self.expect(&TokenKind::Comma)?;
        let literal = self.parse_literal()?;
        self.expect(&TokenKind::RParen)?;
        Ok(FilterExpr::predicate(identifier, op, literal))
    }

    fn parse_comparison(&mut self) -> ParseResult<FilterExpr> {
        let left = self.parse_operand()?;
        let op = self.parse_comparison_op()?;

        match left {
            Operand::Property(identifier) => {
                let literal = self.parse_literal()?;
                Ok(FilterExpr::predicate(identifier, op, literal))
            }
            Operand::Literal(literal) => {
                let identifier = self.expect_ident()?;
                Ok(FilterExpr::predicate(identifier, op.flip(), literal))
            }
        }
    }

    fn parse_operand(&mut self) -> ParseResult<Operand> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Operand::Property(name))
            }
            _ => Ok(Operand::Literal(self.parse_literal()?)),
        }
    }

    fn parse_comparison_op(&mut self) -> ParseResult<FilterOp> {
        let op = match self.peek().kind {
            TokenKind::Eq => FilterOp::Eq,
            TokenKind::Ne => FilterOp::Ne,
            TokenKind::Gt => FilterOp::Gt,
            TokenKind::Ge => FilterOp::Ge,
            TokenKind::Lt => FilterOp::Lt,
            TokenKind::Le => FilterOp::Le,
            _ => return Err(self.unexpected("comparison operator")),
        };
        self.advance();
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_filter;
    use mockd_core::Value;
    use mockd_filter::{FilterExpr, FilterOp};

    #[test]
    fn test_simple_comparison() {
        let expr = parse_filter("ID eq 'EMEA'").unwrap();
        assert_eq!(expr, FilterExpr::predicate("ID", FilterOp::Eq, "EMEA"));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        // GIVEN
        let text = "ID eq 'US' or ID eq 'EMEA' and IsActiveEntity eq true";

        // WHEN
        let expr = parse_filter(text).unwrap();

        // THEN
        let expected = FilterExpr::predicate("ID", FilterOp::Eq, "US").or(
            FilterExpr::predicate("ID", FilterOp::Eq, "EMEA")
                .and(FilterExpr::predicate("IsActiveEntity", FilterOp::Eq, true)),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_parentheses_and_not() {
        let expr = parse_filter("not (Stock gt 5 or Stock eq null)").unwrap();
        let expected = FilterExpr::predicate("Stock", FilterOp::Gt, 5i64)
            .or(FilterExpr::predicate("Stock", FilterOp::Eq, Value::Null))
            .not();
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_literal_on_left_is_flipped() {
        let expr = parse_filter("10 lt Price").unwrap();
        assert_eq!(expr, FilterExpr::predicate("Price", FilterOp::Gt, 10i64));
    }

    #[test]
    fn test_string_functions() {
        let expr = parse_filter("startswith(Name,'EM') and matchesPattern(ID,'^[0-9]+$')").unwrap();
        let expected = FilterExpr::predicate("Name", FilterOp::StartsWith, "EM")
            .and(FilterExpr::predicate("ID", FilterOp::MatchesPattern, "^[0-9]+$"));
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_date_literal() {
        let expr = parse_filter("ValidFrom ge 2024-01-01").unwrap();
        assert!(matches!(
            expr,
            FilterExpr::Predicate(ref p) if matches!(p.literal, Value::Date(_))
        ));
    }

    #[test]
    fn test_missing_operator() {
        let err = parse_filter("ID 'US'").unwrap_err();
        assert_eq!(err.expected, Some(vec!["comparison operator".to_string()]));
    }

    #[test]
    fn test_two_properties_rejected() {
        assert!(parse_filter("ID eq Name").is_err());
    }
}
