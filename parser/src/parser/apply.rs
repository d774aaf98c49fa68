//! Transformation pipeline parsing.

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;

/// Verbs recognized without a namespace qualifier.
const BUILTIN_VERBS: [&str; 6] = ["filter", "ancestors", "descendants", "orderby", "skip", "top"];

impl Parser {
    /// Parse steps separated by `/` or `|`.
    pub(crate) fn parse_pipeline(&mut self) -> ParseResult<Vec<TransformationStep>> {
        let mut steps = vec![self.parse_step()?];
        while self.check(&TokenKind::Slash) || self.check(&TokenKind::Pipe) {
            self.advance();
            steps.push(self.parse_step()?);
        }
        Ok(steps)
    }

    fn parse_step(&mut self) -> ParseResult<TransformationStep> {
        let start = self.peek().span;
        let name = self.expect_qualified_name()?;

        if name.contains('.') {
            return self.parse_custom_function(name);
        }

        match name.as_str() {
            "filter" => {
                self.expect(&TokenKind::LParen)?;
                let expr = self.parse_filter_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(TransformationStep::Filter(expr))
            }
            "ancestors" => Ok(TransformationStep::Ancestors(self.parse_traversal()?)),
            "descendants" => Ok(TransformationStep::Descendants(self.parse_traversal()?)),
            "orderby" => {
                self.expect(&TokenKind::LParen)?;
                let terms = self.parse_order_terms()?;
                self.expect(&TokenKind::RParen)?;
                Ok(TransformationStep::OrderBy(terms))
            }
            "skip" | "top" => {
                self.expect(&TokenKind::LParen)?;
                let count = self.expect_count()?;
                self.expect(&TokenKind::RParen)?;
                Ok(if name == "skip" {
                    TransformationStep::Skip(count)
                } else {
                    TransformationStep::Top(count)
                })
            }
            _ => Err(ParseError::new(format!("unknown transformation '{}'", name), start)
                .with_expected(BUILTIN_VERBS.iter().map(|v| v.to_string()).collect())
                .with_found(name)),
        }
    }

    /// `(root, qualifier, nodeProperty, transformations [, maxDistance] [, keep start])`
    fn parse_traversal(&mut self) -> ParseResult<HierarchyTraversal> {
        self.expect(&TokenKind::LParen)?;
        let hierarchy_root = self.parse_path()?;
        self.expect(&TokenKind::Comma)?;
        let qualifier = self.expect_ident()?;
        self.expect(&TokenKind::Comma)?;
        let node_property = self.expect_ident()?;
        self.expect(&TokenKind::Comma)?;
        let input_transformations = self.parse_pipeline()?;

        let mut maximum_distance = None;
        let mut keep_start = false;
        while self.check(&TokenKind::Comma) {
            self.advance();
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Int(n) => {
                    let distance = u32::try_from(n).map_err(|_| {
                        ParseError::new(format!("invalid maximum distance {}", n), token.span)
                    })?;
                    self.advance();
                    maximum_distance = Some(distance);
                }
                TokenKind::Ident(ref word) if word == "keepStart" => {
                    self.advance();
                    keep_start = true;
                }
                TokenKind::Ident(ref word) if word == "keep" => {
                    self.advance();
                    if !self.check_ident("start") {
                        return Err(self.unexpected("start"));
                    }
                    self.advance();
                    keep_start = true;
                }
                _ => return Err(self.unexpected("maximum distance or keep start")),
            }
        }
        self.expect(&TokenKind::RParen)?;

        Ok(HierarchyTraversal {
            hierarchy_root,
            qualifier,
            node_property,
            input_transformations,
            maximum_distance,
            keep_start,
        })
    }

    /// `Namespace.Function(Key=Value, ...)`
    fn parse_custom_function(&mut self, name: String) -> ParseResult<TransformationStep> {
        self.expect(&TokenKind::LParen)?;
        let mut parameters = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let key = self.expect_ident()?;
                self.expect(&TokenKind::Equals)?;
                let value = self.parse_param_value()?;
                parameters.push((key, value));
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(TransformationStep::CustomFunction { name, parameters })
    }

    /// `prop [asc|desc], ...`
    pub(crate) fn parse_order_terms(&mut self) -> ParseResult<Vec<OrderTerm>> {
        let mut terms = Vec::new();
        loop {
            let property = self.expect_ident()?;
            let direction = if self.check_ident("desc") {
                self.advance();
                SortDirection::Desc
            } else {
                if self.check_ident("asc") {
                    self.advance();
                }
                SortDirection::Asc
            };
            terms.push(OrderTerm {
                property,
                direction,
            });
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(terms)
    }
}
