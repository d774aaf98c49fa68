//! Literal parsing.

use super::Parser;
use crate::ast::ParamValue;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;
use mockd_core::{parse_date, parse_date_time, Value};

impl Parser {
    /// Parse a scalar literal.
    pub(crate) fn parse_literal(&mut self) -> ParseResult<Value> {
        let token = self.peek().clone();
        let value = match token.kind {
            TokenKind::String(s) => Value::String(s),
            TokenKind::Int(i) => Value::Int(i),
            TokenKind::Decimal(f) => Value::Decimal(f),
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::Null => Value::Null,
            TokenKind::Temporal(ref text) => {
                let parsed = if text.contains('T') {
                    parse_date_time(text).map(Value::DateTimeOffset)
                } else {
                    parse_date(text).map(Value::Date)
                };
                parsed.map_err(|e| ParseError::new(e.to_string(), token.span))?
            }
            _ => return Err(self.unexpected("literal")),
        };
        self.advance();
        Ok(value)
    }

    /// Parse the right-hand side of `Name=value` in a function call.
    pub(crate) fn parse_param_value(&mut self) -> ParseResult<ParamValue> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Structured(text) => {
                self.advance();
                let json: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
                    ParseError::new(format!("invalid structured literal: {}", e), token.span)
                        .with_found(text.clone())
                })?;
                Ok(ParamValue::Structured(Value::from(json)))
            }
            TokenKind::Dollar | TokenKind::Ident(_) => Ok(ParamValue::Path(self.parse_path()?)),
            _ => Ok(ParamValue::Literal(self.parse_literal()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::ParamValue;
    use crate::Parser;
    use mockd_core::Value;

    #[test]
    fn test_structured_literal_is_decoded() {
        // GIVEN
        let mut parser = Parser::new(r#"[{"NodeID":"EMEA","Levels":1}]"#).unwrap();

        // WHEN
        let value = parser.parse_param_value().unwrap();

        // THEN
        let ParamValue::Structured(Value::List(items)) = value else {
            panic!("expected structured list");
        };
        let entry = items[0].as_object().unwrap();
        assert_eq!(entry.get("NodeID"), Some(&Value::from("EMEA")));
        assert_eq!(entry.get("Levels"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_malformed_json_is_a_syntax_error() {
        let mut parser = Parser::new("[{NodeID:EMEA}]").unwrap();
        let err = parser.parse_param_value().unwrap_err();
        assert!(err.message.starts_with("invalid structured literal"));
    }

    #[test]
    fn test_invalid_date_reports_span() {
        let mut parser = Parser::new("2023-02-30").unwrap();
        let err = parser.parse_literal().unwrap_err();
        assert_eq!(err.column(), 1);
    }

    #[test]
    fn test_timestamp_literal() {
        let mut parser = Parser::new("1970-01-01T00:00:01Z").unwrap();
        assert_eq!(parser.parse_literal().unwrap(), Value::DateTimeOffset(1000));
    }
}
