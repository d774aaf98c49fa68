//! Lexer (tokenizer) for query option text.

use crate::{ParseError, ParseResult, Span};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords (case-sensitive, lowercase as in URLs)
    And,
    Or,
    Not,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    True,
    False,
    Null,

    // Literals
    Ident(String),
    Int(i64),
    Decimal(f64),
    /// `'...'` string with `''` unescaped.
    String(String),
    /// Unquoted date or timestamp (`2024-01-15`, `2024-01-15T10:30:00Z`).
    Temporal(String),
    /// Raw text of a bracketed `[...]` or `{...}` structured literal.
    Structured(String),

    // Symbols
    LParen,   // (
    RParen,   // )
    Comma,    // ,
    Dot,      // .
    Equals,   // =
    Slash,    // /
    Pipe,     // |
    Dollar,   // $

    // End of input
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Eq => "eq",
            TokenKind::Ne => "ne",
            TokenKind::Gt => "gt",
            TokenKind::Ge => "ge",
            TokenKind::Lt => "lt",
            TokenKind::Le => "le",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "integer",
            TokenKind::Decimal(_) => "decimal",
            TokenKind::String(_) => "string",
            TokenKind::Temporal(_) => "date",
            TokenKind::Structured(_) => "structured literal",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Equals => "'='",
            TokenKind::Slash => "'/'",
            TokenKind::Pipe => "'|'",
            TokenKind::Dollar => "'$'",
            TokenKind::Eof => "end of input",
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::Gt
                | TokenKind::Ge
                | TokenKind::Lt
                | TokenKind::Le
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }
}

/// A token with its span.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(pos: usize, line: usize, column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(pos, pos, line, column),
        }
    }
}

/// Lexer state.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize all input into a vector of tokens.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn span_from(&self, start: usize, start_line: usize, start_col: usize) -> Span {
        Span::new(start, self.pos, start_line, start_col)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn next_char(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.pos = pos + c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.column;

        let Some(c) = self.next_char() else {
            return Ok(Token::eof(self.pos, self.line, self.column));
        };

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '=' => TokenKind::Equals,
            '/' => TokenKind::Slash,
            '|' => TokenKind::Pipe,
            '$' => TokenKind::Dollar,
            '\'' => self.scan_string(start, start_line, start_col)?,
            '[' | '{' => self.scan_structured(c, start, start_line, start_col)?,
            '_' | 'a'..='z' | 'A'..='Z' => self.scan_ident_or_keyword(c),
            '-' if matches!(self.peek_char(), Some('0'..='9')) => {
                self.scan_number(c, start, start_line, start_col)?
            }
            '0'..='9' => self.scan_number(c, start, start_line, start_col)?,
            _ => {
                return Err(ParseError::new(
                    format!("unexpected character '{}'", c),
                    self.span_from(start, start_line, start_col),
                ));
            }
        };

        Ok(Token::new(kind, self.span_from(start, start_line, start_col)))
    }

    fn scan_string(
        &mut self,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> ParseResult<TokenKind> {
        let mut value = String::new();

        loop {
            match self.next_char() {
                None => {
                    return Err(ParseError::new(
                        "unterminated string literal",
                        self.span_from(start, start_line, start_col),
                    ));
                }
                Some('\'') => {
                    // A doubled quote is an escaped quote
                    if self.peek_char() == Some('\'') {
                        self.next_char();
                        value.push('\'');
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
            }
        }

        Ok(TokenKind::String(value))
    }

    /// Capture a bracketed literal verbatim up to its matching close bracket.
    /// Brackets inside double-quoted JSON strings are ignored.
    fn scan_structured(
        &mut self,
        open: char,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> ParseResult<TokenKind> {
        let mut text = String::new();
        text.push(open);
        let mut stack = vec![open];
        let mut in_string = false;

        while let Some(c) = self.next_char() {
            text.push(c);
            if in_string {
                match c {
                    '\\' => {
                        if let Some(escaped) = self.next_char() {
                            text.push(escaped);
                        }
                    }
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '[' | '{' => stack.push(c),
                ']' | '}' => {
                    let expected = if c == ']' { '[' } else { '{' };
                    if stack.pop() != Some(expected) {
                        return Err(ParseError::new(
                            format!("mismatched '{}' in structured literal", c),
                            self.span_from(start, start_line, start_col),
                        ));
                    }
                    if stack.is_empty() {
                        return Ok(TokenKind::Structured(text));
                    }
                }
                _ => {}
            }
        }

        Err(ParseError::new(
            "unterminated structured literal",
            self.span_from(start, start_line, start_col),
        ))
    }

    fn scan_ident_or_keyword(&mut self, first: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first);

        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.next_char();
            } else {
                break;
            }
        }

        // asc, desc, keep and start are context-specific and stay identifiers
        match ident.as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "eq" => TokenKind::Eq,
            "ne" => TokenKind::Ne,
            "gt" => TokenKind::Gt,
            "ge" => TokenKind::Ge,
            "lt" => TokenKind::Lt,
            "le" => TokenKind::Le,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident(ident),
        }
    }

    fn scan_number(
        &mut self,
        first: char,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> ParseResult<TokenKind> {
        let mut number = String::new();
        number.push(first);

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                number.push(c);
                self.next_char();
            } else {
                break;
            }
        }

        // Four digits followed by '-' start a date literal
        if number.len() == 4 && first != '-' && self.peek_char() == Some('-') {
            return Ok(self.scan_temporal(number));
        }

        let has_decimal = if self.peek_char() == Some('.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            match lookahead.peek() {
                Some((_, next_c)) if next_c.is_ascii_digit() => {
                    number.push('.');
                    self.next_char();
                    while let Some(c) = self.peek_char() {
                        if c.is_ascii_digit() {
                            number.push(c);
                            self.next_char();
                        } else {
                            break;
                        }
                    }
                    true
                }
                _ => false,
            }
        } else {
            false
        };

        if has_decimal {
            let value: f64 = number.parse().map_err(|_| {
                ParseError::new(
                    format!("invalid decimal literal '{}'", number),
                    self.span_from(start, start_line, start_col),
                )
            })?;
            Ok(TokenKind::Decimal(value))
        } else {
            let value: i64 = number.parse().map_err(|_| {
                ParseError::new(
                    format!("invalid integer literal '{}'", number),
                    self.span_from(start, start_line, start_col),
                )
            })?;
            Ok(TokenKind::Int(value))
        }
    }

    /// Scan the remainder of an unquoted date or timestamp literal.
    /// Validation happens when the parser converts it into a value.
    fn scan_temporal(&mut self, mut text: String) -> TokenKind {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || matches!(c, '-' | ':' | 'T' | 'Z' | '.' | '+') {
                text.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        TokenKind::Temporal(text)
    }
}
