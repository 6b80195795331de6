use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize_with_errors, unescape, Token};
use std::ops::Range;
use tracing::debug;

/// Parser for object-literal values in JavaScript/TypeScript source
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    lex_errors: Vec<Range<usize>>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let (tokens, lex_errors) = tokenize_with_errors(source);
        Self {
            source,
            tokens,
            lex_errors,
            pos: 0,
        }
    }

    /// Parse the whole input as a single literal, optionally followed by `;`
    pub fn parse_literal_document(&mut self) -> ParseResult<Value> {
        if let Some(span) = self.lex_errors.first() {
            return Err(ParseError::lexer_error(span.clone()));
        }

        self.pos = 0;
        let value = self.parse_value()?;
        self.match_token(Token::Semicolon);

        if !self.is_at_end() {
            return Err(ParseError::unexpected_token_span(
                self.peek_span(),
                "end of input",
                Self::format_token(self.peek()),
            ));
        }

        Ok(value)
    }

    /// Find every `[export] const|let|var <name> [: Type] =` in the file.
    ///
    /// Declarations are found at any nesting depth, so locals inside
    /// functions are included. Destructuring patterns are not.
    pub fn declaration_headers(&self) -> Vec<DeclarationHeader> {
        let mut headers = Vec::new();

        for (index, (token, span)) in self.tokens.iter().enumerate() {
            let kind = match token {
                Token::Const => DeclarationKind::Const,
                Token::Let => DeclarationKind::Let,
                Token::Var => DeclarationKind::Var,
                _ => continue,
            };

            let Some((Token::Ident(name), name_span)) = self.tokens.get(index + 1) else {
                continue;
            };

            let mut next = index + 2;
            if matches!(self.tokens.get(next), Some((Token::Colon, _))) {
                next = self.type_end(next + 1, true);
            }
            if !matches!(self.tokens.get(next), Some((Token::Equals, _))) {
                continue;
            }

            let exported = index > 0 && matches!(self.tokens[index - 1].0, Token::Export);
            let start = if exported {
                self.tokens[index - 1].1.start
            } else {
                span.start
            };

            headers.push(DeclarationHeader {
                kind,
                name: name.to_string(),
                exported,
                value_token: next + 1,
                span: Span::new(start, name_span.end),
            });
        }

        headers
    }

    /// Parse the initializer of a declaration found by [`Parser::declaration_headers`]
    pub fn parse_declaration(&mut self, header: &DeclarationHeader) -> ParseResult<Declaration> {
        self.pos = header.value_token;
        let value_start = self.peek_span().start;

        let value = self.parse_value()?;
        let end = self.current_span().end;

        if let Some(span) = self
            .lex_errors
            .iter()
            .find(|span| span.start < end && span.end > value_start)
        {
            return Err(ParseError::lexer_error(span.clone()));
        }

        debug!(
            declaration = %header.name,
            kind = value.kind(),
            "parsed declaration at {}..{}",
            header.span.start,
            end
        );

        Ok(Declaration {
            kind: header.kind,
            name: header.name.clone(),
            exported: header.exported,
            value,
            span: Span::new(header.span.start, end),
        })
    }

    /// Parse a value, falling back to a raw expression when a literal is
    /// followed by anything other than the end of the value
    fn parse_value(&mut self) -> ParseResult<Value> {
        let start = self.pos;
        let value = self.parse_primary()?;
        self.skip_type_assertions();

        if self.at_value_end() || !self.continues_expression() {
            // Anything else is left for the caller to report
            return Ok(value);
        }

        // e.g. `'a' + 'b'` or `[1, 2].map(f)`
        self.pos = start;
        self.parse_raw_expression()
    }

    /// Whether the current token extends the preceding operand into a larger expression
    fn continues_expression(&self) -> bool {
        matches!(
            self.peek(),
            Some((
                Token::Dot
                    | Token::Operator(_)
                    | Token::Plus
                    | Token::Minus
                    | Token::LParen
                    | Token::LBracket
                    | Token::Arrow
                    | Token::Equals
                    | Token::LAngle
                    | Token::RAngle
                    | Token::Template(_),
                _
            ))
        )
    }

    fn parse_primary(&mut self) -> ParseResult<Value> {
        let Some((token, span)) = self.peek().cloned() else {
            return Err(ParseError::unexpected_eof(self.source.len(), "value"));
        };

        match token {
            Token::String(raw) => {
                self.advance();
                let text = unescape(raw).map_err(|e| ParseError::invalid_syntax_span(span, e))?;
                Ok(Value::String(text))
            }
            Token::Template(raw) => {
                self.advance();
                if raw.contains("${") {
                    Ok(Value::Expr(raw.to_string()))
                } else {
                    let text =
                        unescape(raw).map_err(|e| ParseError::invalid_syntax_span(span, e))?;
                    Ok(Value::String(text))
                }
            }
            Token::Number(raw) => {
                self.advance();
                Ok(Value::Number(parse_number(raw, false, span)?))
            }
            Token::Minus | Token::Plus => match self.peek_ahead(1) {
                Some((Token::Number(raw), number_span)) => {
                    let negative = matches!(token, Token::Minus);
                    let raw = *raw;
                    let span = span.start..number_span.end;
                    self.advance();
                    self.advance();
                    Ok(Value::Number(parse_number(raw, negative, span)?))
                }
                _ => self.parse_raw_expression(),
            },
            Token::True => {
                self.advance();
                Ok(Value::Bool(true))
            }
            Token::False => {
                self.advance();
                Ok(Value::Bool(false))
            }
            Token::Null | Token::Undefined => {
                self.advance();
                Ok(Value::Null)
            }
            Token::LBracket => self.parse_list(),
            Token::LBrace => self.parse_object(),
            Token::Ident("JSON") => self.parse_json_stringify(),
            _ => self.parse_raw_expression(),
        }
    }

    /// Parse an array literal
    fn parse_list(&mut self) -> ParseResult<Value> {
        self.expect(Token::LBracket)?;
        let mut items = Vec::new();

        loop {
            if self.check(Token::RBracket) {
                break;
            }

            if self.check(Token::Comma) {
                // Hole, as in `[1, , 2]`
                self.advance();
                items.push(Value::Null);
                continue;
            }

            if self.check(Token::Spread) {
                let start = self.peek_span().start;
                self.advance();
                self.parse_value()?;
                let end = self.current_span().end;
                items.push(Value::Expr(self.source[start..end].to_string()));
            } else {
                items.push(self.parse_value()?);
            }

            if !self.match_token(Token::Comma) && !self.check(Token::RBracket) {
                return Err(self.unexpected("',' or ']'"));
            }
        }

        self.expect(Token::RBracket)?;
        Ok(Value::List(items))
    }

    /// Parse an object literal
    fn parse_object(&mut self) -> ParseResult<Value> {
        self.expect(Token::LBrace)?;
        let mut object = Object::default();

        while !self.check(Token::RBrace) {
            let key_span = self.peek_span();

            if self.check(Token::Spread) {
                return Err(ParseError::invalid_syntax_span(
                    key_span,
                    "spread properties are not supported",
                ));
            }

            let (key, shorthand_allowed) = self.parse_property_key()?;

            let value = if self.match_token(Token::Colon) {
                self.parse_value()?
            } else if shorthand_allowed
                && (self.check(Token::Comma) || self.check(Token::RBrace))
            {
                // `{ name }` refers to a variable we cannot see
                Value::Expr(key.clone())
            } else if self.check(Token::LParen) {
                return Err(ParseError::invalid_syntax_span(
                    key_span,
                    format!("method '{}' is not supported in data literals", key),
                ));
            } else {
                return Err(self.unexpected("':'"));
            };

            let end = self.current_span().end;
            object.properties.push(Property {
                key,
                value,
                span: Span::new(key_span.start, end),
            });

            if !self.match_token(Token::Comma) && !self.check(Token::RBrace) {
                return Err(self.unexpected("',' or '}'"));
            }
        }

        self.expect(Token::RBrace)?;
        Ok(Value::Object(object))
    }

    /// Returns the key and whether it may be used as a shorthand property
    fn parse_property_key(&mut self) -> ParseResult<(String, bool)> {
        let Some((token, span)) = self.peek().cloned() else {
            return Err(ParseError::unexpected_eof(self.source.len(), "property key"));
        };

        let key = match token {
            Token::Ident(name) => (name.to_string(), true),
            Token::String(raw) => (
                unescape(raw).map_err(|e| ParseError::invalid_syntax_span(span.clone(), e))?,
                false,
            ),
            Token::Number(raw) => (parse_number(raw, false, span.clone())?.to_string(), false),
            Token::LBracket => {
                return Err(ParseError::invalid_syntax_span(
                    span,
                    "computed property keys are not supported",
                ));
            }
            ref other => match other.keyword_text() {
                Some(keyword) => (keyword.to_string(), false),
                None => return Err(self.unexpected("property key")),
            },
        };

        self.advance();
        Ok(key)
    }

    /// `JSON.stringify(<literal>)` evaluates to the literal's compact JSON text
    fn parse_json_stringify(&mut self) -> ParseResult<Value> {
        let start = self.pos;
        let is_call = matches!(self.peek_ahead(1), Some((Token::Dot, _)))
            && matches!(self.peek_ahead(2), Some((Token::Ident("stringify"), _)))
            && matches!(self.peek_ahead(3), Some((Token::LParen, _)));

        if is_call {
            self.pos += 4;
            let argument = self.parse_value()?;

            if self.match_token(Token::RParen) && argument.is_resolved() {
                let json = serde_json::to_string(&argument.to_json()).map_err(|e| {
                    ParseError::invalid_syntax_span(self.current_span(), e.to_string())
                })?;
                return Ok(Value::String(json));
            }
        }

        // Extra arguments, unresolved input, or some other `JSON.*` member
        self.pos = start;
        self.parse_raw_expression()
    }

    /// Capture an arbitrary expression as source text
    fn parse_raw_expression(&mut self) -> ParseResult<Value> {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some((token, _)) = self.peek() {
            if depth == 0 {
                if matches!(
                    token,
                    Token::Comma | Token::Semicolon | Token::RParen | Token::RBracket | Token::RBrace
                ) {
                    break;
                }
                if self.pos > start && self.ends_statement(self.pos) {
                    break;
                }
            }

            match token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => depth -= 1,
                _ => {}
            }
            self.advance();
        }

        if self.pos == start {
            return Err(self.unexpected("value"));
        }

        let from = self.tokens[start].1.start;
        let to = self.current_span().end;
        Ok(Value::Expr(self.source[from..to].to_string()))
    }

    /// Skip `as T` and `satisfies T` after a value
    fn skip_type_assertions(&mut self) {
        while self.check(Token::As) || self.check(Token::Ident("satisfies")) {
            self.advance();
            self.pos = self.type_end(self.pos, false);
        }
    }

    /// Index of the first token after a type starting at `from`.
    ///
    /// Stops at a structural terminator at depth 0, at `=` when
    /// `stop_at_equals` is set, or where a line break ends the statement.
    fn type_end(&self, from: usize, stop_at_equals: bool) -> usize {
        let mut index = from;
        let mut depth = 0usize;

        while let Some((token, _)) = self.tokens.get(index) {
            if depth == 0 {
                let terminator = matches!(
                    token,
                    Token::Comma | Token::Semicolon | Token::RParen | Token::RBracket | Token::RBrace
                ) || (stop_at_equals && matches!(token, Token::Equals));
                if terminator || (index > from && self.ends_statement(index)) {
                    break;
                }
            }

            match token {
                Token::LParen | Token::LBracket | Token::LBrace | Token::LAngle => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace | Token::RAngle => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            index += 1;
        }

        index
    }

    /// Whether the current token closes the value being parsed
    fn at_value_end(&self) -> bool {
        match self.peek() {
            None => true,
            Some((token, _)) => {
                matches!(
                    token,
                    Token::Comma | Token::Semicolon | Token::RParen | Token::RBracket | Token::RBrace
                ) || self.ends_statement(self.pos)
            }
        }
    }

    /// Automatic semicolon insertion, roughly: a line break before `index`
    /// ends the statement unless an operator joins the two lines
    fn ends_statement(&self, index: usize) -> bool {
        if index == 0 || index >= self.tokens.len() {
            return false;
        }

        let (previous, previous_span) = &self.tokens[index - 1];
        let (next, next_span) = &self.tokens[index];

        if !self.source[previous_span.end..next_span.start].contains('\n') {
            return false;
        }

        let joins = |token: &Token| {
            matches!(
                token,
                Token::Dot
                    | Token::Operator(_)
                    | Token::Plus
                    | Token::Minus
                    | Token::Equals
                    | Token::Arrow
                    | Token::As
                    | Token::Colon
                    | Token::LAngle
                    | Token::RAngle
            )
        };

        !(joins(previous) || joins(next) || matches!(next, Token::Ident("satisfies")))
    }

    // Helper methods

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn peek_ahead(&self, offset: usize) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: Token) -> bool {
        match (self.peek(), &token) {
            // Identifiers compare by name
            (Some((Token::Ident(a), _)), Token::Ident(b)) => a == b,
            (Some((t, _)), _) => std::mem::discriminant(t) == std::mem::discriminant(&token),
            (None, _) => false,
        }
    }

    fn match_token(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> ParseResult<()> {
        if self.check(token.clone()) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(token.to_string()))
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        match self.peek() {
            None => ParseError::unexpected_eof(self.source.len(), expected),
            found => ParseError::unexpected_token_span(
                self.peek_span(),
                expected,
                Self::format_token(found),
            ),
        }
    }

    /// Get the span of the current token (the one we just consumed)
    fn current_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|(_, span)| span.clone())
            .unwrap_or(0..0)
    }

    /// Get the span of the next token (the one we're about to consume)
    fn peek_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.clone())
            .unwrap_or_else(|| {
                // If we're at EOF, use the end of the last token
                let end = self.tokens.last().map(|(_, span)| span.end).unwrap_or(0);
                end..end
            })
    }

    /// Format a token for display in error messages
    fn format_token(token: Option<&(Token, Range<usize>)>) -> String {
        match token {
            None => "end of file".to_string(),
            Some((token, _)) => token.to_string(),
        }
    }
}

/// Parse a numeric literal. Integral values within the exact `f64` range
/// become [`Number::Int`], as JS has a single number type.
fn parse_number(raw: &str, negative: bool, span: Range<usize>) -> ParseResult<Number> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;

    let digits = raw.replace('_', "");
    let sign = if negative { -1 } else { 1 };

    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        return match i64::from_str_radix(hex, 16) {
            Ok(v) => Ok(Number::Int(sign * v)),
            Err(_) => u128::from_str_radix(hex, 16)
                .map(|v| Number::Float(sign as f64 * v as f64))
                .map_err(|e| ParseError::invalid_syntax_span(span, e.to_string())),
        };
    }

    if !digits.contains(['.', 'e', 'E']) {
        if let Ok(v) = digits.parse::<i64>() {
            return Ok(Number::Int(sign * v));
        }
    }

    let value = digits
        .parse::<f64>()
        .map_err(|e| ParseError::invalid_syntax_span(span.clone(), e.to_string()))?
        * sign as f64;

    if !value.is_finite() {
        return Err(ParseError::invalid_syntax_span(span, "number out of range"));
    }

    if value.fract() == 0.0 && value.abs() <= MAX_SAFE {
        Ok(Number::Int(value as i64))
    } else {
        Ok(Number::Float(value))
    }
}

/// Parse a source string that holds exactly one literal
pub fn parse_literal(source: &str) -> ParseResult<Value> {
    Parser::new(source).parse_literal_document()
}

/// Parse the first declaration named `name`; `Ok(None)` when there is none
pub fn parse_declaration(source: &str, name: &str) -> ParseResult<Option<Declaration>> {
    let mut parser = Parser::new(source);
    let Some(header) = parser
        .declaration_headers()
        .into_iter()
        .find(|header| header.name == name)
    else {
        debug!(declaration = name, "no declaration found");
        return Ok(None);
    };

    parser.parse_declaration(&header).map(Some)
}

/// Parse every declaration in the file, each independently
pub fn parse_declarations(source: &str) -> Vec<ParseResult<Declaration>> {
    let mut parser = Parser::new(source);
    parser
        .declaration_headers()
        .iter()
        .map(|header| parser.parse_declaration(header))
        .collect()
}
