//! Recursive descent JSON parser.
//!
//! The document root must be an object. Parsing stops at the first error and
//! yields no partial document; [`Parser::error`] keeps that error around for
//! callers that only look at the parser afterwards.
//!
//! Supported grammar, deliberately narrower than RFC 8259: numbers are
//! unsigned digit runs with an optional fraction, strings know the escapes
//! `\" \\ \/ \b \f \n \r \t`, and the literals are `true`, `false`, `null`.
//! Anything after the root object's closing brace is ignored.

use tracing::debug;

use super::lexer::Lexer;
use super::limits::Limits;
use super::types::{Array, Object, Value};
use crate::error::{ErrorCode, ParseResult};

/// The container a value is being read into, with its opening offset.
#[derive(Debug, Clone, Copy)]
enum Container {
    Object(u64),
    Array(u64),
}

impl Container {
    /// Error for running out of input inside this container.
    fn unterminated(self) -> ErrorCode {
        match self {
            Container::Object(open) => ErrorCode::E103_UnterminatedObject(open),
            Container::Array(open) => ErrorCode::E105_UnterminatedArray(open),
        }
    }
}

/// JSON parser over a borrowed input buffer.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    limits: Limits,
    depth: u64,
    error: Option<ErrorCode>,
}

impl<'a> Parser<'a> {
    /// Create a parser with [`Limits::standard`].
    pub fn new(input: &'a str) -> Self {
        Self::with_limits(input, Limits::standard())
    }

    /// Create a parser with custom limits.
    pub fn with_limits(input: &'a str, limits: Limits) -> Self {
        Self {
            lexer: Lexer::new(input),
            limits,
            depth: 0,
            error: None,
        }
    }

    /// Parse the input and return the root object.
    ///
    /// Once a parse has failed, every later call returns the same error.
    pub fn parse(&mut self) -> ParseResult<Object> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        debug!(bytes = self.lexer.len(), "parsing document");
        match self.parse_document() {
            Ok(object) => {
                debug!(members = object.len(), "parsed document");
                Ok(object)
            }
            Err(error) => {
                debug!(code = error.code(), %error, "parse failed");
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// The error that made [`Parser::parse`] fail, if any.
    pub fn error(&self) -> Option<&ErrorCode> {
        self.error.as_ref()
    }

    /// Returns true if a parse has failed.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    fn parse_document(&mut self) -> ParseResult<Object> {
        let size = self.lexer.len() as u64;
        if size > self.limits.max_input_size {
            return Err(ErrorCode::E110_InputTooLarge(
                size,
                self.limits.max_input_size,
            ));
        }

        self.lexer.reset();
        self.depth = 0;

        self.lexer.skip_whitespace();
        if !self.lexer.eat(b'{') {
            return Err(ErrorCode::E100_MissingRoot);
        }
        self.parse_object()
    }

    /// Check nesting depth (E111) on entering an object or array.
    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        let limit = self.limits.nesting_depth();
        if self.depth > limit {
            return Err(ErrorCode::E111_NestingTooDeep(self.depth, limit));
        }
        Ok(())
    }

    /// Parse an object whose opening brace was just consumed.
    fn parse_object(&mut self) -> ParseResult<Object> {
        let open = self.lexer.position().saturating_sub(1) as u64;
        self.enter()?;

        let mut object = Object::new();

        loop {
            self.lexer.skip_whitespace();
            match self.lexer.peek() {
                None => return Err(ErrorCode::E103_UnterminatedObject(open)),
                Some(b'}') => {
                    self.lexer.advance();
                    break;
                }
                Some(b'"') => {
                    self.lexer.advance();
                    let (key, value) = self.parse_record(open)?;

                    if self.limits.reject_duplicate_keys && object.contains_key(&key) {
                        return Err(ErrorCode::E112_DuplicateKey(key));
                    }
                    object.insert(key, value);

                    self.validate_end(open)?;
                }
                Some(_) => return Err(self.unexpected_character()),
            }
        }

        self.depth -= 1;
        Ok(object)
    }

    /// Parse `key: value` after the key's opening quote.
    fn parse_record(&mut self, open: u64) -> ParseResult<(String, Value)> {
        let key = self.lexer.read_string(self.limits.escape_keys)?;

        self.lexer.skip_whitespace();
        match self.lexer.peek() {
            Some(b':') => {
                self.lexer.advance();
            }
            None => return Err(ErrorCode::E103_UnterminatedObject(open)),
            Some(_) => return Err(self.unexpected_character()),
        }

        let value = self.parse_value(Container::Object(open))?;
        Ok((key, value))
    }

    /// After a record: either `,` followed by the next key, or `}`.
    ///
    /// Neither separator is consumed past the `,`; the object loop reads the
    /// quote or closing brace itself.
    fn validate_end(&mut self, open: u64) -> ParseResult<()> {
        self.lexer.skip_whitespace();
        match self.lexer.peek() {
            Some(b',') => {
                self.lexer.advance();
                self.lexer.skip_whitespace();
                match self.lexer.peek() {
                    Some(b'"') => Ok(()),
                    None => Err(ErrorCode::E103_UnterminatedObject(open)),
                    Some(_) => Err(self.invalid_character()),
                }
            }
            Some(b'}') => Ok(()),
            None => Err(ErrorCode::E103_UnterminatedObject(open)),
            Some(_) => Err(self.invalid_character()),
        }
    }

    /// Parse a single JSON value, dispatching on its first byte.
    fn parse_value(&mut self, container: Container) -> ParseResult<Value> {
        self.lexer.skip_whitespace();
        self.lexer.mark();

        match self.lexer.peek() {
            None => Err(container.unterminated()),
            Some(b'"') => {
                self.lexer.advance();
                Ok(Value::String(self.lexer.read_string(true)?))
            }
            Some(b'[') => {
                self.lexer.advance();
                Ok(Value::Array(self.parse_array()?))
            }
            Some(b'{') => {
                self.lexer.advance();
                Ok(Value::Object(self.parse_object()?))
            }
            Some(b'0'..=b'9') => {
                self.lexer.advance();
                Ok(Value::Number(self.lexer.read_number()?))
            }
            Some(b't' | b'f') => self.parse_bool().map(Value::Bool),
            Some(b'n') => {
                let offset = self.lexer.position() as u64;
                self.lexer.advance();
                if self.lexer.expect_bytes(b"ull") {
                    Ok(Value::Null)
                } else {
                    Err(ErrorCode::E107_InvalidKeyword(offset))
                }
            }
            Some(_) => Err(self.unexpected_character()),
        }
    }

    /// Parse `true` or `false` by its lead byte and fixed suffix.
    fn parse_bool(&mut self) -> ParseResult<bool> {
        let offset = self.lexer.position() as u64;
        match self.lexer.advance() {
            Some(b't') if self.lexer.expect_bytes(b"rue") => Ok(true),
            Some(b'f') if self.lexer.expect_bytes(b"alse") => Ok(false),
            _ => Err(ErrorCode::E107_InvalidKeyword(offset)),
        }
    }

    /// Parse an array whose opening bracket was just consumed.
    ///
    /// A comma right before the closing bracket is tolerated.
    fn parse_array(&mut self) -> ParseResult<Array> {
        let open = self.lexer.position().saturating_sub(1) as u64;
        self.enter()?;

        let mut array = Array::new();

        self.lexer.skip_whitespace();
        if !self.lexer.eat(b']') {
            loop {
                array.push(self.parse_value(Container::Array(open))?);

                self.lexer.skip_whitespace();
                if !self.lexer.eat(b',') {
                    break;
                }
                self.lexer.skip_whitespace();
                if self.lexer.peek() == Some(b']') {
                    break;
                }
            }

            if !self.lexer.eat(b']') {
                return Err(ErrorCode::E105_UnterminatedArray(open));
            }
        }

        self.depth -= 1;
        Ok(array)
    }

    fn unexpected_character(&self) -> ErrorCode {
        let (found, offset) = self.found();
        ErrorCode::E101_UnexpectedCharacter(found, offset)
    }

    fn invalid_character(&self) -> ErrorCode {
        let (found, offset) = self.found();
        ErrorCode::E102_InvalidCharacter(found, offset)
    }

    fn found(&self) -> (char, u64) {
        (
            self.lexer.current_char().unwrap_or(char::REPLACEMENT_CHARACTER),
            self.lexer.position() as u64,
        )
    }
}

/// Parse a JSON document with standard limits.
pub fn parse(input: &str) -> ParseResult<Object> {
    parse_with_limits(input, Limits::standard())
}

/// Parse a JSON document with custom limits.
pub fn parse_with_limits(input: &str, limits: Limits) -> ParseResult<Object> {
    Parser::with_limits(input, limits).parse()
}
