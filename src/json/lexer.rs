//! Byte cursor over JSON source text.
//!
//! The parser drives the lexer one byte at a time: it peeks at the lead byte,
//! decides what comes next, and asks the lexer to read the rest of a string
//! or number. The lexer owns the cursor offset and the start marker of the
//! token being scanned.
//!
//! Offsets in errors are byte offsets into the input.

use crate::error::{ErrorCode, ParseResult};

/// Cursor over the input with token readers.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Input length in bytes.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Returns true if the input has no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Move the cursor back to the beginning of the input.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.start = 0;
    }

    /// Get the current position in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true once every byte has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at the current byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// The full character at the cursor, for error reporting.
    pub fn current_char(&self) -> Option<char> {
        self.input.get(self.pos..)?.chars().next()
    }

    /// Consume and return the current byte.
    pub fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    /// Consume the current byte if it equals `expected`.
    pub fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `suffix` byte by byte, stopping at the first mismatch.
    ///
    /// Returns true if the whole suffix matched.
    pub fn expect_bytes(&mut self, suffix: &[u8]) -> bool {
        suffix.iter().all(|&b| self.eat(b))
    }

    /// Skip whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Mark the current position as the start of the next token.
    pub fn mark(&mut self) {
        self.start = self.pos;
    }

    /// Read the body of a string whose opening quote was just consumed.
    ///
    /// With `allow_escaping`, a backslash introduces one of the escapes
    /// `\" \\ \/ \b \f \n \r \t`. Without it, backslashes are copied as-is
    /// and the first `"` always closes the string.
    pub fn read_string(&mut self, allow_escaping: bool) -> ParseResult<String> {
        let open = self.pos.saturating_sub(1) as u64;
        let mut result = String::new();
        let mut run_start = self.pos;

        loop {
            match self.peek() {
                None => return Err(ErrorCode::E104_UnterminatedString(open)),
                Some(b'"') => {
                    result.push_str(&self.input[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(result);
                }
                Some(b'\\') if allow_escaping => {
                    result.push_str(&self.input[run_start..self.pos]);
                    self.pos += 1;
                    result.push(self.read_escape_sequence(open)?);
                    run_start = self.pos;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Read the character after a backslash.
    fn read_escape_sequence(&mut self, open: u64) -> ParseResult<char> {
        let escaped = match self.peek() {
            None => return Err(ErrorCode::E104_UnterminatedString(open)),
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\x08',
            Some(b'f') => '\x0C',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(_) => {
                let found = self.current_char().unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(ErrorCode::E106_IllegalEscape(found, self.pos as u64));
            }
        };
        self.pos += 1;
        Ok(escaped)
    }

    /// Read a number whose first digit was consumed after [`Lexer::mark`].
    ///
    /// Grammar: `digit+ ('.' digit*)?`. No sign and no exponent. A digit run
    /// too large for `f64` fails with E113 instead of becoming infinity.
    pub fn read_number(&mut self) -> ParseResult<f64> {
        self.skip_digits();
        if self.eat(b'.') {
            self.skip_digits();
        }

        let invalid = ErrorCode::E113_InvalidNumber(self.start as u64);
        match self.input[self.start..self.pos].parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(invalid),
        }
    }

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexer(input: &str) -> Lexer<'_> {
        Lexer::new(input)
    }

    #[test]
    fn test_skip_whitespace() {
        let mut lex = lexer(" \t\r\n x");
        lex.skip_whitespace();
        assert_eq!(lex.peek(), Some(b'x'));
        assert_eq!(lex.position(), 5);
    }

    #[test]
    fn test_read_string_with_escapes() {
        let mut lex = lexer(r#""a\"b\\c\/d\n\t" rest"#);
        lex.advance();
        assert_eq!(lex.read_string(true).unwrap(), "a\"b\\c/d\n\t");
        assert_eq!(lex.peek(), Some(b' '));
    }

    #[test]
    fn test_read_string_without_escaping() {
        let mut lex = lexer(r#""a\nb""#);
        lex.advance();
        assert_eq!(lex.read_string(false).unwrap(), "a\\nb");
        assert!(lex.at_end());
    }

    #[test]
    fn test_read_string_keeps_multibyte_text() {
        let mut lex = lexer("\"h\u{e9}llo \u{1F600}\"");
        lex.advance();
        assert_eq!(lex.read_string(true).unwrap(), "h\u{e9}llo \u{1F600}");
    }

    #[test]
    fn test_illegal_escape() {
        let mut lex = lexer(r#""a\qb""#);
        lex.advance();
        assert_eq!(
            lex.read_string(true),
            Err(ErrorCode::E106_IllegalEscape('q', 3))
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut lex = lexer(r#""abc"#);
        lex.advance();
        assert_eq!(
            lex.read_string(true),
            Err(ErrorCode::E104_UnterminatedString(0))
        );
    }

    #[test]
    fn test_read_number() {
        let mut lex = lexer("12.50,");
        lex.mark();
        lex.advance();
        assert_eq!(lex.read_number().unwrap(), 12.5);
        assert_eq!(lex.peek(), Some(b','));
    }

    #[test]
    fn test_read_number_stops_at_second_dot() {
        let mut lex = lexer("1.2.3");
        lex.mark();
        lex.advance();
        assert_eq!(lex.read_number().unwrap(), 1.2);
        assert_eq!(lex.peek(), Some(b'.'));
    }

    #[test]
    fn test_read_number_out_of_range() {
        let digits = "9".repeat(400);
        let mut lex = lexer(&digits);
        lex.mark();
        lex.advance();
        assert_eq!(lex.read_number(), Err(ErrorCode::E113_InvalidNumber(0)));
    }

    #[test]
    fn test_read_number_large_but_finite() {
        let digits = "9".repeat(300);
        let mut lex = lexer(&digits);
        lex.mark();
        lex.advance();
        assert!(lex.read_number().unwrap().is_finite());
    }

    #[test]
    fn test_expect_bytes_stops_at_mismatch() {
        let mut lex = lexer("rux");
        assert!(!lex.expect_bytes(b"rue"));
        assert_eq!(lex.peek(), Some(b'x'));
    }

    #[test]
    fn test_reset_rewinds_cursor() {
        let mut lex = lexer("{}");
        lex.advance();
        lex.advance();
        assert!(lex.at_end());
        lex.reset();
        assert_eq!(lex.position(), 0);
        assert_eq!(lex.len(), 2);
        assert!(!lex.is_empty());
        assert!(lexer("").is_empty());
    }
}
