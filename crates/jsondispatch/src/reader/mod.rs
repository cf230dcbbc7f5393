//! The bundled JSON tokenizer.
//!
//! [`JsonTokenReader`] is a pull lexer over any [`Read`]. It validates the
//! JSON grammar as it goes (RFC 8259, optionally with Unicode whitespace and
//! multiple top-level values) and implements [`TokenSource`] with one token of
//! lookahead.
//!
//! Running out of input *between* tokens is reported as
//! [`TokenKind::EndDocument`] regardless of how many containers are open; it
//! is the dispatcher's path stack that decides whether the document was
//! complete. Running out of input *inside* a token, or before the first
//! value of the document, is a syntax error.
//!
//! # Examples
//!
//! ```rust
//! use jsondispatch::{JsonTokenReader, TokenKind, TokenSource};
//!
//! let mut reader = JsonTokenReader::from_str(r#"{"id": 7}"#);
//! reader.begin_object().unwrap();
//! assert_eq!(reader.next_name().unwrap(), "id");
//! assert_eq!(reader.peek_kind().unwrap(), TokenKind::Number);
//! assert_eq!(reader.next_number().unwrap(), "7");
//! reader.end_object().unwrap();
//! assert_eq!(reader.peek_kind().unwrap(), TokenKind::EndDocument);
//! ```
#![allow(clippy::enum_glob_use)]

mod escape_buffer;
mod input;
mod literal_buffer;

use std::io::Read;

use escape_buffer::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate, is_low_surrogate};
use input::Input;
use literal_buffer::{ExpectedLiteralBuffer, Literal, Step};

use crate::{
    ParserOptions,
    error::{ReaderError, ReaderErrorKind, SyntaxError},
    token::{TokenKind, TokenSource},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name(String),
    String(String),
    Number(String),
    Boolean(bool),
    Null,
    EndDocument,
}

impl Token {
    fn kind(&self) -> TokenKind {
        match self {
            Token::BeginArray => TokenKind::BeginArray,
            Token::EndArray => TokenKind::EndArray,
            Token::BeginObject => TokenKind::BeginObject,
            Token::EndObject => TokenKind::EndObject,
            Token::Name(_) => TokenKind::Name,
            Token::String(_) => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::Boolean(_) => TokenKind::Boolean,
            Token::Null => TokenKind::Null,
            Token::EndDocument => TokenKind::EndDocument,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Array,
    Object,
}

/// Where the reader is in the JSON grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforeArrayValue { first: bool },
    AfterArrayValue,
    BeforePropertyName { first: bool },
    AfterPropertyName,
    BeforePropertyValue,
    AfterPropertyValue,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

impl NumberState {
    /// Whether a number may end in this state.
    fn is_complete(self) -> bool {
        matches!(
            self,
            NumberState::Zero
                | NumberState::DecimalInteger
                | NumberState::DecimalFraction
                | NumberState::DecimalExponentInteger
        )
    }
}

/// A pull-based JSON tokenizer over a byte stream.
#[derive(Debug)]
pub struct JsonTokenReader<R> {
    input: Input<R>,
    state: ParseState,
    scopes: Vec<Scope>,
    peeked: Option<Token>,

    scratch: Vec<u8>,
    unicode_escape_buffer: UnicodeEscapeBuffer,

    allow_unicode_whitespace: bool,
    multiple_values: bool,
}

impl<'a> JsonTokenReader<&'a [u8]> {
    /// Creates a reader over JSON text.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn from_str(json: &'a str) -> Self {
        Self::new(json.as_bytes())
    }
}

impl<R: Read> JsonTokenReader<R> {
    /// Creates a reader with default options.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParserOptions::default())
    }

    /// Creates a reader with the given options.
    #[must_use]
    pub fn with_options(reader: R, options: ParserOptions) -> Self {
        Self {
            input: Input::new(reader),
            state: ParseState::Start,
            scopes: Vec::with_capacity(16),
            peeked: None,
            scratch: Vec::new(),
            unicode_escape_buffer: UnicodeEscapeBuffer::new(),
            allow_unicode_whitespace: options.allow_unicode_whitespace,
            multiple_values: options.allow_multiple_json_values,
        }
    }

    /// Current one-based `(line, column)` of the reader.
    ///
    /// When a token has been peeked, this is the position just after it.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        self.input.position()
    }

    /// Returns the underlying reader, discarding any buffered input.
    pub fn into_inner(self) -> R {
        self.input.into_inner()
    }

    fn peek_token(&mut self) -> Result<&Token, ReaderError> {
        if self.peeked.is_none() {
            let token = self.lex()?;
            self.peeked = Some(token);
        }
        match &self.peeked {
            Some(token) => Ok(token),
            None => unreachable!("token peeked above"),
        }
    }

    /// Consumes the peeked token if it has the `expected` kind.
    fn take(&mut self, expected: TokenKind) -> Result<Token, ReaderError> {
        let found = self.peek_token()?.kind();
        if found != expected {
            return Err(self.syntax_error(SyntaxError::UnexpectedToken { expected, found }));
        }
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => unreachable!("token peeked above"),
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Lexer
    // ------------------------------------------------------------------------------------------------

    fn lex(&mut self) -> Result<Token, ReaderError> {
        use ParseState::*;

        loop {
            self.skip_whitespace()?;
            let Some(byte) = self.peek_byte()? else {
                // a document holds at least one value
                if self.state == Start {
                    return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput));
                }
                return Ok(Token::EndDocument);
            };

            match self.state {
                Start | BeforePropertyValue => return self.lex_value(byte),
                BeforeArrayValue { first } => {
                    if byte == b']' && first {
                        self.input.advance();
                        return Ok(self.close());
                    }
                    return self.lex_value(byte);
                }
                AfterArrayValue => match byte {
                    b',' => {
                        self.input.advance();
                        self.state = BeforeArrayValue { first: false };
                    }
                    b']' => {
                        self.input.advance();
                        return Ok(self.close());
                    }
                    _ => return Err(self.invalid_char()),
                },
                BeforePropertyName { first } => match byte {
                    b'"' => {
                        self.input.advance();
                        let name = self.lex_string()?;
                        self.state = AfterPropertyName;
                        return Ok(Token::Name(name));
                    }
                    b'}' if first => {
                        self.input.advance();
                        return Ok(self.close());
                    }
                    _ => return Err(self.invalid_char()),
                },
                AfterPropertyName => match byte {
                    b':' => {
                        self.input.advance();
                        self.state = BeforePropertyValue;
                    }
                    _ => return Err(self.invalid_char()),
                },
                AfterPropertyValue => match byte {
                    b',' => {
                        self.input.advance();
                        self.state = BeforePropertyName { first: false };
                    }
                    b'}' => {
                        self.input.advance();
                        return Ok(self.close());
                    }
                    _ => return Err(self.invalid_char()),
                },
                End if self.multiple_values => self.state = Start,
                End => return Err(self.syntax_error(SyntaxError::TrailingCharacters)),
            }
        }
    }

    fn lex_value(&mut self, byte: u8) -> Result<Token, ReaderError> {
        match byte {
            b'{' => {
                self.input.advance();
                self.scopes.push(Scope::Object);
                self.state = ParseState::BeforePropertyName { first: true };
                Ok(Token::BeginObject)
            }
            b'[' => {
                self.input.advance();
                self.scopes.push(Scope::Array);
                self.state = ParseState::BeforeArrayValue { first: true };
                Ok(Token::BeginArray)
            }
            b'"' => {
                self.input.advance();
                let value = self.lex_string()?;
                self.after_value();
                Ok(Token::String(value))
            }
            b't' | b'f' | b'n' => {
                let token = self.lex_literal(byte)?;
                self.after_value();
                Ok(token)
            }
            b'-' | b'0'..=b'9' => {
                let number = self.lex_number()?;
                self.after_value();
                Ok(Token::Number(number))
            }
            _ => Err(self.invalid_char()),
        }
    }

    /// Pops the innermost scope after its closing bracket was consumed.
    fn close(&mut self) -> Token {
        let token = match self.scopes.pop() {
            Some(Scope::Array) => Token::EndArray,
            Some(Scope::Object) => Token::EndObject,
            None => unreachable!("closing bracket outside of a container"),
        };
        self.after_value();
        token
    }

    fn after_value(&mut self) {
        self.state = match self.scopes.last() {
            None => ParseState::End,
            Some(Scope::Array) => ParseState::AfterArrayValue,
            Some(Scope::Object) => ParseState::AfterPropertyValue,
        };
    }

    fn skip_whitespace(&mut self) -> Result<(), ReaderError> {
        while let Some(byte) = self.peek_byte()? {
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' => self.input.advance(),
                0x0B | 0x0C | 0x80..=0xFF if self.allow_unicode_whitespace => {
                    match self.input.peek_char().map_err(|e| self.io_error(e))? {
                        Some((ch, len)) if ch.is_whitespace() => self.input.skip(len),
                        _ => break,
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn lex_literal(&mut self, first: u8) -> Result<Token, ReaderError> {
        let mut expected = ExpectedLiteralBuffer::new(first);
        self.input.advance();
        loop {
            let Some(byte) = self.peek_byte()? else {
                return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput));
            };
            match expected.step(byte) {
                Step::NeedMore => self.input.advance(),
                Step::Done(literal) => {
                    self.input.advance();
                    return Ok(match literal {
                        Literal::Null => Token::Null,
                        Literal::True => Token::Boolean(true),
                        Literal::False => Token::Boolean(false),
                    });
                }
                Step::Reject => return Err(self.invalid_char()),
            }
        }
    }

    fn lex_number(&mut self) -> Result<String, ReaderError> {
        use NumberState::*;

        let mut text = String::new();
        let mut state = match self.peek_byte()? {
            Some(b'-') => Sign,
            Some(b'0') => Zero,
            _ => DecimalInteger,
        };
        if let Some(byte) = self.peek_byte()? {
            text.push(char::from(byte));
            self.input.advance();
        }

        loop {
            let next = self.peek_byte()?;
            let accepted = match (state, next) {
                (Sign, Some(b'0')) => Some(Zero),
                (Sign, Some(b'1'..=b'9')) => Some(DecimalInteger),
                (DecimalInteger, Some(b'0'..=b'9')) => Some(DecimalInteger),
                (Zero | DecimalInteger, Some(b'.')) => Some(DecimalPoint),
                (DecimalPoint | DecimalFraction, Some(b'0'..=b'9')) => Some(DecimalFraction),
                (Zero | DecimalInteger | DecimalFraction, Some(b'e' | b'E')) => Some(DecimalExponent),
                (DecimalExponent, Some(b'+' | b'-')) => Some(DecimalExponentSign),
                (
                    DecimalExponent | DecimalExponentSign | DecimalExponentInteger,
                    Some(b'0'..=b'9'),
                ) => Some(DecimalExponentInteger),
                _ => None,
            };

            match (accepted, next) {
                (Some(next_state), Some(byte)) => {
                    text.push(char::from(byte));
                    self.input.advance();
                    state = next_state;
                }
                _ if state.is_complete() => return Ok(text),
                (_, None) => return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput)),
                (_, Some(_)) => return Err(self.invalid_char()),
            }
        }
    }

    /// Lexes string contents after the opening quote, up to and including the
    /// closing quote.
    fn lex_string(&mut self) -> Result<String, ReaderError> {
        self.scratch.clear();
        let mut pending_high: Option<u16> = None;

        loop {
            if pending_high.is_none() {
                self.input
                    .copy_while(&mut self.scratch, |b| b != b'"' && b != b'\\' && b >= 0x20)
                    .map_err(|e| self.io_error(e))?;
            }

            match self.peek_byte()? {
                None => return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput)),
                Some(b'"') if pending_high.is_none() => {
                    self.input.advance();
                    break;
                }
                Some(b'\\') => {
                    self.input.advance();
                    pending_high = self.lex_escape(pending_high)?;
                }
                Some(_) if pending_high.is_some() => {
                    let high = pending_high.unwrap_or_default();
                    return Err(self.syntax_error(SyntaxError::UnpairedSurrogate(high)));
                }
                Some(_) => return Err(self.invalid_char()),
            }
        }

        String::from_utf8(core::mem::take(&mut self.scratch))
            .map_err(|_| self.syntax_error(SyntaxError::InvalidUtf8))
    }

    /// Lexes one escape after its backslash. Returns the high surrogate still
    /// waiting for its low half, if any.
    fn lex_escape(&mut self, pending_high: Option<u16>) -> Result<Option<u16>, ReaderError> {
        let Some(byte) = self.peek_byte()? else {
            return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput));
        };
        if let Some(high) = pending_high {
            if byte != b'u' {
                return Err(self.syntax_error(SyntaxError::UnpairedSurrogate(high)));
            }
        }

        let decoded = match byte {
            b'"' | b'\\' | b'/' => byte,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                self.input.advance();
                let unit = self.lex_unicode_escape()?;
                return self.push_code_unit(pending_high, unit);
            }
            _ => return Err(self.invalid_char()),
        };
        self.input.advance();
        self.scratch.push(decoded);
        Ok(None)
    }

    fn lex_unicode_escape(&mut self) -> Result<u16, ReaderError> {
        self.unicode_escape_buffer.reset();
        loop {
            let Some(byte) = self.peek_byte()? else {
                return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput));
            };
            match self.unicode_escape_buffer.feed(byte) {
                Ok(Some(unit)) => {
                    self.input.advance();
                    return Ok(unit);
                }
                Ok(None) => self.input.advance(),
                Err(err) => return Err(self.syntax_error(err)),
            }
        }
    }

    fn push_code_unit(
        &mut self,
        pending_high: Option<u16>,
        unit: u16,
    ) -> Result<Option<u16>, ReaderError> {
        let ch = match pending_high {
            Some(high) if is_low_surrogate(unit) => combine_surrogates(high, unit),
            Some(high) => return Err(self.syntax_error(SyntaxError::UnpairedSurrogate(high))),
            None if is_high_surrogate(unit) => return Ok(Some(unit)),
            None if is_low_surrogate(unit) => {
                return Err(self.syntax_error(SyntaxError::UnpairedSurrogate(unit)));
            }
            None => char::from_u32(u32::from(unit)),
        };
        let Some(ch) = ch else {
            return Err(self.syntax_error(SyntaxError::UnpairedSurrogate(unit)));
        };
        let mut encoded = [0u8; 4];
        self.scratch
            .extend_from_slice(ch.encode_utf8(&mut encoded).as_bytes());
        Ok(None)
    }

    // ------------------------------------------------------------------------------------------------
    // Input and errors
    // ------------------------------------------------------------------------------------------------

    fn peek_byte(&mut self) -> Result<Option<u8>, ReaderError> {
        self.input.peek().map_err(|e| self.io_error(e))
    }

    fn syntax_error(&self, err: SyntaxError) -> ReaderError {
        let (line, column) = self.input.position();
        ReaderError {
            source: ReaderErrorKind::Syntax(err),
            line,
            column,
        }
    }

    fn io_error(&self, err: std::io::Error) -> ReaderError {
        let (line, column) = self.input.position();
        ReaderError {
            source: ReaderErrorKind::Io(err),
            line,
            column,
        }
    }

    fn invalid_char(&mut self) -> ReaderError {
        match self.input.peek_char() {
            Ok(Some((ch, _))) => self.syntax_error(SyntaxError::InvalidCharacter(ch)),
            Ok(None) => self.syntax_error(SyntaxError::UnexpectedEndOfInput),
            Err(err) => self.io_error(err),
        }
    }
}

impl<R: Read> TokenSource for JsonTokenReader<R> {
    type Error = ReaderError;

    fn peek_kind(&mut self) -> Result<TokenKind, ReaderError> {
        Ok(self.peek_token()?.kind())
    }

    fn begin_array(&mut self) -> Result<(), ReaderError> {
        self.take(TokenKind::BeginArray).map(|_| ())
    }

    fn end_array(&mut self) -> Result<(), ReaderError> {
        self.take(TokenKind::EndArray).map(|_| ())
    }

    fn begin_object(&mut self) -> Result<(), ReaderError> {
        self.take(TokenKind::BeginObject).map(|_| ())
    }

    fn end_object(&mut self) -> Result<(), ReaderError> {
        self.take(TokenKind::EndObject).map(|_| ())
    }

    fn next_name(&mut self) -> Result<String, ReaderError> {
        match self.take(TokenKind::Name)? {
            Token::Name(name) => Ok(name),
            _ => unreachable!("kind checked by take"),
        }
    }

    fn next_string(&mut self) -> Result<String, ReaderError> {
        match self.take(TokenKind::String)? {
            Token::String(value) => Ok(value),
            _ => unreachable!("kind checked by take"),
        }
    }

    fn next_number(&mut self) -> Result<String, ReaderError> {
        match self.take(TokenKind::Number)? {
            Token::Number(text) => Ok(text),
            _ => unreachable!("kind checked by take"),
        }
    }

    fn next_bool(&mut self) -> Result<bool, ReaderError> {
        match self.take(TokenKind::Boolean)? {
            Token::Boolean(value) => Ok(value),
            _ => unreachable!("kind checked by take"),
        }
    }

    fn next_null(&mut self) -> Result<(), ReaderError> {
        self.take(TokenKind::Null).map(|_| ())
    }

    fn skip_value(&mut self) -> Result<(), ReaderError> {
        self.peek_token()?;
        self.peeked = None;
        Ok(())
    }
}
