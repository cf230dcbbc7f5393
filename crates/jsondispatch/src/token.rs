//! The token source contract consumed by the dispatcher.
//!
//! A [`TokenSource`] is a pull-based JSON lexer with one token of lookahead:
//! [`peek_kind`](TokenSource::peek_kind) reports what comes next without
//! consuming it, and the `begin_*`/`end_*`/`next_*` methods advance past it.
//! The bundled [`JsonTokenReader`](crate::JsonTokenReader) implements it over
//! any [`std::io::Read`], and other lexers can be adapted by implementing this
//! trait.

/// The kind of the next token in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// A property name inside an object.
    Name,
    /// A string value.
    String,
    /// A number value.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// The stream is exhausted.
    EndDocument,
    /// Any token a source cannot classify as one of the kinds above.
    ///
    /// The dispatcher skips these without invoking a handler.
    Other,
}

impl TokenKind {
    /// Returns `true` for string, number, boolean and null tokens.
    #[must_use]
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::Number | TokenKind::Boolean | TokenKind::Null
        )
    }
}

/// A pull-based source of JSON tokens.
///
/// Implementations must report malformed input through `Err` rather than
/// returning an ambiguous token. Calling a consume method that does not match
/// the peeked kind is an error as well.
pub trait TokenSource {
    /// The fault type raised on malformed input.
    type Error: std::error::Error + 'static;

    /// Returns the kind of the next token without consuming it.
    ///
    /// # Errors
    ///
    /// Fails when the next token cannot be read.
    fn peek_kind(&mut self) -> Result<TokenKind, Self::Error>;

    /// Consumes a [`TokenKind::BeginArray`] token.
    ///
    /// # Errors
    ///
    /// Fails when the next token is not the start of an array.
    fn begin_array(&mut self) -> Result<(), Self::Error>;

    /// Consumes a [`TokenKind::EndArray`] token.
    ///
    /// # Errors
    ///
    /// Fails when the next token is not the end of an array.
    fn end_array(&mut self) -> Result<(), Self::Error>;

    /// Consumes a [`TokenKind::BeginObject`] token.
    ///
    /// # Errors
    ///
    /// Fails when the next token is not the start of an object.
    fn begin_object(&mut self) -> Result<(), Self::Error>;

    /// Consumes a [`TokenKind::EndObject`] token.
    ///
    /// # Errors
    ///
    /// Fails when the next token is not the end of an object.
    fn end_object(&mut self) -> Result<(), Self::Error>;

    /// Consumes a [`TokenKind::Name`] token and returns the property name.
    ///
    /// # Errors
    ///
    /// Fails when the next token is not a property name.
    fn next_name(&mut self) -> Result<String, Self::Error>;

    /// Consumes a [`TokenKind::String`] token and returns its decoded text.
    ///
    /// # Errors
    ///
    /// Fails when the next token is not a string.
    fn next_string(&mut self) -> Result<String, Self::Error>;

    /// Consumes a [`TokenKind::Number`] token and returns its source text.
    ///
    /// # Errors
    ///
    /// Fails when the next token is not a number.
    fn next_number(&mut self) -> Result<String, Self::Error>;

    /// Consumes a [`TokenKind::Boolean`] token.
    ///
    /// # Errors
    ///
    /// Fails when the next token is not a boolean.
    fn next_bool(&mut self) -> Result<bool, Self::Error>;

    /// Consumes a [`TokenKind::Null`] token.
    ///
    /// # Errors
    ///
    /// Fails when the next token is not `null`.
    fn next_null(&mut self) -> Result<(), Self::Error>;

    /// Consumes the next token, whatever its kind.
    ///
    /// Used for [`TokenKind::Other`] tokens, which carry no dispatchable
    /// value.
    ///
    /// # Errors
    ///
    /// Fails when the next token cannot be read.
    fn skip_value(&mut self) -> Result<(), Self::Error>;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    type Error = S::Error;

    fn peek_kind(&mut self) -> Result<TokenKind, Self::Error> {
        (**self).peek_kind()
    }

    fn begin_array(&mut self) -> Result<(), Self::Error> {
        (**self).begin_array()
    }

    fn end_array(&mut self) -> Result<(), Self::Error> {
        (**self).end_array()
    }

    fn begin_object(&mut self) -> Result<(), Self::Error> {
        (**self).begin_object()
    }

    fn end_object(&mut self) -> Result<(), Self::Error> {
        (**self).end_object()
    }

    fn next_name(&mut self) -> Result<String, Self::Error> {
        (**self).next_name()
    }

    fn next_string(&mut self) -> Result<String, Self::Error> {
        (**self).next_string()
    }

    fn next_number(&mut self) -> Result<String, Self::Error> {
        (**self).next_number()
    }

    fn next_bool(&mut self) -> Result<bool, Self::Error> {
        (**self).next_bool()
    }

    fn next_null(&mut self) -> Result<(), Self::Error> {
        (**self).next_null()
    }

    fn skip_value(&mut self) -> Result<(), Self::Error> {
        (**self).skip_value()
    }
}
