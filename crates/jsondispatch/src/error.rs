use thiserror::Error;

use crate::token::TokenKind;

/// Error type returned by handler callbacks.
///
/// A handler fault aborts the scan and reaches the caller of
/// [`Dispatcher::scan`](crate::Dispatcher::scan) unchanged, so callers can
/// downcast it back to their own error type.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A fault raised while dispatching a token stream.
///
/// Generic over the token source's error type `E`, which is
/// [`ReaderError`] for the bundled [`JsonTokenReader`](crate::JsonTokenReader).
#[derive(Error, Debug)]
pub enum DispatchError<E = ReaderError> {
    /// The token source could not produce a well-formed token.
    #[error("malformed input: {0}")]
    Source(#[source] E),
    /// The token stream does not describe a properly nested document.
    #[error("structural fault: {0}")]
    Structural(#[from] StructuralError),
    /// A handler callback failed.
    #[error(transparent)]
    Handler(HandlerError),
}

/// Faults in the nesting of the token stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The stream ended while containers (or a pending name) were still open.
    #[error("unexpected end of document with {open_frames} open frame(s)")]
    Unterminated {
        /// Number of frames left on the path stack.
        open_frames: usize,
    },
    /// A container end did not match the frames on top of the stack.
    #[error("container end does not match the open frames at `{path}`")]
    MismatchedClose {
        /// Path computed just before the mismatch was detected.
        path: String,
    },
    /// A container frame was pushed without a name frame below it.
    #[error("container opened without a name frame")]
    OrphanContainer,
    /// Opening another container would exceed the configured nesting limit.
    #[error("nesting depth exceeds the limit of {limit}")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// `scan` was called again after a previous scan failed.
    #[error("scan was aborted by an earlier fault")]
    ScanAborted,
}

/// Misuse of the registration API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Handlers must be registered under a non-empty path.
    #[error("handler path must not be empty")]
    EmptyPath,
}

/// An error produced by [`JsonTokenReader`](crate::JsonTokenReader).
#[derive(Error, Debug)]
#[error("{source} at {line}:{column}")]
pub struct ReaderError {
    pub(crate) source: ReaderErrorKind,
    /// One-based line of the offending input.
    pub line: usize,
    /// One-based column of the offending input.
    pub column: usize,
}

impl ReaderError {
    /// The cause of this error.
    #[must_use]
    pub fn kind(&self) -> &ReaderErrorKind {
        &self.source
    }

    /// Returns the syntax error, if this is not an I/O failure.
    #[must_use]
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match &self.source {
            ReaderErrorKind::Syntax(err) => Some(err),
            ReaderErrorKind::Io(_) => None,
        }
    }
}

/// Cause of a [`ReaderError`].
#[derive(Error, Debug)]
pub enum ReaderErrorKind {
    /// The input is not valid JSON.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// Reading from the underlying input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lexical and grammatical faults in JSON text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A character that cannot start or continue a token here.
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    /// A `\u` escape was not followed by four hexadecimal digits.
    #[error("invalid unicode escape sequence at character: '{0}'")]
    InvalidUnicodeEscape(char),
    /// A UTF-16 surrogate escape without its other half.
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),
    /// A string contains bytes that are not UTF-8.
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    /// The input ended in the middle of a token.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// Non-whitespace input after a complete document.
    #[error("trailing characters after the document")]
    TrailingCharacters,
    /// A consume call did not match the peeked token.
    #[error("expected {expected:?}, found {found:?}")]
    UnexpectedToken {
        /// The token kind the caller asked for.
        expected: TokenKind,
        /// The token kind actually present.
        found: TokenKind,
    },
}
