//! The path dispatcher.
//!
//! [`Dispatcher::scan`] pulls every token from its [`TokenSource`], keeps the
//! [`PathStack`] in step with the document and calls the handler registered
//! at the current path for each container begin/end and each scalar value.
//!
//! # Examples
//!
//! ```rust
//! use jsondispatch::{Dispatcher, HandlerError, JsonHandler, PathBuilder};
//!
//! #[derive(Default)]
//! struct Ids(Vec<String>);
//!
//! impl JsonHandler for Ids {
//!     fn value(&mut self, name: Option<&str>, value: Option<&str>) -> Result<(), HandlerError> {
//!         if name == Some("id") {
//!             self.0.extend(value.map(str::to_owned));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut ids = Ids::default();
//! let mut dispatcher = Dispatcher::from_str(r#"{"items": [{"id": 1}, {"id": 2}]}"#);
//! let path = PathBuilder::new().add_object(None).add_array(Some("items")).add_object(None);
//! dispatcher.register(path, &mut ids).unwrap();
//! dispatcher.scan().unwrap();
//! drop(dispatcher);
//! assert_eq!(ids.0, ["1", "2"]);
//! ```
use std::io::Read;

use tracing::{debug, trace, warn};

use crate::{
    JsonTokenReader, ParserOptions,
    error::{DispatchError, RegistrationError, StructuralError},
    handler::{HandlerRegistry, JsonHandler},
    path::{Divider, Frame, PathStack},
    token::{TokenKind, TokenSource},
};

/// Lifecycle of a [`Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Tokens remain to be dispatched.
    Scanning,
    /// The token source was exhausted with an empty path stack.
    Done,
    /// A fault aborted the scan.
    Failed,
}

/// Whether a property name is waiting for its value.
///
/// A pending name's frame is already on the path stack; the next container or
/// scalar consumes it instead of pushing an absent-name frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    NamePending,
}

/// Drives a [`TokenSource`] and dispatches path-addressed events to the
/// registered handlers.
///
/// One dispatcher processes exactly one token stream. Handlers registered
/// with a borrowed `&mut H` can be inspected again once the dispatcher is
/// dropped.
#[derive(Debug)]
pub struct Dispatcher<'h, S> {
    source: S,
    stack: PathStack,
    registry: HandlerRegistry<'h>,
    mode: Mode,
    state: ScanState,
    max_depth: Option<usize>,
}

impl<'a> Dispatcher<'_, JsonTokenReader<&'a [u8]>> {
    /// Creates a dispatcher over JSON text.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn from_str(json: &'a str) -> Self {
        Self::from_str_with_options(json, ParserOptions::default())
    }

    /// Creates a dispatcher over JSON text with the given options.
    #[must_use]
    pub fn from_str_with_options(json: &'a str, options: ParserOptions) -> Self {
        Self::from_reader_with_options(json.as_bytes(), options)
    }
}

impl<R: Read> Dispatcher<'_, JsonTokenReader<R>> {
    /// Creates a dispatcher reading JSON from `reader`.
    #[must_use]
    pub fn from_reader(reader: R) -> Self {
        Self::from_reader_with_options(reader, ParserOptions::default())
    }

    /// Creates a dispatcher reading JSON from `reader` with the given options.
    #[must_use]
    pub fn from_reader_with_options(reader: R, options: ParserOptions) -> Self {
        Self::with_options(JsonTokenReader::with_options(reader, options), options)
    }
}

impl<'h, S: TokenSource> Dispatcher<'h, S> {
    /// Creates a dispatcher over any token source.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    /// Creates a dispatcher over any token source with the given options.
    ///
    /// Only the dispatcher-level options (such as
    /// [`max_depth`](ParserOptions::max_depth)) apply here; reader options
    /// belong to the source.
    #[must_use]
    pub fn with_options(source: S, options: ParserOptions) -> Self {
        Self {
            source,
            stack: PathStack::new(),
            registry: HandlerRegistry::new(),
            mode: Mode::Idle,
            state: ScanState::Scanning,
            max_depth: options.max_depth,
        }
    }

    /// Registers `handler` for events at `path`, replacing any handler
    /// already registered there.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::EmptyPath`] if `path` is empty.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        handler: impl JsonHandler + 'h,
    ) -> Result<(), RegistrationError> {
        let path = path.into();
        if self.registry.contains(&path) {
            debug!(path, "replacing handler");
        }
        self.registry.register(path, handler)?;
        Ok(())
    }

    /// The registered handlers.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry<'h> {
        &self.registry
    }

    /// Where the dispatcher is in its lifecycle.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// The path at the current position of the scan.
    #[must_use]
    pub fn current_path(&self) -> &str {
        self.stack.current_path()
    }

    /// The frames describing the current position of the scan.
    #[must_use]
    pub fn stack(&self) -> &PathStack {
        &self.stack
    }

    /// Gives back the token source, dropping the registered handlers.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Dispatches the whole token stream.
    ///
    /// Blocks until the source is exhausted or a fault occurs. Handlers run
    /// synchronously on the calling thread. Calling `scan` again after it
    /// completed is a no-op.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Source`] when the token source reports malformed
    ///   input.
    /// - [`DispatchError::Structural`] when the stream ends inside a container
    ///   or closes a container that is not open, when the depth limit is
    ///   exceeded, or when a previous scan already failed.
    /// - [`DispatchError::Handler`] with the handler's own error.
    pub fn scan(&mut self) -> Result<(), DispatchError<S::Error>> {
        match self.state {
            ScanState::Done => return Ok(()),
            ScanState::Failed => return Err(StructuralError::ScanAborted.into()),
            ScanState::Scanning => {}
        }

        debug!(handlers = self.registry.len(), "scan started");
        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => {
                    self.state = ScanState::Done;
                    debug!("scan finished");
                    return Ok(());
                }
                Err(err) => {
                    self.state = ScanState::Failed;
                    warn!(path = self.stack.current_path(), error = %err, "scan failed");
                    return Err(err);
                }
            }
        }
    }

    /// Processes one token. Returns `false` once the stream is exhausted.
    pub(crate) fn step(&mut self) -> Result<bool, DispatchError<S::Error>> {
        let kind = self.source.peek_kind().map_err(DispatchError::Source)?;
        trace!(?kind, mode = ?self.mode, path = self.stack.current_path(), "token");

        match (self.mode, kind) {
            (_, TokenKind::BeginArray) => {
                self.source.begin_array().map_err(DispatchError::Source)?;
                self.begin_container(Divider::Array)?;
            }
            (_, TokenKind::BeginObject) => {
                self.source.begin_object().map_err(DispatchError::Source)?;
                self.begin_container(Divider::Object)?;
            }
            (Mode::Idle, TokenKind::EndArray) => {
                self.source.end_array().map_err(DispatchError::Source)?;
                self.end_container(Divider::Array)?;
            }
            (Mode::Idle, TokenKind::EndObject) => {
                self.source.end_object().map_err(DispatchError::Source)?;
                self.end_container(Divider::Object)?;
            }
            (Mode::NamePending, TokenKind::EndArray | TokenKind::EndObject) => {
                return Err(self.mismatched().into());
            }
            (Mode::Idle, TokenKind::Name) => {
                let name = self.source.next_name().map_err(DispatchError::Source)?;
                self.stack.enter_name(Some(name));
                self.mode = Mode::NamePending;
            }
            (Mode::NamePending, TokenKind::Name) => {
                return Err(self.mismatched().into());
            }
            (_, TokenKind::String) => {
                let text = self.source.next_string().map_err(DispatchError::Source)?;
                self.scalar(Some(&text))?;
            }
            (_, TokenKind::Number) => {
                let text = self.source.next_number().map_err(DispatchError::Source)?;
                self.scalar(Some(&text))?;
            }
            (_, TokenKind::Boolean) => {
                let value = self.source.next_bool().map_err(DispatchError::Source)?;
                self.scalar(Some(if value { "true" } else { "false" }))?;
            }
            (_, TokenKind::Null) => {
                self.source.next_null().map_err(DispatchError::Source)?;
                self.scalar(None)?;
            }
            (_, TokenKind::Other) => {
                self.source.skip_value().map_err(DispatchError::Source)?;
                self.claim_name();
                self.stack.leave_scalar()?;
            }
            (_, TokenKind::EndDocument) => {
                if !self.stack.is_empty() {
                    return Err(StructuralError::Unterminated {
                        open_frames: self.stack.len(),
                    }
                    .into());
                }
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Makes sure the element about to be read has a name frame: the pending
    /// one, or an absent name for array elements and roots.
    fn claim_name(&mut self) {
        if self.mode == Mode::Idle {
            self.stack.enter_name(None);
        }
        self.mode = Mode::Idle;
    }

    fn mismatched(&self) -> StructuralError {
        StructuralError::MismatchedClose {
            path: self.stack.current_path().to_owned(),
        }
    }

    fn begin_container(&mut self, divider: Divider) -> Result<(), DispatchError<S::Error>> {
        if let Some(limit) = self.max_depth {
            if self.stack.depth() >= limit {
                return Err(StructuralError::DepthLimitExceeded { limit }.into());
            }
        }

        self.claim_name();
        self.stack.enter_container(divider)?;
        if let Some(handler) = self.registry.get_mut(self.stack.current_path()) {
            handler.begin().map_err(DispatchError::Handler)?;
        }
        Ok(())
    }

    fn end_container(&mut self, divider: Divider) -> Result<(), DispatchError<S::Error>> {
        if self.stack.top() != Some(&Frame::Container(divider)) {
            return Err(self.mismatched().into());
        }
        if let Some(handler) = self.registry.get_mut(self.stack.current_path()) {
            handler.end().map_err(DispatchError::Handler)?;
        }
        self.stack.leave_container(divider)?;
        Ok(())
    }

    fn scalar(&mut self, text: Option<&str>) -> Result<(), DispatchError<S::Error>> {
        self.claim_name();
        let name = self.stack.leave_scalar()?;
        if let Some(handler) = self.registry.get_mut(self.stack.current_path()) {
            handler
                .value(name.as_deref(), text)
                .map_err(DispatchError::Handler)?;
        }
        Ok(())
    }
}
