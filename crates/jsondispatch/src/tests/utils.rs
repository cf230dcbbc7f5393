use std::{
    cell::RefCell,
    collections::VecDeque,
    io,
    rc::Rc,
    sync::{Arc, Mutex},
};

use crate::{HandlerError, JsonHandler, TokenKind, TokenSource};

/// Shared, ordered log of handler callbacks.
pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn take(log: &Log) -> Vec<String> {
    core::mem::take(&mut *log.borrow_mut())
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a debug-level subscriber and returns the formatted events.
pub fn captured_events(f: impl FnOnce()) -> String {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = capture.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

/// Appends one line per callback to a shared log, prefixed with `label`.
pub struct Recorder {
    label: &'static str,
    log: Log,
}

impl Recorder {
    pub fn new(label: &'static str, log: &Log) -> Self {
        Self {
            label,
            log: Rc::clone(log),
        }
    }

    fn push(&self, line: String) {
        let line = if self.label.is_empty() {
            line
        } else {
            format!("{} {line}", self.label)
        };
        self.log.borrow_mut().push(line);
    }
}

impl JsonHandler for Recorder {
    fn begin(&mut self) -> Result<(), HandlerError> {
        self.push("begin".to_string());
        Ok(())
    }

    fn end(&mut self) -> Result<(), HandlerError> {
        self.push("end".to_string());
        Ok(())
    }

    fn value(&mut self, name: Option<&str>, value: Option<&str>) -> Result<(), HandlerError> {
        self.push(format!("value {name:?} {value:?}"));
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("boom at {0}")]
pub struct Boom(pub String);

/// Records like [`Recorder`] but fails on the value `fail_on`.
pub struct FailOn {
    pub inner: Recorder,
    pub fail_on: &'static str,
}

impl JsonHandler for FailOn {
    fn begin(&mut self) -> Result<(), HandlerError> {
        self.inner.begin()
    }

    fn end(&mut self) -> Result<(), HandlerError> {
        self.inner.end()
    }

    fn value(&mut self, name: Option<&str>, value: Option<&str>) -> Result<(), HandlerError> {
        self.inner.value(name, value)?;
        if value == Some(self.fail_on) {
            return Err(Box::new(Boom(self.fail_on.to_string())));
        }
        Ok(())
    }
}

/// One entry of a [`ScriptedSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name(&'static str),
    Str(&'static str),
    Num(&'static str),
    Bool(bool),
    Null,
    Other,
    /// Reported as a fault when peeked.
    Fail(&'static str),
}

impl Scripted {
    fn kind(&self) -> TokenKind {
        match self {
            Scripted::BeginArray => TokenKind::BeginArray,
            Scripted::EndArray => TokenKind::EndArray,
            Scripted::BeginObject => TokenKind::BeginObject,
            Scripted::EndObject => TokenKind::EndObject,
            Scripted::Name(_) => TokenKind::Name,
            Scripted::Str(_) => TokenKind::String,
            Scripted::Num(_) => TokenKind::Number,
            Scripted::Bool(_) => TokenKind::Boolean,
            Scripted::Null => TokenKind::Null,
            Scripted::Other | Scripted::Fail(_) => TokenKind::Other,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("scripted fault: {0}")]
    Fault(&'static str),
    #[error("expected {expected:?}, script has {found:?}")]
    Mismatch {
        expected: TokenKind,
        found: TokenKind,
    },
}

/// A token source replaying a fixed script, for token kinds and faults the
/// bundled reader never produces.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    tokens: VecDeque<Scripted>,
}

impl ScriptedSource {
    pub fn new(tokens: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }

    fn pop(&mut self, expected: TokenKind) -> Result<Scripted, ScriptError> {
        let found = self.peek_kind()?;
        if found != expected {
            return Err(ScriptError::Mismatch { expected, found });
        }
        Ok(self.tokens.pop_front().expect("peeked token"))
    }

    fn pop_text(&mut self, expected: TokenKind) -> Result<String, ScriptError> {
        match self.pop(expected)? {
            Scripted::Name(text) | Scripted::Str(text) | Scripted::Num(text) => {
                Ok(text.to_string())
            }
            other => unreachable!("{other:?} carries no text"),
        }
    }
}

impl TokenSource for ScriptedSource {
    type Error = ScriptError;

    fn peek_kind(&mut self) -> Result<TokenKind, ScriptError> {
        match self.tokens.front() {
            None => Ok(TokenKind::EndDocument),
            Some(Scripted::Fail(msg)) => Err(ScriptError::Fault(*msg)),
            Some(token) => Ok(token.kind()),
        }
    }

    fn begin_array(&mut self) -> Result<(), ScriptError> {
        self.pop(TokenKind::BeginArray).map(drop)
    }

    fn end_array(&mut self) -> Result<(), ScriptError> {
        self.pop(TokenKind::EndArray).map(drop)
    }

    fn begin_object(&mut self) -> Result<(), ScriptError> {
        self.pop(TokenKind::BeginObject).map(drop)
    }

    fn end_object(&mut self) -> Result<(), ScriptError> {
        self.pop(TokenKind::EndObject).map(drop)
    }

    fn next_name(&mut self) -> Result<String, ScriptError> {
        self.pop_text(TokenKind::Name)
    }

    fn next_string(&mut self) -> Result<String, ScriptError> {
        self.pop_text(TokenKind::String)
    }

    fn next_number(&mut self) -> Result<String, ScriptError> {
        self.pop_text(TokenKind::Number)
    }

    fn next_bool(&mut self) -> Result<bool, ScriptError> {
        match self.pop(TokenKind::Boolean)? {
            Scripted::Bool(b) => Ok(b),
            other => unreachable!("{other:?} is not a boolean"),
        }
    }

    fn next_null(&mut self) -> Result<(), ScriptError> {
        self.pop(TokenKind::Null).map(drop)
    }

    fn skip_value(&mut self) -> Result<(), ScriptError> {
        self.peek_kind()?;
        self.tokens.pop_front();
        Ok(())
    }
}
