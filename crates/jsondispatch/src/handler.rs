//! Handlers and the path-keyed registry the dispatcher looks them up in.
use std::collections::HashMap;

use tracing::debug;

use crate::error::{HandlerError, RegistrationError};

/// Callbacks invoked for events at a registered path.
///
/// Every method may fail; a failure aborts the scan and is returned to the
/// caller of [`Dispatcher::scan`](crate::Dispatcher::scan) as
/// [`DispatchError::Handler`](crate::DispatchError::Handler).
pub trait JsonHandler {
    /// A container opened at the handler's path.
    ///
    /// # Errors
    ///
    /// Any error aborts the scan.
    fn begin(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The container opened at the handler's path closed.
    ///
    /// # Errors
    ///
    /// Any error aborts the scan.
    fn end(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }

    /// A scalar directly inside the container at the handler's path.
    ///
    /// `name` is the property name, or `None` for array elements and a root
    /// scalar. `value` is the scalar's text, or `None` for `null`.
    ///
    /// # Errors
    ///
    /// Any error aborts the scan.
    fn value(&mut self, name: Option<&str>, value: Option<&str>) -> Result<(), HandlerError>;
}

impl<H: JsonHandler + ?Sized> JsonHandler for &mut H {
    fn begin(&mut self) -> Result<(), HandlerError> {
        (**self).begin()
    }

    fn end(&mut self) -> Result<(), HandlerError> {
        (**self).end()
    }

    fn value(&mut self, name: Option<&str>, value: Option<&str>) -> Result<(), HandlerError> {
        (**self).value(name, value)
    }
}

/// A handler that logs every value at debug level and ignores container
/// boundaries.
///
/// An absent name or value leaves its field out of the event, so array
/// elements and `null` stay distinct from empty strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

impl JsonHandler for LoggingHandler {
    fn value(&mut self, name: Option<&str>, value: Option<&str>) -> Result<(), HandlerError> {
        debug!(name, value, "json value");
        Ok(())
    }
}

/// Exact-match mapping from path text to handler.
///
/// At most one handler is registered per path; registering again under the
/// same path replaces the previous handler.
#[derive(Default)]
pub struct HandlerRegistry<'h> {
    handlers: HashMap<String, Box<dyn JsonHandler + 'h>>,
}

impl core::fmt::Debug for HandlerRegistry<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl<'h> HandlerRegistry<'h> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `path`, returning the handler it replaced.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::EmptyPath`] if `path` is empty; the root position
    /// can never be addressed.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        handler: impl JsonHandler + 'h,
    ) -> Result<Option<Box<dyn JsonHandler + 'h>>, RegistrationError> {
        let path = path.into();
        if path.is_empty() {
            return Err(RegistrationError::EmptyPath);
        }
        let replaced = self.handlers.insert(path, Box::new(handler));
        Ok(replaced)
    }

    /// The handler registered at `path`, if any.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut (dyn JsonHandler + 'h)> {
        self.handlers.get_mut(path).map(|h| &mut **h)
    }

    /// Returns `true` if a handler is registered at `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.handlers.contains_key(path)
    }

    /// Number of registered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
