//! Path-addressed event dispatch over a streaming JSON token source.
//!
//! A [`Dispatcher`] walks a JSON document token by token without building a
//! tree. It keeps a [`PathStack`] describing where it is, renders that
//! location as a compact path string and hands container boundaries and
//! scalar values to whichever [`JsonHandler`] is registered at that exact
//! path.
//!
//! Paths concatenate property names and container dividers: `[` for arrays
//! and `{` for objects. `{items[` is the array under `"items"` in the root
//! object, and `{items[{` each object element of that array.
//! [`PathBuilder`] assembles them.
//!
//! ```rust
//! use jsondispatch::{Dispatcher, HandlerError, JsonHandler};
//!
//! struct Sum(i64);
//!
//! impl JsonHandler for Sum {
//!     fn value(&mut self, _name: Option<&str>, value: Option<&str>) -> Result<(), HandlerError> {
//!         self.0 += value.unwrap_or("0").parse::<i64>()?;
//!         Ok(())
//!     }
//! }
//!
//! let mut sum = Sum(0);
//! let mut dispatcher = Dispatcher::from_str(r#"{"items": [1, 2, 3], "other": [10]}"#);
//! dispatcher.register("{items[", &mut sum).unwrap();
//! dispatcher.scan().unwrap();
//! drop(dispatcher);
//! assert_eq!(sum.0, 6);
//! ```
//!
//! The bundled [`JsonTokenReader`] lexes JSON from any [`std::io::Read`];
//! other tokenizers plug in through [`TokenSource`].

mod dispatcher;
mod error;
mod handler;
mod options;
mod path;
mod path_builder;
mod reader;
mod token;

#[cfg(test)]
mod tests;

pub use dispatcher::{Dispatcher, ScanState};
pub use error::{
    DispatchError, HandlerError, ReaderError, ReaderErrorKind, RegistrationError,
    StructuralError, SyntaxError,
};
pub use handler::{HandlerRegistry, JsonHandler, LoggingHandler};
pub use options::ParserOptions;
pub use path::{Divider, Frame, PathStack};
pub use path_builder::PathBuilder;
pub use reader::JsonTokenReader;
pub use token::{TokenKind, TokenSource};
