//! The path stack: canonical path reconstruction while tokens stream past.
//!
//! Each open container owns two frames, a [`Frame::Name`] holding the
//! property name it was opened under (absent for array elements and the
//! document root) and a [`Frame::Container`] holding its [`Divider`]. A scalar
//! only ever occupies a name frame, which is popped as soon as its value has
//! been read.
//!
//! The rendered path is kept alongside the frames: every frame remembers how
//! long the path was before it was pushed, so popping is a truncation and
//! [`PathStack::current_path`] never re-walks the stack.
//!
//! ```
//! use jsondispatch::{Divider, PathStack};
//!
//! let mut stack = PathStack::new();
//! stack.enter_name(None);
//! stack.enter_container(Divider::Object).unwrap();
//! stack.enter_name(Some("items".into()));
//! stack.enter_container(Divider::Array).unwrap();
//! assert_eq!(stack.current_path(), "{items[");
//! ```
use core::fmt;

use crate::error::StructuralError;

/// The symbol a container contributes to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum Divider {
    /// An array, rendered as `[`.
    Array,
    /// An object, rendered as `{`.
    Object,
}

impl Divider {
    /// The path text of this divider.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Divider::Array => '[',
            Divider::Object => '{',
        }
    }
}

impl fmt::Display for Divider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.as_char())
    }
}

/// One entry of the [`PathStack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A property name, or `None` for array elements and the document root.
    Name(Option<String>),
    /// An open container.
    Container(Divider),
}

#[derive(Debug, Clone)]
struct Entry {
    frame: Frame,
    /// Length of the rendered path before this frame was pushed.
    mark: usize,
}

/// Ordered frames describing the current location in the document.
#[derive(Debug, Clone, Default)]
pub struct PathStack {
    entries: Vec<Entry>,
    rendered: String,
    containers: usize,
}

impl PathStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(16),
            rendered: String::new(),
            containers: 0,
        }
    }

    /// Pushes a name frame. `None` is used for array elements and the root.
    pub fn enter_name(&mut self, name: Option<String>) {
        let mark = self.rendered.len();
        if let Some(name) = &name {
            self.rendered.push_str(name);
        }
        self.entries.push(Entry {
            frame: Frame::Name(name),
            mark,
        });
    }

    /// Pushes a container frame on top of the name frame for the same element.
    ///
    /// # Errors
    ///
    /// [`StructuralError::OrphanContainer`] if the top frame is not a name
    /// frame.
    pub fn enter_container(&mut self, divider: Divider) -> Result<(), StructuralError> {
        if !matches!(self.top(), Some(Frame::Name(_))) {
            return Err(StructuralError::OrphanContainer);
        }
        let mark = self.rendered.len();
        self.rendered.push(divider.as_char());
        self.entries.push(Entry {
            frame: Frame::Container(divider),
            mark,
        });
        self.containers += 1;
        Ok(())
    }

    /// Pops a container frame and the name frame paired with it.
    ///
    /// # Errors
    ///
    /// [`StructuralError::MismatchedClose`] unless the top two frames are a
    /// container with the given divider over a name frame. The stack is left
    /// untouched in that case.
    pub fn leave_container(&mut self, divider: Divider) -> Result<(), StructuralError> {
        let len = self.entries.len();
        let paired = len >= 2
            && self.entries[len - 1].frame == Frame::Container(divider)
            && matches!(self.entries[len - 2].frame, Frame::Name(_));
        if !paired {
            return Err(StructuralError::MismatchedClose {
                path: self.rendered.clone(),
            });
        }

        self.truncate_to(len - 2);
        self.entries.truncate(len - 2);
        self.containers -= 1;
        Ok(())
    }

    /// Pops a single name frame once its scalar value has been read and
    /// returns the name it held.
    ///
    /// # Errors
    ///
    /// [`StructuralError::MismatchedClose`] if the top frame is not a name
    /// frame.
    pub fn leave_scalar(&mut self) -> Result<Option<String>, StructuralError> {
        if !matches!(self.top(), Some(Frame::Name(_))) {
            return Err(StructuralError::MismatchedClose {
                path: self.rendered.clone(),
            });
        }
        let len = self.entries.len();
        self.truncate_to(len - 1);
        match self.entries.pop() {
            Some(Entry {
                frame: Frame::Name(name),
                ..
            }) => Ok(name),
            _ => unreachable!("top frame checked above"),
        }
    }

    /// The canonical path of the current stack.
    ///
    /// The empty string stands for the root position, where no frame
    /// contributes any text.
    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.rendered
    }

    /// The topmost frame.
    #[must_use]
    pub fn top(&self) -> Option<&Frame> {
        self.entries.last().map(|e| &e.frame)
    }

    /// Iterates the frames from the root to the top.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.entries.iter().map(|e| &e.frame)
    }

    /// Number of open containers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.containers
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no frame is on the stack.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cuts the rendered path back to the mark of the entry at `index`.
    fn truncate_to(&mut self, index: usize) {
        let mark = self.entries.get(index).map_or(0, |e| e.mark);
        self.rendered.truncate(mark);
    }
}
