//! Building registration paths from names and dividers.
use core::fmt;

use crate::path::Divider;

/// Assembles path strings in the dispatcher's canonical syntax.
///
/// The builder knows nothing about any particular document; it only
/// concatenates names and dividers the same way the path stack does.
///
/// ```
/// use jsondispatch::PathBuilder;
///
/// let path = PathBuilder::new()
///     .add_object(None)
///     .add_array(Some("items"))
///     .add_object(None)
///     .build();
/// assert_eq!(path, "{items[{");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathBuilder {
    path: String,
}

impl PathBuilder {
    /// Creates a builder for the root path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` (if present) followed by the array divider.
    #[must_use]
    pub fn add_array(self, name: Option<&str>) -> Self {
        self.add(name, Divider::Array)
    }

    /// Appends `name` (if present) followed by the object divider.
    #[must_use]
    pub fn add_object(self, name: Option<&str>) -> Self {
        self.add(name, Divider::Object)
    }

    /// Appends `name` (if present) followed by `divider`.
    ///
    /// An empty name is treated like an absent one.
    #[must_use]
    pub fn add(mut self, name: Option<&str>, divider: Divider) -> Self {
        if let Some(name) = name {
            self.path.push_str(name);
        }
        self.path.push(divider.as_char());
        self
    }

    /// The path assembled so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Renders the path.
    #[must_use]
    pub fn build(self) -> String {
        self.path
    }
}

impl fmt::Display for PathBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<PathBuilder> for String {
    fn from(builder: PathBuilder) -> Self {
        builder.build()
    }
}
