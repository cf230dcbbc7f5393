/// Configuration options for the dispatcher and the bundled token reader.
///
/// # Examples
///
/// ```rust
/// use jsondispatch::{Dispatcher, ParserOptions};
///
/// let options = ParserOptions {
///     allow_multiple_json_values: true,
///     max_depth: Some(64),
///     ..Default::default()
/// };
/// let dispatcher = Dispatcher::from_str_with_options("{} []", options);
/// ```
///
/// # Default
///
/// All flags default to `false` and there is no depth limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ParserOptions {
    /// Whether to allow any Unicode whitespace between JSON tokens.
    ///
    /// By default, the reader only recognizes the four whitespace characters
    /// defined by the JSON specification: space (U+0020), line feed (U+000A),
    /// carriage return (U+000D), and horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    /// Whether to accept multiple JSON values in a single input stream.
    ///
    /// When `true`, the reader continues with any additional
    /// whitespace-delimited JSON values after the first one, which supports
    /// formats such as JSON Lines. Each value is dispatched in turn and the
    /// path stack is empty between values.
    ///
    /// ```json
    /// {"id":1}
    /// {"id":2}
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_json_values: bool,

    /// Maximum number of simultaneously open containers.
    ///
    /// A document nesting deeper than this aborts the scan with
    /// [`StructuralError::DepthLimitExceeded`](crate::StructuralError::DepthLimitExceeded).
    ///
    /// # Default
    ///
    /// `None` (unlimited)
    pub max_depth: Option<usize>,
}
