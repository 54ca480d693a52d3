//! Configuration options for parsing.
//!
//! ## Examples
//!
//! ```rust
//! use jsrs::{parse_with_options, ErrorKind, ParseOptions};
//!
//! let options = ParseOptions::new().with_max_depth(2);
//! assert!(parse_with_options("[[1]]", &options).is_ok());
//!
//! let err = parse_with_options("[[[1]]]", &options).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::DepthLimitExceeded);
//! ```

/// Default nesting limit for arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for the record parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed container nesting; the top-level container is depth 1.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsrs::ParseOptions;
    ///
    /// let options = ParseOptions::new();
    /// assert_eq!(options.max_depth, 128);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nesting limit for arrays and objects.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
