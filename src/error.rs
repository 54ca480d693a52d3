//! Error types for record parsing, serialization and the serde bridge.
//!
//! Every parse failure is reported by the smallest routine that detected it and
//! is returned unchanged from [`parse`](crate::parse); there are no partial
//! results. Positions are byte offsets into the *normalized* text, i.e. after
//! whitespace and comments have been stripped.
//!
//! ## Error Categories
//!
//! - **Format errors**: one variant per value kind (`NumberFormat`,
//!   `BooleanFormat`, `StringFormat`, `ArrayFormat`)
//! - **Object errors**: `ObjectKey` for bad key text, `ObjectValue` for bad or
//!   missing values and separators
//! - **Whole-input errors**: `TrailingData`, `InvalidValue`, `UnexpectedEnd`,
//!   `DepthLimitExceeded`
//! - **Bridge errors**: `Metadata`, `Io`, `Custom`
//!
//! ## Examples
//!
//! ```rust
//! use jsrs::{parse, ErrorKind};
//!
//! let err = parse("{n: nult}").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ObjectValue);
//! assert_eq!(err.position(), Some(3));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Number text that `f64` parsing rejects
    #[error("Number format error at position {position}: {msg}")]
    NumberFormat { position: usize, msg: String },

    /// Text starting like a boolean that is not `true` or `false`
    #[error("Boolean format error at position {position}: {msg}")]
    BooleanFormat { position: usize, msg: String },

    /// String without a matching closing quote
    #[error("String format error at position {position}: {msg}")]
    StringFormat { position: usize, msg: String },

    /// Malformed array element or missing separator
    #[error("Array format error at position {position}: {msg}")]
    ArrayFormat { position: usize, msg: String },

    /// Invalid character in an object key
    #[error("Object key error at position {position}: {msg}")]
    ObjectKey { position: usize, msg: String },

    /// Malformed object value or missing separator
    #[error("Object value error at position {position}: {msg}")]
    ObjectValue { position: usize, msg: String },

    /// Input left over after a complete value
    #[error("Trailing data at position {position}")]
    TrailingData { position: usize },

    /// Top-level text that does not start any value
    #[error("Invalid value at position {position}: {msg}")]
    InvalidValue { position: usize, msg: String },

    /// Nothing to parse once whitespace and comments are removed
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// Containers nested deeper than the configured limit
    #[error("Nesting depth limit of {limit} exceeded at position {position}")]
    DepthLimitExceeded { position: usize, limit: usize },

    /// Metadata record and data record do not fit together
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

/// Fieldless discriminant of [`Error`], handy for matching in tests and callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NumberFormat,
    BooleanFormat,
    StringFormat,
    ArrayFormat,
    ObjectKey,
    ObjectValue,
    TrailingData,
    InvalidValue,
    UnexpectedEnd,
    DepthLimitExceeded,
    Metadata,
    Io,
    Custom,
}

impl Error {
    pub fn number_format(position: usize, msg: &str) -> Self {
        Error::NumberFormat {
            position,
            msg: msg.to_string(),
        }
    }

    pub fn boolean_format(position: usize, msg: &str) -> Self {
        Error::BooleanFormat {
            position,
            msg: msg.to_string(),
        }
    }

    pub fn string_format(position: usize, msg: &str) -> Self {
        Error::StringFormat {
            position,
            msg: msg.to_string(),
        }
    }

    pub fn array_format(position: usize, msg: &str) -> Self {
        Error::ArrayFormat {
            position,
            msg: msg.to_string(),
        }
    }

    pub fn object_key(position: usize, msg: &str) -> Self {
        Error::ObjectKey {
            position,
            msg: msg.to_string(),
        }
    }

    pub fn object_value(position: usize, msg: &str) -> Self {
        Error::ObjectValue {
            position,
            msg: msg.to_string(),
        }
    }

    pub fn invalid_value(position: usize, msg: &str) -> Self {
        Error::InvalidValue {
            position,
            msg: msg.to_string(),
        }
    }

    /// Creates a metadata mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsrs::Error;
    ///
    /// let err = Error::metadata("data record must be an array");
    /// assert!(err.to_string().contains("must be an array"));
    /// ```
    pub fn metadata<T: fmt::Display>(msg: T) -> Self {
        Error::Metadata(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsrs::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the fieldless kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NumberFormat { .. } => ErrorKind::NumberFormat,
            Error::BooleanFormat { .. } => ErrorKind::BooleanFormat,
            Error::StringFormat { .. } => ErrorKind::StringFormat,
            Error::ArrayFormat { .. } => ErrorKind::ArrayFormat,
            Error::ObjectKey { .. } => ErrorKind::ObjectKey,
            Error::ObjectValue { .. } => ErrorKind::ObjectValue,
            Error::TrailingData { .. } => ErrorKind::TrailingData,
            Error::InvalidValue { .. } => ErrorKind::InvalidValue,
            Error::UnexpectedEnd => ErrorKind::UnexpectedEnd,
            Error::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
            Error::Metadata(_) => ErrorKind::Metadata,
            Error::Io(_) => ErrorKind::Io,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Byte offset into the normalized text, for errors raised by the parser.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::NumberFormat { position, .. }
            | Error::BooleanFormat { position, .. }
            | Error::StringFormat { position, .. }
            | Error::ArrayFormat { position, .. }
            | Error::ObjectKey { position, .. }
            | Error::ObjectValue { position, .. }
            | Error::TrailingData { position }
            | Error::InvalidValue { position, .. }
            | Error::DepthLimitExceeded { position, .. } => Some(*position),
            Error::UnexpectedEnd | Error::Metadata(_) | Error::Io(_) | Error::Custom(_) => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
