//! # Error Types: Problem Taxonomy
//!
//! Defines the errors surfaced while building records. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every problem detected during field resolution carries an
//!   [`ErrorKind`] chosen by the call site and a human-readable message.
//!   The verbosity level decides whether it is dropped, reported as a
//!   warning, or returned as a [`PodsError`].
//! - Value-level conversion failures ([`CastError`]) are internal to the
//!   resolver: they become part of the message of a type-error problem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a problem detected during field resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field was not provided.
    Value,
    /// A value could not be cast to the declared type.
    Type,
    /// An enum member name was not found.
    Key,
    /// The declared type has a shape the resolver does not support.
    NotImplemented,
}

impl ErrorKind {
    /// Returns the snake_case identifier for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value_error",
            Self::Type => "type_error",
            Self::Key => "key_error",
            Self::NotImplemented => "not_implemented",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure that aborts the construction of a record.
///
/// Only produced when the verbosity level is
/// [`VerbosityLevel::Raise`](crate::VerbosityLevel::Raise).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PodsError {
    /// A required field was not provided.
    #[error("value error: {0}")]
    Value(String),

    /// A value could not be cast to the declared type.
    #[error("type error: {0}")]
    Type(String),

    /// An enum member name was not found.
    #[error("key error: {0}")]
    Key(String),

    /// Unsupported declared-type shape.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl PodsError {
    /// Build an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Value => Self::Value(message),
            ErrorKind::Type => Self::Type(message),
            ErrorKind::Key => Self::Key(message),
            ErrorKind::NotImplemented => Self::NotImplemented(message),
        }
    }

    /// The kind this error was tagged with.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Value(_) => ErrorKind::Value,
            Self::Type(_) => ErrorKind::Type,
            Self::Key(_) => ErrorKind::Key,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
        }
    }

    /// The message passed by the call site, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Value(m) | Self::Type(m) | Self::Key(m) | Self::NotImplemented(m) => m,
        }
    }
}

/// A value-level conversion failure from a constructor-from-value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CastError(pub String);

impl CastError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Error converting between [`Value`](crate::Value) and foreign representations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueConversionError {
    /// The JSON value has no counterpart in the value model.
    #[error("cannot represent JSON {0} as a field value")]
    UnsupportedJson(&'static str),

    /// Keyword arguments were given as something other than a JSON object.
    #[error("keyword arguments must be a JSON object, found {0}")]
    ExpectedObject(&'static str),

    /// The JSON number does not fit a 64-bit integer or float.
    #[error("JSON number {0} is out of range")]
    NumberOutOfRange(String),

    /// The value does not have the expected runtime kind.
    #[error("expected {expected}, found {found}")]
    UnexpectedKind {
        /// Kind requested by the caller.
        expected: String,
        /// Kind of the value actually held.
        found: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_roundtrips_kind() {
        for kind in [
            ErrorKind::Value,
            ErrorKind::Type,
            ErrorKind::Key,
            ErrorKind::NotImplemented,
        ] {
            let err = PodsError::new(kind, "boom");
            assert_eq!(err.kind(), kind);
            assert_eq!(err.message(), "boom");
        }
    }

    #[test]
    fn test_display_prefixes_kind() {
        let err = PodsError::new(ErrorKind::Key, "'E2'");
        assert_eq!(err.to_string(), "key error: 'E2'");
    }

    #[test]
    fn test_kind_serde_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotImplemented).unwrap();
        assert_eq!(json, "\"not_implemented\"");
    }
}
