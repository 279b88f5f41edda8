//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised when decoded fields are coerced into typed values.
///
/// Tokenizing itself never fails; only the typed accessors on
/// [`crate::Fields`] produce these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A field could not be parsed as the expected type.
    #[error("field {index}: cannot read {value:?} as {expected}")]
    InvalidField {
        /// Zero-based position of the field in the record.
        index: usize,
        /// The offending field text.
        value: String,
        /// Name of the type the field was read as.
        expected: &'static str,
    },

    /// A field without a usable default was missing or empty.
    #[error("field {index} ({name}) is missing")]
    MissingField {
        /// Zero-based position of the field in the record.
        index: usize,
        /// Logical name of the field.
        name: &'static str,
    },
}

impl CodecError {
    /// Create an invalid field error.
    pub fn invalid_field(index: usize, value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidField {
            index,
            value: value.into(),
            expected,
        }
    }

    /// Create a missing field error.
    pub fn missing_field(index: usize, name: &'static str) -> Self {
        Self::MissingField { index, name }
    }
}
