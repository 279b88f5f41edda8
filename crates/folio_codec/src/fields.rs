//! Typed access to decoded record fields.

use crate::error::{CodecError, CodecResult};
use crate::line::decode_line;
use std::str::FromStr;

/// The decoded fields of one record.
///
/// Missing trailing fields are never an error here: text accessors return an
/// empty string and numeric accessors fall back to the type's default. Only a
/// present, non-empty field that fails to parse is reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    values: Vec<String>,
}

impl Fields {
    /// Decodes a record line.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        Self {
            values: decode_line(line),
        }
    }

    /// Wraps already decoded values.
    #[must_use]
    pub fn from_values(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Number of fields present in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field text, or `""` when the field is missing.
    #[must_use]
    pub fn text(&self, index: usize) -> &str {
        self.values.get(index).map_or("", String::as_str)
    }

    /// Owned copy of [`Fields::text`].
    #[must_use]
    pub fn string(&self, index: usize) -> String {
        self.text(index).to_owned()
    }

    fn non_empty(&self, index: usize) -> Option<&str> {
        self.values
            .get(index)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Parses a field, using `T::default()` when it is missing or empty.
    pub fn parse_or_default<T>(&self, index: usize) -> CodecResult<T>
    where
        T: FromStr + Default,
    {
        match self.non_empty(index) {
            Some(value) => parse_value(index, value),
            None => Ok(T::default()),
        }
    }

    /// Parses an optional field; missing or empty yields `None`.
    pub fn parse_opt<T: FromStr>(&self, index: usize) -> CodecResult<Option<T>> {
        self.non_empty(index)
            .map(|value| parse_value(index, value))
            .transpose()
    }

    /// Parses a field that has no sensible default.
    pub fn parse_required<T: FromStr>(&self, index: usize, name: &'static str) -> CodecResult<T> {
        self.parse_opt(index)?
            .ok_or_else(|| CodecError::missing_field(index, name))
    }

    /// Reads a boolean flag. Only `true` (any case) is true.
    #[must_use]
    pub fn flag(&self, index: usize) -> bool {
        self.non_empty(index)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

fn parse_value<T: FromStr>(index: usize, value: &str) -> CodecResult<T> {
    value
        .parse()
        .map_err(|_| CodecError::invalid_field(index, value, std::any::type_name::<T>()))
}

impl From<Vec<String>> for Fields {
    fn from(values: Vec<String>) -> Self {
        Self::from_values(values)
    }
}
