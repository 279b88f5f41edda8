//! Record mapping traits.

use folio_codec::{join, CodecResult, Fields};

/// A value that can be stored as one line of a Folio file.
///
/// Implementors map themselves to an ordered list of text fields and back.
/// The line format itself (escaping, delimiters) is owned by `folio_codec`.
///
/// # Example
///
/// ```rust
/// use folio_codec::{CodecResult, Fields};
/// use folio_core::Record;
///
/// struct Tag {
///     id: String,
///     label: String,
/// }
///
/// impl Record for Tag {
///     const KIND: &'static str = "tag";
///
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn to_fields(&self) -> Vec<String> {
///         vec![self.id.clone(), self.label.clone()]
///     }
///
///     fn from_fields(fields: &Fields) -> CodecResult<Self> {
///         Ok(Tag {
///             id: fields.string(0),
///             label: fields.string(1),
///         })
///     }
/// }
///
/// let tag = Tag { id: "t1".into(), label: "sci-fi, classic".into() };
/// assert_eq!(tag.encode(), "t1,\"sci-fi, classic\"");
/// ```
pub trait Record: Sized {
    /// Human-readable kind name used in errors and logs.
    const KIND: &'static str;

    /// The record's identity.
    fn id(&self) -> &str;

    /// Fields in file order.
    fn to_fields(&self) -> Vec<String>;

    /// Builds a record from decoded fields.
    ///
    /// Missing trailing fields must be treated as empty or default.
    fn from_fields(fields: &Fields) -> CodecResult<Self>;

    /// Encodes the record as one line, without terminator.
    fn encode(&self) -> String {
        join(self.to_fields())
    }

    /// Decodes a record from one line.
    fn decode(line: &str) -> CodecResult<Self> {
        Self::from_fields(&Fields::parse(line))
    }
}

/// A record stored in a date-partitioned log.
pub trait LogRecord: Record {
    /// Header line written once at the top of each partition file.
    const HEADER: &'static str;
}
