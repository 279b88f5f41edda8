//! # Folio Codec
//!
//! Delimited line encoding for Folio record files.
//!
//! Every record is written as a sequence of text fields joined by
//! [`DELIMITER`]. A field is wrapped in [`QUOTE`] characters when it contains
//! the delimiter, the quote character or a line break, and embedded quotes are
//! doubled. Decoding is permissive: no input makes the codec fail, and an
//! unterminated quoted span absorbs everything up to the end of the input.
//!
//! ## Layers
//!
//! - [`escape`] / [`unescape`] work on a single field
//! - [`join`] / [`parse_line`] / [`decode_line`] work on one record
//! - [`split_records`] frames a whole file into records, keeping line breaks
//!   that sit inside quoted spans
//! - [`Fields`] gives typed, defaulting access to decoded fields
//!
//! ## Usage
//!
//! ```
//! use folio_codec::{decode_line, join};
//!
//! let line = join(["b1", "Dune, Part One", "say \"hi\""]);
//! assert_eq!(line, "b1,\"Dune, Part One\",\"say \"\"hi\"\"\"");
//! assert_eq!(decode_line(&line), vec!["b1", "Dune, Part One", "say \"hi\""]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod fields;
mod frame;
mod line;

pub use error::{CodecError, CodecResult};
pub use fields::Fields;
pub use frame::{split_records, RawRecord, Records};
pub use line::{decode_line, escape, join, parse_line, unescape, DELIMITER, QUOTE};
