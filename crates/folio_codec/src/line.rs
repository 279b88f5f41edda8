//! Single-record encoding: escaping, joining and tokenizing.

use std::borrow::Cow;

/// Field separator within a record.
pub const DELIMITER: char = ',';

/// Quote character used to protect fields that need escaping.
pub const QUOTE: char = '"';

fn needs_quoting(field: &str) -> bool {
    field
        .chars()
        .any(|c| matches!(c, DELIMITER | QUOTE | '\n' | '\r'))
}

/// Escapes a single field.
///
/// Fields containing the delimiter, the quote character or a line break are
/// wrapped in quotes with embedded quotes doubled. Anything else is returned
/// unchanged without allocating.
///
/// ```
/// use folio_codec::escape;
///
/// assert_eq!(escape("plain"), "plain");
/// assert_eq!(escape("a,b"), "\"a,b\"");
/// assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn escape(field: &str) -> Cow<'_, str> {
    if !needs_quoting(field) {
        return Cow::Borrowed(field);
    }

    let mut out = String::with_capacity(field.len() + 2);
    out.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
    Cow::Owned(out)
}

/// Reverses [`escape`] for one raw field isolated by [`parse_line`].
///
/// A field that does not start with a quote is returned as is. Inside a
/// quoted span a doubled quote decodes to one quote; a missing closing quote
/// is tolerated.
pub fn unescape(field: &str) -> Cow<'_, str> {
    let Some(inner) = field.strip_prefix(QUOTE) else {
        return Cow::Borrowed(field);
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != QUOTE {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&QUOTE) {
            chars.next();
            out.push(QUOTE);
        } else {
            // Closing quote. Stray text after it is kept verbatim.
            out.extend(chars.by_ref());
            break;
        }
    }
    Cow::Owned(out)
}

/// Escapes every field and joins them with [`DELIMITER`].
pub fn join<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(&escape(field.as_ref()));
    }
    line
}

/// Splits a record into its raw, still-escaped fields.
///
/// Delimiters inside a quoted span do not end a field. Quotes are kept in the
/// output so that [`unescape`] can decode each field independently. An empty
/// line yields a single empty field.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if in_quotes => {
                current.push(QUOTE);
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    current.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            }
            QUOTE => {
                in_quotes = true;
                current.push(QUOTE);
            }
            DELIMITER if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

/// Tokenizes a record and unescapes each field.
pub fn decode_line(line: &str) -> Vec<String> {
    parse_line(line)
        .iter()
        .map(|raw| unescape(raw).into_owned())
        .collect()
}
