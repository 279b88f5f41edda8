//! Splitting file content into records.

/// One record as it appears in a file, before tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Record text without its terminating line break.
    pub text: &'a str,
    /// Whether a line break followed the record.
    ///
    /// The last record of a file that is still being appended to may be
    /// unterminated.
    pub terminated: bool,
}

impl RawRecord<'_> {
    /// Returns true if the record holds nothing but whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Iterator over the records of a file. Created by [`split_records`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    rest: &'a str,
}

/// Splits file content into records.
///
/// A `\n` (optionally preceded by `\r`) ends a record only outside a quoted
/// span, so escaped fields containing line breaks stay in one record.
pub fn split_records(content: &str) -> Records<'_> {
    Records { rest: content }
}

impl<'a> Iterator for Records<'a> {
    type Item = RawRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let mut in_quotes = false;
        for (i, byte) in self.rest.bytes().enumerate() {
            match byte {
                b'"' => in_quotes = !in_quotes,
                b'\n' if !in_quotes => {
                    let text = &self.rest[..i];
                    self.rest = &self.rest[i + 1..];
                    return Some(RawRecord {
                        text: text.strip_suffix('\r').unwrap_or(text),
                        terminated: true,
                    });
                }
                _ => {}
            }
        }

        let text = std::mem::take(&mut self.rest);
        Some(RawRecord {
            text,
            terminated: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(content: &str) -> Vec<&str> {
        split_records(content).map(|r| r.text).collect()
    }

    #[test]
    fn empty_content_has_no_records() {
        assert_eq!(split_records("").count(), 0);
    }

    #[test]
    fn splits_on_lf_and_crlf() {
        assert_eq!(texts("a,b\nc,d\r\ne\n"), vec!["a,b", "c,d", "e"]);
    }

    #[test]
    fn quoted_line_break_is_not_a_boundary() {
        assert_eq!(texts("a,\"x\ny\"\nb\n"), vec!["a,\"x\ny\"", "b"]);
    }

    #[test]
    fn doubled_quotes_do_not_confuse_framing() {
        assert_eq!(texts("\"a\"\"\nb\",c\nd\n"), vec!["\"a\"\"\nb\",c", "d"]);
    }

    #[test]
    fn trailing_record_without_newline_is_unterminated() {
        let records: Vec<_> = split_records("a\nb,c").collect();
        assert_eq!(records.len(), 2);
        assert!(records[0].terminated);
        assert!(!records[1].terminated);
        assert_eq!(records[1].text, "b,c");
    }

    #[test]
    fn blank_records_are_reported() {
        let records: Vec<_> = split_records("a\n\n  \nb\n").collect();
        let blanks: Vec<bool> = records.iter().map(RawRecord::is_blank).collect();
        assert_eq!(blanks, vec![false, true, true, false]);
    }

    #[test]
    fn unterminated_quote_absorbs_to_end() {
        let records: Vec<_> = split_records("a\n\"b\nc\nd").collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text, "\"b\nc\nd");
        assert!(!records[1].terminated);
    }
}
