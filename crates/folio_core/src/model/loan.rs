//! Loan events.

use crate::record::{LogRecord, Record};
use chrono::NaiveDate;
use folio_codec::{CodecResult, Fields};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a loan event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanAction {
    /// A copy left the shelf.
    Issue,
    /// A copy came back.
    Return,
}

impl LoanAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "ISSUE",
            Self::Return => "RETURN",
        }
    }
}

impl fmt::Display for LoanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an action name other than `ISSUE` or `RETURN`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown loan action: {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for LoanAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ISSUE") {
            Ok(Self::Issue)
        } else if s.eq_ignore_ascii_case("RETURN") {
            Ok(Self::Return)
        } else {
            Err(UnknownAction(s.to_owned()))
        }
    }
}

/// One immutable entry of the loan log.
///
/// An issue and its matching return share the same `id`. Dates and fines are
/// supplied by the caller; the log does no arithmetic on them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanEvent {
    /// Loan identity, shared by the issue and return events.
    pub id: String,
    /// Identity of the catalog item lent.
    pub catalog_item_id: String,
    /// Identity of the borrowing account holder.
    pub account_holder_id: String,
    /// Set on issue events.
    pub issue_date: Option<NaiveDate>,
    /// Date the copy is due back.
    pub due_date: Option<NaiveDate>,
    /// Set once returned.
    pub return_date: Option<NaiveDate>,
    /// Fine charged, never negative.
    pub fine: f64,
    /// Event kind.
    pub action: LoanAction,
}

impl LoanEvent {
    /// Creates an issue event.
    pub fn issue(
        id: impl Into<String>,
        catalog_item_id: impl Into<String>,
        account_holder_id: impl Into<String>,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            catalog_item_id: catalog_item_id.into(),
            account_holder_id: account_holder_id.into(),
            issue_date: Some(issue_date),
            due_date: Some(due_date),
            return_date: None,
            fine: 0.0,
            action: LoanAction::Issue,
        }
    }

    /// Creates a return event.
    pub fn returned(
        id: impl Into<String>,
        catalog_item_id: impl Into<String>,
        account_holder_id: impl Into<String>,
        due_date: Option<NaiveDate>,
        return_date: NaiveDate,
        fine: f64,
    ) -> Self {
        Self {
            id: id.into(),
            catalog_item_id: catalog_item_id.into(),
            account_holder_id: account_holder_id.into(),
            issue_date: None,
            due_date,
            return_date: Some(return_date),
            fine,
            action: LoanAction::Return,
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Whole amounts keep one decimal place (`0.0`, `15.0`).
fn format_fine(fine: f64) -> String {
    if fine.is_finite() && fine.fract() == 0.0 {
        format!("{fine:.1}")
    } else {
        fine.to_string()
    }
}

impl Record for LoanEvent {
    const KIND: &'static str = "loan event";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.catalog_item_id.clone(),
            self.account_holder_id.clone(),
            format_date(self.issue_date),
            format_date(self.due_date),
            format_date(self.return_date),
            format_fine(self.fine),
            self.action.to_string(),
        ]
    }

    fn from_fields(fields: &Fields) -> CodecResult<Self> {
        Ok(Self {
            id: fields.string(0),
            catalog_item_id: fields.string(1),
            account_holder_id: fields.string(2),
            issue_date: fields.parse_opt(3)?,
            due_date: fields.parse_opt(4)?,
            return_date: fields.parse_opt(5)?,
            fine: fields.parse_or_default(6)?,
            action: fields.parse_required(7, "action")?,
        })
    }
}

impl LogRecord for LoanEvent {
    const HEADER: &'static str = "txId,bookId,memberId,issueDate,dueDate,returnDate,fine,action";
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_codec::CodecError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn issue_field_order() {
        let event = LoanEvent::issue("t1", "b1", "m1", date(2024, 3, 1), date(2024, 3, 15));
        assert_eq!(event.encode(), "t1,b1,m1,2024-03-01,2024-03-15,,0.0,ISSUE");
    }

    #[test]
    fn return_round_trip() {
        let event = LoanEvent::returned("t1", "b1", "m1", Some(date(2024, 3, 15)), date(2024, 3, 18), 15.0);
        let line = event.encode();
        assert_eq!(line, "t1,b1,m1,,2024-03-15,2024-03-18,15.0,RETURN");
        assert_eq!(LoanEvent::decode(&line).unwrap(), event);
    }

    #[test]
    fn fractional_fine_round_trip() {
        let event = LoanEvent::returned("t2", "b1", "m1", None, date(2024, 1, 2), 2.75);
        assert_eq!(LoanEvent::decode(&event.encode()).unwrap().fine, 2.75);
    }

    #[test]
    fn action_is_case_insensitive() {
        let event = LoanEvent::decode("t3,b1,m1,,,,,return").unwrap();
        assert_eq!(event.action, LoanAction::Return);
        assert_eq!(event.fine, 0.0);
    }

    #[test]
    fn missing_action_is_an_error() {
        let err = LoanEvent::decode("t4,b1,m1,2024-01-01").unwrap_err();
        assert_eq!(err, CodecError::missing_field(7, "action"));
    }

    #[test]
    fn unknown_action_is_an_error() {
        assert!(LoanEvent::decode("t5,b1,m1,,,,0.0,RENEW").is_err());
    }

    #[test]
    fn bad_date_is_an_error() {
        assert!(LoanEvent::decode("t6,b1,m1,03/01/2024,,,0.0,ISSUE").is_err());
    }

    #[test]
    fn action_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&LoanAction::Issue).unwrap(), "\"ISSUE\"");
    }
}
