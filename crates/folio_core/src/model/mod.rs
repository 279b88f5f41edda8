//! Record kinds stored by Folio.
//!
//! Records refer to each other by identity string only. Nothing here checks
//! that a referenced id exists.

mod account;
mod catalog;
mod loan;

pub use account::{AccountHolder, Credential};
pub use catalog::CatalogItem;
pub use loan::{LoanAction, LoanEvent, UnknownAction};
