//! Record listing commands.

use super::{CommandResult, OutputFormat};
use chrono::NaiveDate;
use folio_core::{AccountHolder, CatalogItem, DataDir, LoanEvent};
use serde::Serialize;

/// Lists catalog items.
pub fn items(dir: &DataDir, format: OutputFormat) -> CommandResult {
    let items = dir.catalog().try_load_all()?;
    emit(&items, format, print_items)
}

/// Lists account holders. Credentials are left out of both formats.
pub fn accounts(dir: &DataDir, format: OutputFormat) -> CommandResult {
    let holders = dir.accounts().try_load_all()?;
    emit(&holders, format, print_accounts)
}

/// Lists the loan events of one day.
pub fn loans(dir: &DataDir, date: NaiveDate, format: OutputFormat) -> CommandResult {
    let events = dir.loans().try_load_for_date(date)?;
    emit(&events, format, |events| print_loans(date, events))
}

fn emit<T: Serialize>(records: &[T], format: OutputFormat, text: impl FnOnce(&[T])) -> CommandResult {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Text => text(records),
    }
    Ok(())
}

fn print_items(items: &[CatalogItem]) {
    println!("{:<12} {:<32} {:<24} {:<16} {:>9}", "ID", "TITLE", "AUTHOR", "CATEGORY", "AVAIL");
    for item in items {
        println!(
            "{:<12} {:<32} {:<24} {:<16} {:>4}/{:<4}",
            item.id,
            single_line(&item.title),
            single_line(&item.author),
            single_line(&item.category),
            item.available_copies,
            item.total_copies
        );
    }
    println!();
    println!("{} item(s)", items.len());
}

fn print_accounts(holders: &[AccountHolder]) {
    println!("{:<12} {:<24} {:<32} {:<16} {}", "ID", "NAME", "EMAIL", "PHONE", "ADMIN");
    for holder in holders {
        println!(
            "{:<12} {:<24} {:<32} {:<16} {}",
            holder.id,
            single_line(&holder.name),
            single_line(&holder.email),
            single_line(&holder.phone),
            if holder.is_admin { "yes" } else { "no" }
        );
    }
    println!();
    println!("{} account(s)", holders.len());
}

fn print_loans(date: NaiveDate, events: &[LoanEvent]) {
    println!("Loan events for {date}");
    println!();
    for event in events {
        println!(
            "  {:<7} {:<12} item={:<12} holder={:<12} issued={} due={} returned={} fine={:.2}",
            event.action.as_str(),
            event.id,
            event.catalog_item_id,
            event.account_holder_id,
            optional_date(event.issue_date),
            optional_date(event.due_date),
            optional_date(event.return_date),
            event.fine
        );
    }
    println!();
    println!("{} event(s)", events.len());
}

fn optional_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_owned(), |d| d.to_string())
}

/// Keeps multi-line field values on one output row.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
