//! Benchmark utilities.

use chrono::{Days, NaiveDate};
use folio_core::{CatalogItem, LoanEvent};
use rand::distributions::{Alphanumeric, Distribution, Uniform};
use rand::Rng;

/// Characters that force quoting when they appear in a field.
const SPECIAL: [char; 4] = [',', '"', '\n', ' '];

/// Generate a random text field of `len` characters.
///
/// About one character in `special_every` is a delimiter, quote, line break
/// or space, so the encoder has to escape.
pub fn random_field(len: usize, special_every: usize) -> String {
    let mut rng = rand::thread_rng();
    let pick = Uniform::from(0..special_every.max(1));
    (0..len)
        .map(|_| {
            if pick.sample(&mut rng) == 0 {
                SPECIAL[rng.gen_range(0..SPECIAL.len())]
            } else {
                char::from(Alphanumeric.sample(&mut rng))
            }
        })
        .collect()
}

/// Generate `count` catalog items with sequential ids.
pub fn generate_items(count: usize) -> Vec<CatalogItem> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let total = rng.gen_range(1..10u32);
            CatalogItem::new(
                format!("b{i:06}"),
                random_field(24, 12),
                random_field(16, 20),
                "general",
                total,
                rng.gen_range(0..=total as i32),
            )
        })
        .collect()
}

/// Generate `count` issue events dated `day`.
pub fn generate_loans(count: usize, day: NaiveDate) -> Vec<LoanEvent> {
    let due = day.checked_add_days(Days::new(14)).unwrap_or(day);
    (0..count)
        .map(|i| LoanEvent::issue(format!("t{i:06}"), format!("b{i:06}"), "m000001", day, due))
        .collect()
}
