//! Catalog items.

use crate::record::Record;
use folio_codec::{CodecResult, Fields};
use serde::Serialize;

/// One title held by the catalog.
///
/// `available_copies` is expected to stay within `0..=total_copies`; the
/// storage layer records whatever it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    /// Unique identity.
    pub id: String,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Free-form category.
    pub category: String,
    /// Copies owned.
    pub total_copies: u32,
    /// Copies currently on the shelf.
    pub available_copies: i32,
}

impl CatalogItem {
    /// Creates a catalog item.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
        total_copies: u32,
        available_copies: i32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            category: category.into(),
            total_copies,
            available_copies,
        }
    }
}

impl Record for CatalogItem {
    const KIND: &'static str = "catalog item";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.author.clone(),
            self.category.clone(),
            self.total_copies.to_string(),
            self.available_copies.to_string(),
        ]
    }

    fn from_fields(fields: &Fields) -> CodecResult<Self> {
        Ok(Self {
            id: fields.string(0),
            title: fields.string(1),
            author: fields.string(2),
            category: fields.string(3),
            total_copies: fields.parse_or_default(4)?,
            available_copies: fields.parse_or_default(5)?,
        })
    }
}
