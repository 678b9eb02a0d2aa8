//! Book rows and the aggregate counts reported over them.

use crate::{Error, Result};

/// Placeholder stored when the catalog omits an author or language.
pub const UNKNOWN: &str = "Unknown";

/// A persisted book.
///
/// `author` is a display name copied from the catalog record, not a reference
/// into the authors table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
  pub id:           i64,
  pub title:        String,
  pub author:       String,
  pub language:     Option<String>,
  pub year:         Option<i64>,
  pub search_count: i64,
}

/// Input for [`CatalogStore::insert_book`](crate::store::CatalogStore::insert_book).
/// The id and `search_count` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
  pub title:    String,
  pub author:   String,
  pub language: String,
  pub year:     i64,
}

impl NewBook {
  /// Reject rows the schema would accept but the catalog treats as invalid.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::MissingField("title"));
    }
    if self.author.trim().is_empty() {
      return Err(Error::MissingField("author"));
    }
    Ok(())
  }
}

/// Totals shown by the statistics report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
  /// Every book row, duplicates included.
  pub total_books:   i64,
  /// Distinct author names appearing on book rows.
  pub total_authors: i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn book(title: &str, author: &str) -> NewBook {
    NewBook {
      title:    title.into(),
      author:   author.into(),
      language: UNKNOWN.into(),
      year:     0,
    }
  }

  #[test]
  fn validate_accepts_populated_book() {
    assert!(book("Dune", "Frank Herbert").validate().is_ok());
  }

  #[test]
  fn validate_rejects_blank_title() {
    let err = book("  ", "Frank Herbert").validate().unwrap_err();
    assert!(matches!(err, Error::MissingField("title")));
  }

  #[test]
  fn validate_rejects_empty_author() {
    let err = book("Dune", "").validate().unwrap_err();
    assert!(matches!(err, Error::MissingField("author")));
  }
}
