//! The `BookSource` trait and the records it yields.
//!
//! Implemented by remote catalog clients (e.g. the Open Library client in
//! `shelf-cli`). The ingest pipeline only sees [`CatalogRecord`]s.

use std::{fmt, future::Future};

use crate::book::{NewBook, UNKNOWN};

// ─── Search field ────────────────────────────────────────────────────────────

/// Which catalog field a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
  Title,
  Author,
}

impl SearchField {
  /// Query prefix understood by the remote search endpoint.
  pub fn as_param(self) -> &'static str {
    match self {
      SearchField::Title => "title",
      SearchField::Author => "author",
    }
  }
}

impl fmt::Display for SearchField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_param())
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One search result with catalog defaults already applied.
///
/// The title stays optional so that a single untitled result can be skipped
/// without discarding the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
  pub title:    Option<String>,
  pub author:   String,
  pub language: String,
  pub year:     i64,
}

impl CatalogRecord {
  /// Build a record from raw catalog fields. Only the first element of each
  /// list-valued field is kept; empty lists count as absent.
  pub fn from_parts(
    title: Option<String>,
    authors: Option<Vec<String>>,
    languages: Option<Vec<String>>,
    year: Option<i64>,
  ) -> Self {
    fn first_or_unknown(values: Option<Vec<String>>) -> String {
      values
        .and_then(|v| v.into_iter().next())
        .unwrap_or_else(|| UNKNOWN.to_owned())
    }

    Self {
      title,
      author: first_or_unknown(authors),
      language: first_or_unknown(languages),
      year: year.unwrap_or(0),
    }
  }

  /// Label used when reporting on this record.
  pub fn label(&self) -> &str { self.title.as_deref().unwrap_or("<untitled>") }

  /// Convert into a book row, or `None` if the catalog gave no title.
  pub fn to_new_book(&self) -> Option<NewBook> {
    let title = self.title.clone()?;
    Some(NewBook {
      title,
      author: self.author.clone(),
      language: self.language.clone(),
      year: self.year,
    })
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A remote catalog that can be searched by title or author.
pub trait BookSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run one search and return every result, in the order received.
  fn search<'a>(
    &'a self,
    field: SearchField,
    term: &'a str,
  ) -> impl Future<Output = Result<Vec<CatalogRecord>, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_parts_applies_defaults() {
    let record = CatalogRecord::from_parts(Some("Dune".into()), None, None, None);
    assert_eq!(record.author, "Unknown");
    assert_eq!(record.language, "Unknown");
    assert_eq!(record.year, 0);
  }

  #[test]
  fn from_parts_keeps_first_list_element() {
    let record = CatalogRecord::from_parts(
      Some("Good Omens".into()),
      Some(vec!["Terry Pratchett".into(), "Neil Gaiman".into()]),
      Some(vec!["eng".into(), "fre".into()]),
      Some(1990),
    );
    assert_eq!(record.author, "Terry Pratchett");
    assert_eq!(record.language, "eng");
    assert_eq!(record.year, 1990);
  }

  #[test]
  fn empty_lists_count_as_absent() {
    let record =
      CatalogRecord::from_parts(Some("Anon".into()), Some(vec![]), Some(vec![]), None);
    assert_eq!(record.author, "Unknown");
    assert_eq!(record.language, "Unknown");
  }

  #[test]
  fn untitled_record_has_no_book() {
    let record = CatalogRecord::from_parts(None, None, None, Some(2001));
    assert!(record.to_new_book().is_none());
    assert_eq!(record.label(), "<untitled>");
  }

  #[test]
  fn search_field_params() {
    assert_eq!(SearchField::Title.as_param(), "title");
    assert_eq!(SearchField::Author.to_string(), "author");
  }
}
