//! Ingest pipeline: catalog records → book and author rows.
//!
//! Records are written one at a time, in order. A failure on one record is
//! logged and reported but never stops the rest of the batch, and nothing is
//! rolled back.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{source::CatalogRecord, store::CatalogStore};

/// Why a single record was not fully written.
#[derive(Debug, Error)]
pub enum IngestError<E: std::error::Error + 'static> {
  /// The record was rejected before anything was written.
  #[error("{0}")]
  Record(#[from] crate::Error),

  #[error("book not saved: {0}")]
  Book(#[source] E),

  /// The book row was written; only the author upsert failed.
  #[error("book saved, author not saved: {0}")]
  Author(#[source] E),
}

/// A record that could not be written, or was only partly written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFailure {
  pub title:   String,
  pub message: String,
}

/// Outcome of one [`ingest`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
  /// Book rows written, including those whose author upsert then failed.
  pub books_inserted:   usize,
  /// Names that were new to the store; repeats are not counted.
  pub authors_inserted: usize,
  pub failures:         Vec<IngestFailure>,
}

/// Write one book row and one author upsert per record.
pub async fn ingest<S>(store: &S, records: &[CatalogRecord]) -> IngestReport
where
  S: CatalogStore,
{
  let mut report = IngestReport::default();

  for record in records {
    if let Err(err) = ingest_one(store, record, &mut report).await {
      warn!(title = record.label(), error = %err, "catalog record not fully saved");
      report.failures.push(IngestFailure {
        title:   record.label().to_owned(),
        message: err.to_string(),
      });
    }
  }

  debug!(
    books = report.books_inserted,
    authors = report.authors_inserted,
    failed = report.failures.len(),
    "ingest finished"
  );
  report
}

/// Counts each write in `report` as soon as it succeeds.
async fn ingest_one<S>(
  store: &S,
  record: &CatalogRecord,
  report: &mut IngestReport,
) -> Result<(), IngestError<S::Error>>
where
  S: CatalogStore,
{
  let book = record
    .to_new_book()
    .ok_or(crate::Error::MissingField("title"))?;

  store.insert_book(book).await.map_err(IngestError::Book)?;
  report.books_inserted += 1;

  if store
    .upsert_author(&record.author)
    .await
    .map_err(IngestError::Author)?
  {
    report.authors_inserted += 1;
  }
  Ok(())
}
