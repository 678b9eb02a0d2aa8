//! The `CatalogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `shelf-store-sqlite`).
//! The ingest pipeline and the CLI menu depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  author::Author,
  book::{Book, CatalogStats, NewBook},
};

/// Number of rows shown by the "most searched" report.
pub const TOP_BOOKS_LIMIT: usize = 10;

/// Abstraction over a shelf catalog backend.
///
/// Book rows are append-only. Author rows are keyed by name and written at
/// most once; no operation updates an existing row.
///
/// All methods return `Send` futures so the trait can be used from any tokio
/// runtime flavour.
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the tables if they are absent. Safe to call on every startup.
  fn initialize(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Append a book row with a zero search count and return it.
  fn insert_book(
    &self,
    book: NewBook,
  ) -> impl Future<Output = Result<Book, Self::Error>> + Send + '_;

  /// Insert an author unless the name is already present.
  ///
  /// Returns `true` when a new row was written. Uniqueness is enforced by
  /// the backend in a single statement, never by a prior existence check.
  fn upsert_author<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every book, in insertion order.
  fn list_books(&self) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  /// Every author, in insertion order.
  fn list_authors(
    &self,
  ) -> impl Future<Output = Result<Vec<Author>, Self::Error>> + Send + '_;

  /// Authors without a recorded death date.
  fn list_living_authors(
    &self,
  ) -> impl Future<Output = Result<Vec<Author>, Self::Error>> + Send + '_;

  /// Books whose language code equals `language` exactly (case-sensitive).
  fn list_books_by_language<'a>(
    &'a self,
    language: &'a str,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + 'a;

  /// Authors whose birth date falls in `year`.
  fn list_authors_by_birth_year(
    &self,
    year: i32,
  ) -> impl Future<Output = Result<Vec<Author>, Self::Error>> + Send + '_;

  /// Up to `limit` books ordered by search count, highest first. Ties keep
  /// insertion order.
  fn top_books(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  /// Book and author totals.
  fn stats(&self) -> impl Future<Output = Result<CatalogStats, Self::Error>> + Send + '_;
}
