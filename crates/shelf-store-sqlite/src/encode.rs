//! Row decoding between SQLite result rows and `shelf-core` types.
//!
//! Every SELECT in the store lists columns in the order given by
//! [`BOOK_COLUMNS`] or [`AUTHOR_COLUMNS`] so these helpers can read by index.

use rusqlite::Row;
use shelf_core::{author::Author, book::Book};

pub const BOOK_COLUMNS: &str = "id, title, author, language, year, search_count";

pub const AUTHOR_COLUMNS: &str = "id, name, birth_date, death_date";

pub fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
  Ok(Book {
    id:           row.get(0)?,
    title:        row.get(1)?,
    author:       row.get(2)?,
    language:     row.get(3)?,
    year:         row.get(4)?,
    // Rows written outside the store may carry an explicit NULL.
    search_count: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
  })
}

pub fn author_from_row(row: &Row<'_>) -> rusqlite::Result<Author> {
  Ok(Author {
    id:         row.get(0)?,
    name:       row.get(1)?,
    birth_date: row.get(2)?,
    death_date: row.get(3)?,
  })
}

/// Birth-year filter value, matching the output of `strftime('%Y', ...)`.
pub fn encode_year(year: i32) -> String { format!("{year:04}") }
