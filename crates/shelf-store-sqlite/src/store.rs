//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use rusqlite::types::Value;
use tracing::debug;

use shelf_core::{
  author::Author,
  book::{Book, CatalogStats, NewBook},
  store::CatalogStore,
};

use crate::{
  encode::{author_from_row, book_from_row, encode_year, AUTHOR_COLUMNS, BOOK_COLUMNS},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A shelf catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.initialize().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.initialize().await?;
    Ok(store)
  }

  /// Run a book SELECT built from [`BOOK_COLUMNS`] with positional params.
  async fn select_books(&self, sql: String, params: Vec<Value>) -> Result<Vec<Book>> {
    let books = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), book_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(books)
  }

  /// Run an author SELECT built from [`AUTHOR_COLUMNS`] with positional params.
  async fn select_authors(&self, sql: String, params: Vec<Value>) -> Result<Vec<Author>> {
    let authors = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), author_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(authors)
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  async fn initialize(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_book(&self, book: NewBook) -> Result<Book> {
    book.validate()?;

    let NewBook { title, author, language, year } = book;
    let (title_c, author_c, language_c) = (title.clone(), author.clone(), language.clone());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO books (title, author, language, year) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![title_c, author_c, language_c, year],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(id, %title, "inserted book");
    Ok(Book {
      id,
      title,
      author,
      language: Some(language),
      year: Some(year),
      search_count: 0,
    })
  }

  async fn upsert_author<'a>(&'a self, name: &'a str) -> Result<bool> {
    let name = name.to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO authors (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
          rusqlite::params![name],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_books(&self) -> Result<Vec<Book>> {
    self
      .select_books(format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"), vec![])
      .await
  }

  async fn list_authors(&self) -> Result<Vec<Author>> {
    self
      .select_authors(format!("SELECT {AUTHOR_COLUMNS} FROM authors ORDER BY id"), vec![])
      .await
  }

  async fn list_living_authors(&self) -> Result<Vec<Author>> {
    self
      .select_authors(
        format!("SELECT {AUTHOR_COLUMNS} FROM authors WHERE death_date IS NULL ORDER BY id"),
        vec![],
      )
      .await
  }

  async fn list_books_by_language<'a>(&'a self, language: &'a str) -> Result<Vec<Book>> {
    self
      .select_books(
        format!("SELECT {BOOK_COLUMNS} FROM books WHERE language = ?1 ORDER BY id"),
        vec![Value::Text(language.to_owned())],
      )
      .await
  }

  async fn list_authors_by_birth_year(&self, year: i32) -> Result<Vec<Author>> {
    self
      .select_authors(
        format!(
          "SELECT {AUTHOR_COLUMNS} FROM authors
           WHERE strftime('%Y', birth_date) = ?1
           ORDER BY id"
        ),
        vec![Value::Text(encode_year(year))],
      )
      .await
  }

  async fn top_books(&self, limit: usize) -> Result<Vec<Book>> {
    let limit = i64::try_from(limit).map_err(|e| Error::OutOfRange(e.to_string()))?;
    self
      .select_books(
        format!(
          "SELECT {BOOK_COLUMNS} FROM books
           ORDER BY search_count DESC, id ASC
           LIMIT ?1"
        ),
        vec![Value::Integer(limit)],
      )
      .await
  }

  async fn stats(&self) -> Result<CatalogStats> {
    let stats = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*), COUNT(DISTINCT author) FROM books",
          [],
          |row| {
            Ok(CatalogStats {
              total_books:   row.get(0)?,
              total_authors: row.get(1)?,
            })
          },
        )?)
      })
      .await?;
    Ok(stats)
  }
}

#[cfg(test)]
impl SqliteStore {
  /// Run arbitrary SQL; lets tests seed columns ingest never writes.
  pub(crate) async fn execute_batch(&self, sql: &str) -> Result<()> {
    let sql = sql.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
