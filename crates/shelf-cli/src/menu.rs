//! Interactive numbered menu.
//!
//! Reads one selection per line, prompts for any follow-on argument, and
//! prints result rows as tab-separated text with no header. Errors inside a
//! single iteration are printed as `Error: ...` and the menu is shown again.

use std::io::{ErrorKind, Write};

use anyhow::{Context as _, bail};
use shelf_core::{
  author::Author,
  book::Book,
  ingest::ingest,
  source::{BookSource, SearchField},
  store::{CatalogStore, TOP_BOOKS_LIMIT},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

// ─── Options ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
  SearchByTitle,
  SearchByAuthor,
  ListBooks,
  ListAuthors,
  ListLivingAuthors,
  BooksByLanguage,
  AuthorsByBirthYear,
  TopBooks,
  Statistics,
  Exit,
}

impl MenuOption {
  pub const ALL: [MenuOption; 10] = [
    MenuOption::SearchByTitle,
    MenuOption::SearchByAuthor,
    MenuOption::ListBooks,
    MenuOption::ListAuthors,
    MenuOption::ListLivingAuthors,
    MenuOption::BooksByLanguage,
    MenuOption::AuthorsByBirthYear,
    MenuOption::TopBooks,
    MenuOption::Statistics,
    MenuOption::Exit,
  ];

  pub fn number(self) -> i64 {
    Self::ALL
      .iter()
      .position(|o| *o == self)
      .map_or(0, |i| i as i64 + 1)
  }

  pub fn from_number(n: i64) -> Option<Self> {
    let index = usize::try_from(n.checked_sub(1)?).ok()?;
    Self::ALL.get(index).copied()
  }

  pub fn label(self) -> &'static str {
    match self {
      MenuOption::SearchByTitle => "Search books by title",
      MenuOption::SearchByAuthor => "Search authors by name",
      MenuOption::ListBooks => "List registered books",
      MenuOption::ListAuthors => "List registered authors",
      MenuOption::ListLivingAuthors => "List living authors",
      MenuOption::BooksByLanguage => "List books by language",
      MenuOption::AuthorsByBirthYear => "List authors by birth year",
      MenuOption::TopBooks => "Show the 10 most searched books",
      MenuOption::Statistics => "Show statistics",
      MenuOption::Exit => "Exit",
    }
  }
}

enum Flow {
  Continue,
  Exit,
}

// ─── Menu ─────────────────────────────────────────────────────────────────────

/// The menu loop over a store and a remote catalog, both borrowed for the
/// lifetime of the session.
pub struct Menu<'a, S, B> {
  store:  &'a S,
  source: &'a B,
}

impl<'a, S, B> Menu<'a, S, B>
where
  S: CatalogStore,
  B: BookSource,
{
  pub fn new(store: &'a S, source: &'a B) -> Self { Self { store, source } }

  /// Run until the exit option is chosen or `input` is exhausted.
  ///
  /// Only failures to write to `out`, or to read from `input` for reasons
  /// other than malformed text, end the loop early.
  pub async fn run<R, W>(&self, input: &mut R, out: &mut W) -> std::io::Result<()>
  where
    R: AsyncBufRead + Unpin,
    W: Write,
  {
    loop {
      print_menu(out)?;

      let line = match read_line(input).await {
        Ok(Some(line)) => line,
        Ok(None) => {
          info!("input closed, leaving menu");
          break;
        }
        // The offending line has already been consumed.
        Err(e) if e.kind() == ErrorKind::InvalidData => {
          writeln!(out, "Error: {e}")?;
          continue;
        }
        Err(e) => return Err(e),
      };

      match self.step(&line, input, out).await {
        Ok(Flow::Continue) => {}
        Ok(Flow::Exit) => {
          writeln!(out, "Exiting...")?;
          break;
        }
        Err(e) => writeln!(out, "Error: {e:#}")?,
      }
    }
    out.flush()
  }

  /// Handle one selection line, including any follow-on prompt.
  async fn step<R, W>(&self, line: &str, input: &mut R, out: &mut W) -> anyhow::Result<Flow>
  where
    R: AsyncBufRead + Unpin,
    W: Write,
  {
    let choice: i64 = line
      .trim()
      .parse()
      .with_context(|| format!("invalid selection {:?}", line.trim()))?;

    let Some(option) = MenuOption::from_number(choice) else {
      writeln!(out, "Invalid option.")?;
      return Ok(Flow::Continue);
    };

    match option {
      MenuOption::SearchByTitle => {
        let term = prompt(input, out, "Enter the book title: ").await?;
        self.fetch(SearchField::Title, &term, out).await?;
      }
      MenuOption::SearchByAuthor => {
        let term = prompt(input, out, "Enter the author name: ").await?;
        self.fetch(SearchField::Author, &term, out).await?;
      }
      MenuOption::ListBooks => print_books(out, &self.store.list_books().await?)?,
      MenuOption::ListAuthors => print_authors(out, &self.store.list_authors().await?)?,
      MenuOption::ListLivingAuthors => {
        print_authors(out, &self.store.list_living_authors().await?)?
      }
      MenuOption::BooksByLanguage => {
        let language = prompt(input, out, "Enter the language code: ").await?;
        print_books(out, &self.store.list_books_by_language(&language).await?)?;
      }
      MenuOption::AuthorsByBirthYear => {
        let raw = prompt(input, out, "Enter the year: ").await?;
        let year: i32 = raw
          .trim()
          .parse()
          .with_context(|| format!("invalid year {:?}", raw.trim()))?;
        print_authors(out, &self.store.list_authors_by_birth_year(year).await?)?;
      }
      MenuOption::TopBooks => {
        for book in self.store.top_books(TOP_BOOKS_LIMIT).await? {
          writeln!(
            out,
            "{}\t{}\t{}\t{}",
            book.id, book.title, book.author, book.search_count
          )?;
        }
      }
      MenuOption::Statistics => {
        let stats = self.store.stats().await?;
        writeln!(out, "Total books: {}", stats.total_books)?;
        writeln!(out, "Total authors: {}", stats.total_authors)?;
      }
      MenuOption::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
  }

  /// Search the remote catalog and write every result to the store.
  async fn fetch<W: Write>(&self, field: SearchField, term: &str, out: &mut W) -> anyhow::Result<()> {
    let records = self
      .source
      .search(field, term)
      .await
      .with_context(|| format!("search by {field} failed"))?;

    let report = ingest(self.store, &records).await;
    info!(
      %field,
      term,
      results = records.len(),
      saved = report.books_inserted,
      "fetched catalog results"
    );

    writeln!(
      out,
      "Saved {} of {} result(s); {} new author(s).",
      report.books_inserted,
      records.len(),
      report.authors_inserted
    )?;
    for failure in &report.failures {
      writeln!(out, "Skipped {}: {}", failure.title, failure.message)?;
    }
    Ok(())
  }
}

// ─── I/O helpers ──────────────────────────────────────────────────────────────

fn print_menu<W: Write>(out: &mut W) -> std::io::Result<()> {
  writeln!(out, "\nMenu:")?;
  for option in MenuOption::ALL {
    writeln!(out, "{}. {}", option.number(), option.label())?;
  }
  write!(out, "Choose an option: ")?;
  out.flush()
}

fn print_books<W: Write>(out: &mut W, books: &[Book]) -> std::io::Result<()> {
  for book in books {
    writeln!(out, "{}\t{}\t{}", book.id, book.title, book.author)?;
  }
  Ok(())
}

fn print_authors<W: Write>(out: &mut W, authors: &[Author]) -> std::io::Result<()> {
  for author in authors {
    writeln!(out, "{}\t{}", author.id, author.name)?;
  }
  Ok(())
}

/// Read one line without its terminator; `None` at end of input.
async fn read_line<R>(input: &mut R) -> std::io::Result<Option<String>>
where
  R: AsyncBufRead + Unpin,
{
  let mut line = String::new();
  if input.read_line(&mut line).await? == 0 {
    return Ok(None);
  }
  let trimmed = line.trim_end_matches(['\n', '\r']).len();
  line.truncate(trimmed);
  Ok(Some(line))
}

async fn prompt<R, W>(input: &mut R, out: &mut W, message: &str) -> anyhow::Result<String>
where
  R: AsyncBufRead + Unpin,
  W: Write,
{
  write!(out, "{message}")?;
  out.flush()?;
  match read_line(input).await? {
    Some(line) => Ok(line),
    None => bail!("unexpected end of input"),
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use shelf_core::source::CatalogRecord;
  use shelf_store_sqlite::SqliteStore;

  use super::*;

  /// Canned catalog that records every search it receives.
  #[derive(Default)]
  struct StubSource {
    records:  Vec<CatalogRecord>,
    fail:     bool,
    searches: Mutex<Vec<(SearchField, String)>>,
  }

  impl BookSource for StubSource {
    type Error = std::io::Error;

    async fn search<'a>(
      &'a self,
      field: SearchField,
      term: &'a str,
    ) -> Result<Vec<CatalogRecord>, std::io::Error> {
      self
        .searches
        .lock()
        .unwrap()
        .push((field, term.to_owned()));
      if self.fail {
        return Err(std::io::Error::other("connection reset"));
      }
      Ok(self.records.clone())
    }
  }

  fn dune() -> CatalogRecord {
    CatalogRecord::from_parts(
      Some("Dune".into()),
      Some(vec!["Frank Herbert".into()]),
      Some(vec!["eng".into()]),
      Some(1965),
    )
  }

  async fn run(store: &SqliteStore, source: &StubSource, script: &str) -> String {
    run_bytes(store, source, script.as_bytes()).await
  }

  async fn run_bytes(store: &SqliteStore, source: &StubSource, mut input: &[u8]) -> String {
    let mut out = Vec::new();
    Menu::new(store, source)
      .run(&mut input, &mut out)
      .await
      .unwrap();
    String::from_utf8(out).unwrap()
  }

  async fn store() -> SqliteStore { SqliteStore::open_in_memory().await.unwrap() }

  #[test]
  fn option_numbers_round_trip() {
    for (i, option) in MenuOption::ALL.into_iter().enumerate() {
      assert_eq!(option.number(), i as i64 + 1);
      assert_eq!(MenuOption::from_number(option.number()), Some(option));
    }
    assert_eq!(MenuOption::from_number(0), None);
    assert_eq!(MenuOption::from_number(11), None);
    assert_eq!(MenuOption::from_number(-1), None);
  }

  #[tokio::test]
  async fn exit_option_ends_loop() {
    let s = store().await;
    let out = run(&s, &StubSource::default(), "10\n3\n").await;

    assert!(out.contains("1. Search books by title"));
    assert!(out.contains("10. Exit"));
    assert!(out.ends_with("Exiting...\n"));
    assert_eq!(out.matches("Menu:").count(), 1);
  }

  #[tokio::test]
  async fn out_of_range_option_redisplays_menu() {
    let s = store().await;
    let out = run(&s, &StubSource::default(), "99\n10\n").await;

    assert!(out.contains("Invalid option."));
    assert_eq!(out.matches("Menu:").count(), 2);
    assert!(s.list_books().await.unwrap().is_empty());
    assert!(s.list_authors().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn non_numeric_selection_is_reported() {
    let s = store().await;
    let out = run(&s, &StubSource::default(), "abc\n10\n").await;

    assert!(out.contains("Error: invalid selection \"abc\""));
    assert!(out.ends_with("Exiting...\n"));
  }

  #[tokio::test]
  async fn invalid_utf8_selection_is_reported() {
    let s = store().await;
    let out = run_bytes(&s, &StubSource::default(), b"\xff\xfe\n9\n10\n").await;

    assert!(out.contains("Error: stream did not contain valid UTF-8"));
    assert_eq!(out.matches("Menu:").count(), 3);
    assert!(out.contains("Total books: 0\nTotal authors: 0\n"));
    assert!(out.ends_with("Exiting...\n"));
  }

  #[tokio::test]
  async fn end_of_input_leaves_quietly() {
    let s = store().await;
    let out = run(&s, &StubSource::default(), "3\n").await;

    assert_eq!(out.matches("Menu:").count(), 2);
    assert!(!out.contains("Error"));
  }

  #[tokio::test]
  async fn title_search_ingests_and_lists() {
    let s = store().await;
    let source = StubSource {
      records: vec![dune()],
      ..Default::default()
    };
    let out = run(&s, &source, "1\nDune\n3\n4\n10\n").await;

    assert_eq!(
      source.searches.lock().unwrap().as_slice(),
      [(SearchField::Title, "Dune".to_owned())]
    );
    assert!(out.contains("Saved 1 of 1 result(s); 1 new author(s)."));
    assert!(out.contains("1\tDune\tFrank Herbert\n"));
    assert!(out.contains("1\tFrank Herbert\n"));
  }

  #[tokio::test]
  async fn author_search_uses_author_field() {
    let s = store().await;
    let source = StubSource {
      records: vec![dune(), dune()],
      ..Default::default()
    };
    let out = run(&s, &source, "2\nFrank Herbert\n9\n10\n").await;

    assert_eq!(
      source.searches.lock().unwrap().as_slice(),
      [(SearchField::Author, "Frank Herbert".to_owned())]
    );
    assert!(out.contains("Saved 2 of 2 result(s); 1 new author(s)."));
    assert!(out.contains("Total books: 2\nTotal authors: 1\n"));
  }

  #[tokio::test]
  async fn failed_fetch_returns_to_menu() {
    let s = store().await;
    let source = StubSource {
      fail: true,
      ..Default::default()
    };
    let out = run(&s, &source, "1\nDune\n10\n").await;

    assert!(out.contains("Error: search by title failed: connection reset"));
    assert!(out.ends_with("Exiting...\n"));
    assert!(s.list_books().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn skipped_records_are_listed() {
    let s = store().await;
    let source = StubSource {
      records: vec![CatalogRecord::from_parts(None, None, None, None), dune()],
      ..Default::default()
    };
    let out = run(&s, &source, "1\nDune\n10\n").await;

    assert!(out.contains("Saved 1 of 2 result(s); 1 new author(s)."));
    assert!(out.contains("Skipped <untitled>: missing required field: title"));
  }

  #[tokio::test]
  async fn books_by_language_prompts_for_code() {
    let s = store().await;
    let vendredi = CatalogRecord::from_parts(
      Some("Vendredi".into()),
      Some(vec!["Michel Tournier".into()]),
      Some(vec!["fre".into()]),
      Some(1967),
    );
    ingest(&s, &[dune(), vendredi]).await;

    let out = run(&s, &StubSource::default(), "6\nfre\n10\n").await;

    assert!(out.contains("Enter the language code: "));
    assert!(out.contains("2\tVendredi\tMichel Tournier\n"));
    assert!(!out.contains("Dune"));
  }

  #[tokio::test]
  async fn bad_year_is_reported() {
    let s = store().await;
    let out = run(&s, &StubSource::default(), "7\nnineteen\n10\n").await;

    assert!(out.contains("Error: invalid year \"nineteen\""));
    assert!(out.ends_with("Exiting...\n"));
  }

  #[tokio::test]
  async fn top_books_include_search_count() {
    let s = store().await;
    ingest(&s, &[dune()]).await;

    let out = run(&s, &StubSource::default(), "8\n5\n10\n").await;

    assert!(out.contains("1\tDune\tFrank Herbert\t0\n"));
    // Living authors: nobody has a death date.
    assert!(out.contains("1\tFrank Herbert\n"));
  }
}
