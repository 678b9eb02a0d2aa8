//! Author rows.

/// A persisted author.
///
/// Names are unique across the store. Birth and death dates are never filled
/// in by ingest; a `None` death date counts as living.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
  pub id:         i64,
  pub name:       String,
  pub birth_date: Option<String>,
  pub death_date: Option<String>,
}
