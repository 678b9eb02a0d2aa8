//! Async HTTP client for the Open Library search endpoint.

use std::time::Duration;

use anyhow::Context as _;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shelf_core::source::{BookSource, CatalogRecord, SearchField};
use thiserror::Error;
use tracing::debug;

/// Why a search produced no records.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("search endpoint returned {0}")]
  Status(StatusCode),

  #[error("malformed search response: {0}")]
  Decode(#[from] serde_json::Error),
}

/// Connection settings for the search endpoint.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

// ─── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
  docs: Vec<SearchDoc>,
}

/// One entry of `docs`. Every field is optional on the wire.
#[derive(Debug, Deserialize)]
struct SearchDoc {
  title:              Option<String>,
  author_name:        Option<Vec<String>>,
  language:           Option<Vec<String>>,
  first_publish_year: Option<i64>,
}

impl From<SearchDoc> for CatalogRecord {
  fn from(doc: SearchDoc) -> Self {
    CatalogRecord::from_parts(
      doc.title,
      doc.author_name,
      doc.language,
      doc.first_publish_year,
    )
  }
}

/// Decode a raw response body into records, one per doc, in order.
pub fn decode_search_response(body: &[u8]) -> Result<Vec<CatalogRecord>, FetchError> {
  let response: SearchResponse = serde_json::from_slice(body)?;
  Ok(response.docs.into_iter().map(CatalogRecord::from).collect())
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// [`BookSource`] backed by the Open Library `search.json` API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenLibraryClient {
  client: Client,
  config: ClientConfig,
}

impl OpenLibraryClient {
  pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }
}

impl BookSource for OpenLibraryClient {
  type Error = FetchError;

  /// `GET <base_url>?q=<field>=<term>`
  async fn search<'a>(
    &'a self,
    field: SearchField,
    term: &'a str,
  ) -> Result<Vec<CatalogRecord>, FetchError> {
    let query = format!("{}={}", field.as_param(), term);
    let resp = self
      .client
      .get(&self.config.base_url)
      .query(&[("q", query.as_str())])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(FetchError::Status(resp.status()));
    }

    let body = resp.bytes().await?;
    let records = decode_search_response(&body)?;
    debug!(%field, term, count = records.len(), "search complete");
    Ok(records)
  }
}
