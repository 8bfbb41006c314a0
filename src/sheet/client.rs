use crate::config::SourceConfig;
use crate::sheet::parse::parse_records;
use crate::sheet::types::Record;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Why a refresh could not get fresh sheet data
#[derive(Error, Debug)]
pub enum SheetError {
  #[error("Sheet request failed with status {0}")]
  Status(StatusCode),

  #[error("Network error: {0}")]
  Network(#[from] reqwest::Error),
}

/// HTTP client for the published sheet
#[derive(Clone)]
pub struct SheetClient {
  http: reqwest::Client,
  url: Url,
}

impl SheetClient {
  pub fn new(source: &SourceConfig) -> Result<Self, SheetError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("text/csv, text/plain;q=0.9, */*;q=0.5"));
    // Always go to the origin; a stale proxy copy defeats the refresh loop
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(source.timeout_secs))
      .user_agent(concat!("sheetboard/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(Self {
      http,
      url: source.url.clone(),
    })
  }

  pub fn url(&self) -> &Url {
    &self.url
  }

  /// Download the raw CSV text
  pub async fn fetch_text(&self) -> Result<String, SheetError> {
    let response = self.http.get(self.url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(SheetError::Status(status));
    }

    Ok(response.text().await?)
  }

  /// Download and parse the sheet into records
  pub async fn fetch_records(&self) -> Result<Vec<Record>, SheetError> {
    let text = self.fetch_text().await?;
    let records = parse_records(&text);
    debug!(bytes = text.len(), records = records.len(), "Parsed sheet");
    Ok(records)
  }
}
