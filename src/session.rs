//! Refresh-cycle state: what is on the board, where it came from and when.
//!
//! `Session` holds everything the refresh loop and the status ticker mutate.
//! It performs no I/O besides the cache, so each cycle can be driven directly
//! from tests with a fixed clock.

use chrono::{DateTime, Duration, Local, Utc};
use std::fmt;
use tracing::{info, warn};

use crate::board::Board;
use crate::cache::CacheStore;
use crate::sheet::{Record, SheetError};

/// Text shown in the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
  /// Before the first cycle finished
  Loading,
  /// Fresh data was rendered at this time
  Updated(DateTime<Utc>),
  /// Cached data captured at this time is shown
  Offline(DateTime<Utc>),
  /// No fresh and no cached data
  Failed,
  /// Time since the last render, set by the status ticker
  UpdatedAgo(Duration),
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Status::Loading => write!(f, "Loading…"),
      Status::Updated(at) => write!(f, "Updated {}", format_timestamp(*at)),
      Status::Offline(at) => write!(f, "Offline — last update {}", format_timestamp(*at)),
      Status::Failed => write!(f, "Failed to load data"),
      Status::UpdatedAgo(elapsed) => write!(f, "Updated {}", relative_time(*elapsed)),
    }
  }
}

/// How a refresh cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
  /// Fresh sheet data rendered and cached
  Fresh,
  /// Fetch failed, cached snapshot rendered
  Offline,
  /// Fetch failed and no usable cache; board left as it was
  Failed,
}

pub struct Session {
  cache: CacheStore,
  board: Board,
  status: Status,
  offline: bool,
  last_update: DateTime<Utc>,
}

impl Session {
  pub fn new(cache: CacheStore, started_at: DateTime<Utc>) -> Self {
    Self {
      cache,
      board: Board::default(),
      status: Status::Loading,
      offline: false,
      last_update: started_at,
    }
  }

  /// Apply the result of one fetch, as of now.
  pub fn apply_fetch(&mut self, result: Result<Vec<Record>, SheetError>) -> CycleOutcome {
    self.apply_fetch_at(result, Utc::now())
  }

  /// Apply the result of one fetch as of `now`.
  ///
  /// Success renders, caches and clears the offline badge. Failure falls back
  /// to the cached snapshot when there is one.
  pub fn apply_fetch_at(
    &mut self,
    result: Result<Vec<Record>, SheetError>,
    now: DateTime<Utc>,
  ) -> CycleOutcome {
    match result {
      Ok(records) => {
        self.board = Board::present(&records);
        self.last_update = now;
        self.status = Status::Updated(now);
        self.cache.save_at(&records, now);
        self.offline = false;
        info!(
          records = records.len(),
          cards = self.board.card_count(),
          "Rendered fresh sheet data"
        );
        CycleOutcome::Fresh
      }
      Err(e) => {
        warn!(error = %e, "Sheet fetch failed, trying cache");
        match self.cache.load_at(now) {
          Some(snapshot) => {
            self.board = Board::present(&snapshot.records);
            self.last_update = snapshot.captured_at;
            self.status = Status::Offline(snapshot.captured_at);
            self.offline = true;
            info!(captured_at = %snapshot.captured_at, "Rendered cached snapshot");
            CycleOutcome::Offline
          }
          None => {
            self.status = Status::Failed;
            CycleOutcome::Failed
          }
        }
      }
    }
  }

  /// Status ticker: show how long ago the board was last rendered.
  pub fn tick_status(&mut self) {
    self.tick_status_at(Utc::now());
  }

  pub fn tick_status_at(&mut self, now: DateTime<Utc>) {
    self.status = Status::UpdatedAgo(now - self.last_update);
  }

  pub fn board(&self) -> &Board {
    &self.board
  }

  pub fn status(&self) -> &Status {
    &self.status
  }

  pub fn is_offline(&self) -> bool {
    self.offline
  }
}

/// Absolute timestamp in the local time zone
pub fn format_timestamp(at: DateTime<Utc>) -> String {
  at.with_timezone(&Local)
    .format("%Y-%m-%d %H:%M:%S")
    .to_string()
}

/// "Ns ago" under a minute, "Nm ago" under an hour, else "Nh ago"
pub fn relative_time(elapsed: Duration) -> String {
  let secs = elapsed.num_seconds().max(0);
  if secs < 60 {
    return format!("{}s ago", secs);
  }
  let mins = secs / 60;
  if mins < 60 {
    return format!("{}m ago", mins);
  }
  format!("{}h ago", mins / 60)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::SqliteStorage;
  use crate::sheet::parse::parse_records;
  use reqwest::StatusCode;

  const SHEET: &str = "Category,Item,Price,In Stock\nDrinks,Cola,2.00,true\nDrinks,OldSoda,1.50,false";

  fn session(now: DateTime<Utc>) -> Session {
    let cache = CacheStore::new(SqliteStorage::open_in_memory().unwrap());
    Session::new(cache, now)
  }

  fn failure() -> Result<Vec<Record>, SheetError> {
    Err(SheetError::Status(StatusCode::SERVICE_UNAVAILABLE))
  }

  #[test]
  fn test_fresh_cycle() {
    let start = Utc::now();
    let mut session = session(start);
    let now = start + Duration::seconds(3);

    let outcome = session.apply_fetch_at(Ok(parse_records(SHEET)), now);

    assert_eq!(outcome, CycleOutcome::Fresh);
    assert_eq!(session.board().card_count(), 1);
    assert_eq!(session.status(), &Status::Updated(now));
    assert_eq!(session.last_update, now);
    assert!(!session.is_offline());
  }

  #[test]
  fn test_failure_falls_back_to_cache() {
    let start = Utc::now();
    let mut session = session(start);
    session.apply_fetch_at(Ok(parse_records(SHEET)), start);
    let cached_board = session.board().clone();
    let captured = session.cache.load_at(start).unwrap().captured_at;

    let later = start + Duration::minutes(5);
    let outcome = session.apply_fetch_at(failure(), later);

    assert_eq!(outcome, CycleOutcome::Offline);
    assert!(session.is_offline());
    assert_eq!(session.board(), &cached_board);
    assert_eq!(session.status(), &Status::Offline(captured));
    assert_eq!(session.last_update, captured);
  }

  #[test]
  fn test_failure_without_cache_keeps_board() {
    let start = Utc::now();
    let mut session = session(start);

    assert_eq!(session.apply_fetch_at(failure(), start), CycleOutcome::Failed);
    assert_eq!(session.status(), &Status::Failed);
    assert!(session.board().is_empty());
    assert!(!session.is_offline());
  }

  #[test]
  fn test_failure_with_expired_cache() {
    let start = Utc::now();
    let mut session = session(start);
    session.apply_fetch_at(Ok(parse_records(SHEET)), start);

    let much_later = start + Duration::hours(7);
    assert_eq!(session.apply_fetch_at(failure(), much_later), CycleOutcome::Failed);
    assert_eq!(session.status(), &Status::Failed);
    // The last rendered board stays up
    assert_eq!(session.board().card_count(), 1);
  }

  #[test]
  fn test_recovery_clears_offline() {
    let start = Utc::now();
    let mut session = session(start);
    session.apply_fetch_at(Ok(parse_records(SHEET)), start);
    session.apply_fetch_at(failure(), start + Duration::seconds(60));
    assert!(session.is_offline());

    session.apply_fetch_at(Ok(parse_records(SHEET)), start + Duration::seconds(120));
    assert!(!session.is_offline());
  }

  #[test]
  fn test_status_tick_does_not_touch_board() {
    let start = Utc::now();
    let mut session = session(start);
    session.apply_fetch_at(Ok(parse_records(SHEET)), start);
    let board = session.board().clone();

    session.tick_status_at(start + Duration::seconds(75));

    assert_eq!(session.status().to_string(), "Updated 1m ago");
    assert_eq!(session.board(), &board);
  }

  #[test]
  fn test_relative_time_phrases() {
    assert_eq!(relative_time(Duration::zero()), "0s ago");
    assert_eq!(relative_time(Duration::seconds(59)), "59s ago");
    assert_eq!(relative_time(Duration::seconds(60)), "1m ago");
    assert_eq!(relative_time(Duration::minutes(59) + Duration::seconds(59)), "59m ago");
    assert_eq!(relative_time(Duration::hours(3) + Duration::minutes(59)), "3h ago");
    assert_eq!(relative_time(Duration::seconds(-5)), "0s ago");
  }

  #[test]
  fn test_status_text() {
    let at = Utc::now();
    assert_eq!(Status::Failed.to_string(), "Failed to load data");
    assert_eq!(
      Status::Offline(at).to_string(),
      format!("Offline — last update {}", format_timestamp(at))
    );
    assert_eq!(
      Status::Updated(at).to_string(),
      format!("Updated {}", format_timestamp(at))
    );
  }
}
