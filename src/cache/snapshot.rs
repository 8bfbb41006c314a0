use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::sheet::Record;

/// The last record set fetched from the sheet, with its capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
  /// Stored as epoch milliseconds
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub captured_at: DateTime<Utc>,
  pub records: Vec<Record>,
}

impl CachedSnapshot {
  pub fn new(records: Vec<Record>, captured_at: DateTime<Utc>) -> Self {
    Self {
      // Match the precision the snapshot survives serialization with
      captured_at: captured_at.trunc_subsecs(3),
      records,
    }
  }

  /// How long ago the snapshot was taken
  pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
    now - self.captured_at
  }

  /// Whether the snapshot is older than `ttl`
  pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
    self.age(now) > ttl
  }
}
