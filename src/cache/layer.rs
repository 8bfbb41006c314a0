//! Best-effort snapshot cache on top of a storage backend.

use chrono::{DateTime, Duration, Utc};
use color_eyre::Result;
use tracing::{debug, warn};

use super::snapshot::CachedSnapshot;
use super::storage::{NoopStorage, SnapshotStorage};
use crate::sheet::Record;

/// Storage key of the single cached snapshot
const SNAPSHOT_KEY: &str = "last_data";

/// Keeps the last good record set for offline fallback.
///
/// Neither `save` nor `load` ever fails: storage and serialization errors
/// are logged and the cache behaves as if it were empty.
pub struct CacheStore {
  storage: Box<dyn SnapshotStorage>,
  /// How long a snapshot stays usable
  ttl: Duration,
}

impl CacheStore {
  /// Create a cache store with the given storage backend.
  pub fn new(storage: impl SnapshotStorage + 'static) -> Self {
    Self {
      storage: Box::new(storage),
      ttl: Duration::hours(6),
    }
  }

  /// A cache store that never remembers anything.
  pub fn disabled() -> Self {
    Self::new(NoopStorage)
  }

  /// Set the time-to-live for cached snapshots.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  /// Persist `records` as the current snapshot, captured now.
  #[allow(dead_code)]
  pub fn save(&self, records: &[Record]) {
    self.save_at(records, Utc::now());
  }

  /// Persist `records` as the current snapshot, captured at `now`.
  pub fn save_at(&self, records: &[Record], now: DateTime<Utc>) {
    let snapshot = CachedSnapshot::new(records.to_vec(), now);
    match self.try_save(&snapshot) {
      Ok(()) => debug!(records = records.len(), "Saved snapshot"),
      Err(e) => warn!(error = %e, "Failed to save snapshot, continuing without cache"),
    }
  }

  /// Fetch the current snapshot if one exists and has not expired.
  #[allow(dead_code)]
  pub fn load(&self) -> Option<CachedSnapshot> {
    self.load_at(Utc::now())
  }

  /// Fetch the snapshot as seen at `now`.
  pub fn load_at(&self, now: DateTime<Utc>) -> Option<CachedSnapshot> {
    let snapshot = match self.try_load() {
      Ok(Some(snapshot)) => snapshot,
      Ok(None) => return None,
      Err(e) => {
        warn!(error = %e, "Failed to read snapshot, treating cache as empty");
        return None;
      }
    };

    if snapshot.is_expired(now, self.ttl) {
      debug!(captured_at = %snapshot.captured_at, "Cached snapshot expired");
      return None;
    }

    Some(snapshot)
  }

  fn try_save(&self, snapshot: &CachedSnapshot) -> Result<()> {
    let data = serde_json::to_vec(snapshot)?;
    self.storage.put(SNAPSHOT_KEY, &data)
  }

  fn try_load(&self) -> Result<Option<CachedSnapshot>> {
    match self.storage.get(SNAPSHOT_KEY)? {
      Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
      None => Ok(None),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::SqliteStorage;
  use color_eyre::eyre::eyre;

  fn records() -> Vec<Record> {
    vec![
      [("Category", "Drinks"), ("Item", "Cola"), ("Price", "2.00")]
        .into_iter()
        .collect(),
      [("Category", "Snacks"), ("Item", "Chips"), ("Price", "1.25")]
        .into_iter()
        .collect(),
    ]
  }

  fn sqlite_store() -> CacheStore {
    CacheStore::new(SqliteStorage::open_in_memory().unwrap())
  }

  /// Storage whose reads return whatever bytes it was built with
  struct FixedStorage(Vec<u8>);

  impl SnapshotStorage for FixedStorage {
    fn put(&self, _key: &str, _data: &[u8]) -> Result<()> {
      Ok(())
    }

    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
      Ok(Some(self.0.clone()))
    }
  }

  /// Storage that fails every operation
  struct BrokenStorage;

  impl SnapshotStorage for BrokenStorage {
    fn put(&self, _key: &str, _data: &[u8]) -> Result<()> {
      Err(eyre!("disk full"))
    }

    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
      Err(eyre!("disk gone"))
    }
  }

  #[test]
  fn test_save_then_load_round_trip() {
    let store = sqlite_store();
    let before = Utc::now();
    store.save(&records());
    let snapshot = store.load().unwrap();
    let after = Utc::now();

    assert_eq!(snapshot.records, records());
    assert!(snapshot.captured_at >= before - Duration::milliseconds(1));
    assert!(snapshot.captured_at <= after);
  }

  #[test]
  fn test_load_empty_cache() {
    assert!(sqlite_store().load().is_none());
  }

  #[test]
  fn test_save_replaces_previous_snapshot() {
    let store = sqlite_store();
    store.save(&records());
    store.save(&records()[..1]);

    assert_eq!(store.load().unwrap().records.len(), 1);
  }

  #[test]
  fn test_expired_snapshot_is_absent() {
    let store = sqlite_store();
    let now = Utc::now();
    store.save_at(&records(), now - store.ttl - Duration::milliseconds(1));

    assert!(store.load_at(now).is_none());
  }

  #[test]
  fn test_snapshot_at_ttl_is_present() {
    let store = sqlite_store().with_ttl(Duration::minutes(10));
    let captured = Utc::now();
    store.save_at(&records(), captured);
    let snapshot = store.load().unwrap();

    assert!(store.load_at(snapshot.captured_at + Duration::minutes(10)).is_some());
  }

  #[test]
  fn test_corrupt_snapshot_is_absent() {
    let store = CacheStore::new(FixedStorage(b"{not json".to_vec()));
    assert!(store.load().is_none());
  }

  #[test]
  fn test_storage_errors_are_swallowed() {
    let store = CacheStore::new(BrokenStorage);
    store.save(&records());
    assert!(store.load().is_none());
  }

  #[test]
  fn test_disabled_cache() {
    let store = CacheStore::disabled();
    store.save(&records());
    assert!(store.load().is_none());
  }
}
