//! Offline cache for the last good sheet snapshot.
//!
//! This module keeps exactly one snapshot:
//! - Overwritten wholesale after every successful fetch
//! - Expired after a fixed time-to-live
//! - Best effort: storage errors are logged and treated as "no cache"

mod layer;
mod snapshot;
mod storage;

pub use layer::CacheStore;
pub use storage::SqliteStorage;
