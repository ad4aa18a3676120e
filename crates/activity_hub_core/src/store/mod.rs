//! Key-value record store holding one JSON array per collection key.
//!
//! # Responsibility
//! - Define the backend contract (`RecordStore`) shared by SQLite and memory stores.
//! - Provide typed load/save helpers and atomic multi-key write batches.
//!
//! # Invariants
//! - Query loads fail closed: absent, `null`, unreadable or unparsable
//!   payloads read as an empty collection.
//! - Strict loads (`try_load_records`) surface read and parse failures, so a
//!   load-then-save never replaces data it could not see.
//! - A committed `WriteBatch` is applied entirely or not at all.
//! - Write failures are always surfaced to the caller.

use crate::db::DbError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod dataset;
mod memory_store;
mod sqlite_store;

pub use dataset::Dataset;
pub use memory_store::MemoryRecordStore;
pub use sqlite_store::SqliteRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Fixed keys of the persisted layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreKey {
    Activities,
    Users,
    Registrations,
    /// Single user record of the logged-in session.
    CurrentUser,
}

impl StoreKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activities => "activities",
            Self::Users => "users",
            Self::Registrations => "registrations",
            Self::CurrentUser => "currentUser",
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage failure surfaced on writes (and on reads, before fail-closed handling).
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Records could not be encoded as JSON.
    Serialize(serde_json::Error),
    /// Stored payload under `key` is not a valid collection.
    Corrupted {
        key: StoreKey,
        source: serde_json::Error,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Non-SQLite backend refused the operation.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to encode records: {err}"),
            Self::Corrupted { key, source } => {
                write!(f, "stored `{key}` payload is unreadable: {source}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "record store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "record store requires table `{table}`")
            }
            Self::Backend(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Corrupted { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// One mutation inside a write batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    /// Replaces the payload stored under `key`.
    Put { key: StoreKey, payload: String },
    /// Deletes `key`; absent keys are ignored.
    Remove(StoreKey),
}

impl StoreWrite {
    pub fn key(&self) -> StoreKey {
        match self {
            Self::Put { key, .. } => *key,
            Self::Remove(key) => *key,
        }
    }
}

/// Backend contract for raw key-value payloads.
pub trait RecordStore {
    /// Reads the raw payload under `key`, `None` when absent.
    fn read(&self, key: StoreKey) -> StoreResult<Option<String>>;
    /// Applies every write atomically.
    fn write_batch(&self, writes: &[StoreWrite]) -> StoreResult<()>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn read(&self, key: StoreKey) -> StoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write_batch(&self, writes: &[StoreWrite]) -> StoreResult<()> {
        (**self).write_batch(writes)
    }
}

/// Ordered set of writes committed as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<StoreWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a full replacement of one collection.
    pub fn put_records<T: Serialize>(mut self, key: StoreKey, records: &[T]) -> StoreResult<Self> {
        let payload = serde_json::to_string(records)?;
        self.writes.push(StoreWrite::Put { key, payload });
        Ok(self)
    }

    /// Queues a single-record value such as the session user.
    pub fn put_record<T: Serialize>(mut self, key: StoreKey, record: &T) -> StoreResult<Self> {
        let payload = serde_json::to_string(record)?;
        self.writes.push(StoreWrite::Put { key, payload });
        Ok(self)
    }

    pub fn remove(mut self, key: StoreKey) -> Self {
        self.writes.push(StoreWrite::Remove(key));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Commits all queued writes. An empty batch is a no-op.
    pub fn commit<S: RecordStore + ?Sized>(self, store: &S) -> StoreResult<()> {
        if self.writes.is_empty() {
            return Ok(());
        }
        store.write_batch(&self.writes)
    }
}

/// Loads one collection, failing closed to an empty list.
pub fn load_records<T, S>(store: &S, key: StoreKey) -> Vec<T>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    try_load_records(store, key).unwrap_or_else(|err| {
        warn!("event=store_load module=store status=fail_closed key={key} error={err}");
        Vec::new()
    })
}

/// Loads one collection for a load-then-save command.
///
/// Absent and `null` payloads read as empty.
///
/// # Errors
/// - Backend read failure.
/// - `Corrupted` when the payload is not a JSON array of `T`.
pub fn try_load_records<T, S>(store: &S, key: StoreKey) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let Some(payload) = store.read(key)? else {
        return Ok(Vec::new());
    };
    serde_json::from_str::<Option<Vec<T>>>(&payload)
        .map(Option::unwrap_or_default)
        .map_err(|source| StoreError::Corrupted { key, source })
}

/// Loads a single-record value, failing closed to `None`.
pub fn load_record<T, S>(store: &S, key: StoreKey) -> Option<T>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let payload = read_fail_closed(store, key)?;
    match serde_json::from_str::<Option<T>>(&payload) {
        Ok(record) => record,
        Err(err) => {
            warn!("event=store_load module=store status=fail_closed key={key} reason=parse error={err}");
            None
        }
    }
}

/// Replaces one collection in its own batch.
pub fn save_records<T, S>(store: &S, key: StoreKey, records: &[T]) -> StoreResult<()>
where
    T: Serialize,
    S: RecordStore + ?Sized,
{
    WriteBatch::new().put_records(key, records)?.commit(store)
}

/// Returns whether `key` currently holds a payload.
pub fn contains_key<S: RecordStore + ?Sized>(store: &S, key: StoreKey) -> StoreResult<bool> {
    Ok(store.read(key)?.is_some())
}

fn read_fail_closed<S: RecordStore + ?Sized>(store: &S, key: StoreKey) -> Option<String> {
    match store.read(key) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("event=store_load module=store status=fail_closed key={key} reason=read error={err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        load_records, save_records, try_load_records, MemoryRecordStore, StoreError, StoreKey,
        StoreWrite, WriteBatch,
    };
    use crate::model::registration::Registration;
    use crate::store::RecordStore;

    #[test]
    fn store_keys_use_the_dashboard_names() {
        assert_eq!(StoreKey::Activities.to_string(), "activities");
        assert_eq!(StoreKey::CurrentUser.to_string(), "currentUser");
    }

    #[test]
    fn empty_batch_commit_is_noop() {
        let store = MemoryRecordStore::new();
        WriteBatch::new().commit(&store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_load_preserves_insertion_order() {
        let store = MemoryRecordStore::new();
        let records = vec![
            Registration::new("s2", "a2"),
            Registration::new("s1", "a1"),
        ];
        save_records(&store, StoreKey::Registrations, &records).unwrap();

        let loaded: Vec<Registration> = load_records(&store, StoreKey::Registrations);
        assert_eq!(loaded, records);
    }

    #[test]
    fn strict_load_surfaces_corrupted_payload_that_query_load_hides() {
        let store = MemoryRecordStore::new();
        store
            .write_batch(&[StoreWrite::Put {
                key: StoreKey::Registrations,
                payload: "{not json".to_string(),
            }])
            .unwrap();

        let hidden: Vec<Registration> = load_records(&store, StoreKey::Registrations);
        assert!(hidden.is_empty());
        let err = try_load_records::<Registration, _>(&store, StoreKey::Registrations).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Corrupted {
                key: StoreKey::Registrations,
                ..
            }
        ));
    }

    #[test]
    fn strict_load_reads_absent_and_null_as_empty() {
        let store = MemoryRecordStore::new();
        let absent: Vec<Registration> = try_load_records(&store, StoreKey::Registrations).unwrap();
        assert!(absent.is_empty());

        store
            .write_batch(&[StoreWrite::Put {
                key: StoreKey::Registrations,
                payload: "null".to_string(),
            }])
            .unwrap();
        let null: Vec<Registration> = try_load_records(&store, StoreKey::Registrations).unwrap();
        assert!(null.is_empty());
    }
}
