//! In-memory record store for tests and ephemeral sessions.

use super::{RecordStore, StoreKey, StoreResult, StoreWrite};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Single-threaded map-backed store.
///
/// Batches are applied to a copy of the map and swapped in, so a batch is
/// never observed half-applied.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    entries: RefCell<BTreeMap<StoreKey, String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns the keys that currently hold a payload.
    pub fn keys(&self) -> Vec<StoreKey> {
        self.entries.borrow().keys().copied().collect()
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, key: StoreKey) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(&key).cloned())
    }

    fn write_batch(&self, writes: &[StoreWrite]) -> StoreResult<()> {
        let mut next = self.entries.borrow().clone();
        for write in writes {
            match write {
                StoreWrite::Put { key, payload } => {
                    next.insert(*key, payload.clone());
                }
                StoreWrite::Remove(key) => {
                    next.remove(key);
                }
            }
        }
        *self.entries.borrow_mut() = next;
        Ok(())
    }
}
