//! SQLite-backed record store over the `kv_records` table.
//!
//! # Invariants
//! - Construction requires a fully migrated connection.
//! - Each `write_batch` runs in one `IMMEDIATE` transaction.

use super::{RecordStore, StoreError, StoreKey, StoreResult, StoreWrite};
use crate::db::migrations::latest_version;
use crate::db::schema_version;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

const KV_TABLE: &str = "kv_records";

/// Record store bound to one migrated SQLite connection.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Creates a store from a connection returned by `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn read(&self, key: StoreKey) -> StoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM kv_records WHERE record_key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_batch(&self, writes: &[StoreWrite]) -> StoreResult<()> {
        let result = apply_writes(self.conn, writes);
        let keys = writes
            .iter()
            .map(|write| write.key().as_str())
            .collect::<Vec<_>>()
            .join(",");
        match &result {
            Ok(()) => debug!("event=store_write module=store status=ok backend=sqlite keys={keys}"),
            Err(err) => error!(
                "event=store_write module=store status=error backend=sqlite keys={keys} error={err}"
            ),
        }
        result
    }
}

fn apply_writes(conn: &Connection, writes: &[StoreWrite]) -> StoreResult<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    for write in writes {
        match write {
            StoreWrite::Put { key, payload } => {
                tx.execute(
                    "INSERT INTO kv_records (record_key, payload)
                     VALUES (?1, ?2)
                     ON CONFLICT(record_key) DO UPDATE SET
                        payload = excluded.payload,
                        updated_at = (strftime('%s', 'now') * 1000);",
                    params![key.as_str(), payload],
                )?;
            }
            StoreWrite::Remove(key) => {
                tx.execute(
                    "DELETE FROM kv_records WHERE record_key = ?1;",
                    [key.as_str()],
                )?;
            }
        }
    }
    tx.commit()?;
    Ok(())
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(StoreError::MissingRequiredTable(KV_TABLE));
    }

    Ok(())
}
