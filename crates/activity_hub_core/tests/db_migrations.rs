use activity_hub_core::db::migrations::latest_version;
use activity_hub_core::db::{open_db, open_db_in_memory, schema_version, DbError};
use activity_hub_core::store::{load_records, save_records};
use activity_hub_core::{Registration, RecordStore, SqliteRecordStore, StoreError, StoreKey};
use rusqlite::Connection;

/// `(name, declared type, not null, primary key position)` per column.
fn kv_columns(conn: &Connection) -> Vec<(String, String, bool, i64)> {
    let mut stmt = conn.prepare("PRAGMA table_info(kv_records);").unwrap();
    stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>("name")?,
            row.get::<_, String>("type")?,
            row.get::<_, i64>("notnull")? == 1,
            row.get::<_, i64>("pk")?,
        ))
    })
    .unwrap()
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
}

#[test]
fn migration_one_creates_keyed_payload_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(
        kv_columns(&conn),
        vec![
            ("record_key".to_string(), "TEXT".to_string(), true, 1),
            ("payload".to_string(), "TEXT".to_string(), true, 0),
            ("updated_at".to_string(), "INTEGER".to_string(), true, 0),
        ]
    );
}

#[test]
fn upsert_keeps_one_row_per_key_and_stamps_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    save_records(&store, StoreKey::Registrations, &[Registration::new("s1", "a1")]).unwrap();
    save_records(&store, StoreKey::Registrations, &[Registration::new("s2", "a2")]).unwrap();

    let (rows, updated_at): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), MAX(updated_at) FROM kv_records WHERE record_key = 'registrations';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(rows, 1);
    assert!(updated_at > 0);
}

#[test]
fn record_store_accepts_file_right_after_open_db() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("activity_hub.db");

    let raw = Connection::open(&path).unwrap();
    let err = SqliteRecordStore::try_new(&raw).err().unwrap();
    assert!(matches!(
        err,
        StoreError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
    drop(raw);

    let conn = open_db(&path).unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    save_records(&store, StoreKey::Registrations, &[Registration::new("s1", "a1")]).unwrap();
    drop(store);
    drop(conn);

    let reopened = open_db(&path).unwrap();
    let store = SqliteRecordStore::try_new(&reopened).unwrap();
    let registrations: Vec<Registration> = load_records(&store, StoreKey::Registrations);
    assert_eq!(registrations, vec![Registration::new("s1", "a1")]);
    assert!(store.read(StoreKey::Users).unwrap().is_none());
}

#[test]
fn file_from_newer_build_is_refused_and_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 999;")
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew {
            found: 999,
            supported,
        } if supported == latest_version()
    ));

    let raw = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&raw).unwrap(), 999);
    assert!(kv_columns(&raw).is_empty());
}
