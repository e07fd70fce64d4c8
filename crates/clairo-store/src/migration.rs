//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::{Connection, TransactionBehavior};

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    if check_version(schema_version(conn)?)? == CURRENT_VERSION {
        return Ok(());
    }

    // Another process may be migrating the same file. IMMEDIATE serializes
    // us behind it, and the version is read again under the write lock.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = check_version(schema_version(&tx)?)?;

    for version in (current + 1)..=CURRENT_VERSION {
        apply_migration(&tx, version)?;

        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![version, now_millis()],
        )?;
        tracing::info!(version, "applied schema migration");
    }

    tx.commit()?;
    Ok(())
}

fn check_version(current: u32) -> Result<u32> {
    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {current} is newer than supported version {CURRENT_VERSION}"
        )));
    }
    Ok(current)
}

/// The schema version currently recorded in the database (0 if none).
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Proofs: one row per registered media hash, never updated or deleted
        CREATE TABLE proofs (
            media_hash BLOB PRIMARY KEY,      -- 32 bytes, registry key
            metadata_hash BLOB NOT NULL,      -- 32 bytes
            latitude INTEGER NOT NULL,        -- degrees x 1e6
            longitude INTEGER NOT NULL,       -- degrees x 1e6
            timestamp INTEGER NOT NULL,       -- commit time (Unix seconds)
            submitter BLOB NOT NULL,          -- 32 bytes, caller identity handle
            event_seq INTEGER NOT NULL UNIQUE -- audit event that recorded this proof
        );

        CREATE INDEX idx_proofs_submitter ON proofs(submitter, event_seq);

        -- Audit log: append-only, hash-chained
        CREATE TABLE audit_events (
            seq INTEGER PRIMARY KEY,          -- 1-based, contiguous
            event_id BLOB NOT NULL UNIQUE,    -- Blake3 of canonical bytes
            media_hash BLOB NOT NULL UNIQUE REFERENCES proofs(media_hash),
            canonical BLOB NOT NULL,          -- canonical CBOR of the event
            recorded_at INTEGER NOT NULL      -- local wall clock (Unix ms)
        );

        -- Immutability is enforced by the schema as well as by the API
        CREATE TRIGGER proofs_no_update BEFORE UPDATE ON proofs
        BEGIN SELECT RAISE(ABORT, 'proofs are immutable'); END;

        CREATE TRIGGER proofs_no_delete BEFORE DELETE ON proofs
        BEGIN SELECT RAISE(ABORT, 'proofs are immutable'); END;

        CREATE TRIGGER audit_events_no_update BEFORE UPDATE ON audit_events
        BEGIN SELECT RAISE(ABORT, 'audit log is append-only'); END;

        CREATE TRIGGER audit_events_no_delete BEFORE DELETE ON audit_events
        BEGIN SELECT RAISE(ABORT, 'audit log is append-only'); END;
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_fresh_database() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_migrate_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_rejects_newer_schema() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, 0)",
            [CURRENT_VERSION + 1],
        )
        .unwrap();
        assert!(matches!(migrate(&mut conn), Err(StoreError::Migration(_))));
    }

    #[test]
    fn test_proofs_table_rejects_update_and_delete() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO proofs (media_hash, metadata_hash, latitude, longitude, timestamp, submitter, event_seq)
             VALUES (x'01', x'02', 0, 0, 0, x'03', 1)",
            [],
        )
        .unwrap();

        assert!(conn
            .execute("UPDATE proofs SET latitude = 1", [])
            .is_err());
        assert!(conn.execute("DELETE FROM proofs", []).is_err());
    }

    #[test]
    fn test_audit_events_table_is_append_only() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute_batch(
            "INSERT INTO proofs (media_hash, metadata_hash, latitude, longitude, timestamp, submitter, event_seq)
             VALUES (x'01', x'02', 0, 0, 0, x'03', 1);
             INSERT INTO audit_events (seq, event_id, media_hash, canonical, recorded_at)
             VALUES (1, x'04', x'01', x'05', 0);",
        )
        .unwrap();

        assert!(conn
            .execute("UPDATE audit_events SET canonical = x'06'", [])
            .is_err());
        assert!(conn.execute("DELETE FROM audit_events", []).is_err());

        // Appends still work.
        conn.execute_batch(
            "INSERT INTO proofs (media_hash, metadata_hash, latitude, longitude, timestamp, submitter, event_seq)
             VALUES (x'11', x'02', 0, 0, 0, x'03', 2);
             INSERT INTO audit_events (seq, event_id, media_hash, canonical, recorded_at)
             VALUES (2, x'14', x'11', x'05', 0);",
        )
        .unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM audit_events", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_concurrent_migrations_of_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.db");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let mut conn = Connection::open(&path).unwrap();
                    conn.busy_timeout(std::time::Duration::from_secs(10)).unwrap();
                    migrate(&mut conn)
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let conn = Connection::open(&path).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, i64::from(CURRENT_VERSION));
    }
}
