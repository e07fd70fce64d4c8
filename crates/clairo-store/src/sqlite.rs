//! SQLite implementation of the ProofStore trait.
//!
//! This is the primary storage backend for the Clairo registry. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use clairo_core::{
    canonical_event_bytes, decode_event, AuditEvent, CoreError, Digest, EventId, GeoPoint,
    NewProof, Proof, Submitter,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{next_commit_timestamp, CommitOutcome, ProofStore};

/// How long a writer waits for another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const PROOF_COLUMNS: &str =
    "media_hash, metadata_hash, latitude, longitude, timestamp, submitter";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "opened registry database");
        Self::init(conn)
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut guard = lock(&conn)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| StoreError::Poisoned(format!("mutex poisoned: {}", e)))
}

// Helper to convert a row to Proof
fn row_to_proof(row: &rusqlite::Row<'_>) -> rusqlite::Result<Proof> {
    let media_hash: Vec<u8> = row.get("media_hash")?;
    let metadata_hash: Vec<u8> = row.get("metadata_hash")?;
    let submitter: Vec<u8> = row.get("submitter")?;
    let latitude: i64 = row.get("latitude")?;
    let longitude: i64 = row.get("longitude")?;

    let location = GeoPoint::new(latitude, longitude)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, Box::new(e)))?;

    Ok(Proof {
        media_hash: Digest(blob32(&media_hash, 0)?),
        metadata_hash: Digest(blob32(&metadata_hash, 1)?),
        location,
        timestamp: row.get::<_, i64>("timestamp")? as u64,
        submitter: Submitter(blob32(&submitter, 5)?),
    })
}

fn blob32(bytes: &[u8], column: usize) -> rusqlite::Result<[u8; 32]> {
    bytes
        .try_into()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Blob, Box::new(e)))
}

fn select_proof(conn: &Connection, media_hash: &Digest) -> rusqlite::Result<Option<Proof>> {
    conn.query_row(
        &format!("SELECT {PROOF_COLUMNS} FROM proofs WHERE media_hash = ?1"),
        params![media_hash.0.as_slice()],
        row_to_proof,
    )
    .optional()
}

/// Decode a stored event and check it against its recorded id.
fn load_event(seq: u64, event_id: &[u8], canonical: &[u8]) -> Result<AuditEvent> {
    let event = decode_event(canonical)?;
    if event.seq != seq {
        return Err(StoreError::InvalidData(format!(
            "audit row {seq} holds event with seq {}",
            event.seq
        )));
    }
    let recorded = EventId(blob32(event_id, 1)?);
    let actual = event.compute_id();
    if actual != recorded {
        return Err(CoreError::EventIdMismatch {
            seq,
            expected: recorded.to_hex(),
            actual: actual.to_hex(),
        }
        .into());
    }
    Ok(event)
}

fn commit_in_tx(conn: &mut Connection, proof: &NewProof, now: u64) -> Result<CommitOutcome> {
    // IMMEDIATE takes the write lock up front, so the existence check and the
    // inserts below cannot interleave with another writer.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if let Some(existing) = select_proof(&tx, &proof.media_hash)? {
        return Ok(CommitOutcome::Duplicate { existing });
    }

    let head: Option<(i64, Vec<u8>, i64)> = tx
        .query_row(
            "SELECT e.seq, e.event_id, p.timestamp
             FROM audit_events e JOIN proofs p ON p.media_hash = e.media_hash
             ORDER BY e.seq DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;

    let (seq, prev_event_id, last_timestamp) = match head {
        Some((seq, id, ts)) => (
            seq as u64 + 1,
            Some(EventId(blob32(&id, 1)?)),
            Some(ts as u64),
        ),
        None => (1, None, None),
    };

    let committed = proof.commit_at(next_commit_timestamp(now, last_timestamp));
    let event = AuditEvent {
        seq,
        proof: committed,
        prev_event_id,
    };
    let event_id = event.compute_id();

    tx.execute(
        "INSERT INTO proofs (
            media_hash, metadata_hash, latitude, longitude, timestamp, submitter, event_seq
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            committed.media_hash.0.as_slice(),
            committed.metadata_hash.0.as_slice(),
            committed.latitude(),
            committed.longitude(),
            committed.timestamp as i64,
            committed.submitter.0.as_slice(),
            seq as i64,
        ],
    )?;

    tx.execute(
        "INSERT INTO audit_events (seq, event_id, media_hash, canonical, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            seq as i64,
            event_id.0.as_slice(),
            committed.media_hash.0.as_slice(),
            canonical_event_bytes(&event),
            migration::now_millis(),
        ],
    )?;

    tx.commit()?;
    Ok(CommitOutcome::Committed(event))
}

#[async_trait]
impl ProofStore for SqliteStore {
    async fn commit_proof(&self, proof: &NewProof, now: u64) -> Result<CommitOutcome> {
        let proof = *proof;
        self.with_conn(move |conn| commit_in_tx(conn, &proof, now))
            .await
    }

    async fn get_proof(&self, media_hash: &Digest) -> Result<Option<Proof>> {
        let media_hash = *media_hash;
        self.with_conn(move |conn| Ok(select_proof(conn, &media_hash)?))
            .await
    }

    async fn has_proof(&self, media_hash: &Digest) -> Result<bool> {
        let media_hash = *media_hash;
        self.with_conn(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM proofs WHERE media_hash = ?1",
                    params![media_hash.0.as_slice()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }

    async fn proofs_by_submitter(&self, submitter: &Submitter) -> Result<Vec<Proof>> {
        let submitter = *submitter;
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROOF_COLUMNS} FROM proofs WHERE submitter = ?1 ORDER BY event_seq"
            ))?;

            let proofs = stmt
                .query_map(params![submitter.0.as_slice()], row_to_proof)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(proofs)
        })
        .await
    }

    async fn proof_count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM proofs", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn events_since(&self, after_seq: u64, limit: usize) -> Result<Vec<AuditEvent>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT seq, event_id, canonical FROM audit_events
                 WHERE seq > ?1 ORDER BY seq LIMIT ?2",
            )?;

            let rows = stmt
                .query_map(
                    params![
                        i64::try_from(after_seq).unwrap_or(i64::MAX),
                        i64::try_from(limit).unwrap_or(i64::MAX),
                    ],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, Vec<u8>>(1)?,
                            row.get::<_, Vec<u8>>(2)?,
                        ))
                    },
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            rows.iter()
                .map(|(seq, id, canonical)| load_event(*seq as u64, id, canonical))
                .collect()
        })
        .await
    }

    async fn event_head(&self) -> Result<Option<(u64, EventId)>> {
        self.with_conn(|conn| {
            let head: Option<(i64, Vec<u8>)> = conn
                .query_row(
                    "SELECT seq, event_id FROM audit_events ORDER BY seq DESC LIMIT 1",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            match head {
                Some((seq, id)) => Ok(Some((seq as u64, EventId(blob32(&id, 1)?)))),
                None => Ok(None),
            }
        })
        .await
    }
}
