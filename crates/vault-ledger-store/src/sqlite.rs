//! SQLite implementation of the store trait.
//!
//! The primary storage backend. Uses rusqlite with bundled SQLite,
//! wrapped in async via `tokio::task::spawn_blocking`; the connection is
//! protected by a mutex so every operation sees a consistent database.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use vault_ledger_core::{ChainEntry, Digest, LedgerRecord, NewRecord, SignerKey};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::LedgerStore;

/// SQLite-based store implementation.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path, creating the file and
    /// running migrations as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database. Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on a blocking thread.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| StoreError::Blocking(format!("connection mutex poisoned: {e}")))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Blocking(format!("join error: {e}")))?
    }
}

/// A row read back verbatim, hex columns undecoded.
struct RawRow {
    sequence_id: i64,
    file_name: String,
    file_hash: String,
    prev_hash: String,
    timestamp: String,
    signer_key: String,
    merkle_root: String,
}

const SELECT_COLUMNS: &str =
    "sequence_id, file_name, file_hash, prev_hash, timestamp, signer_key, merkle_root";

fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        sequence_id: row.get(0)?,
        file_name: row.get(1)?,
        file_hash: row.get(2)?,
        prev_hash: row.get(3)?,
        timestamp: row.get(4)?,
        signer_key: row.get(5)?,
        merkle_root: row.get(6)?,
    })
}

/// Strict decode: any malformed column is a storage error.
fn decode_record(raw: RawRow) -> Result<LedgerRecord> {
    let seq = raw.sequence_id;
    let bad = |col: &str| StoreError::InvalidData(format!("record {seq}: malformed {col}"));

    Ok(LedgerRecord {
        sequence_id: raw.sequence_id as u64,
        file_name: raw.file_name,
        file_hash: Digest::from_hex(&raw.file_hash).map_err(|_| bad("file_hash"))?,
        prev_hash: Digest::from_hex(&raw.prev_hash).map_err(|_| bad("prev_hash"))?,
        timestamp: raw.timestamp,
        signer_key: SignerKey::from_hex(&raw.signer_key).map_err(|_| bad("signer_key"))?,
        merkle_root: Digest::from_hex(&raw.merkle_root).map_err(|_| bad("merkle_root"))?,
    })
}

/// Tolerant decode for the audit view: a malformed digest column becomes
/// `None` so the chain validator can flag the row instead of the scan
/// aborting.
fn decode_entry(raw: &RawRow) -> ChainEntry {
    ChainEntry {
        sequence_id: raw.sequence_id as u64,
        file_hash: Digest::from_hex(&raw.file_hash).ok(),
        prev_hash: Digest::from_hex(&raw.prev_hash).ok(),
    }
}

/// Read the tip inside an open connection/transaction.
fn read_tip(conn: &Connection) -> Result<Digest> {
    let last: Option<String> = conn
        .query_row(
            "SELECT file_hash FROM records ORDER BY sequence_id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match last {
        Some(hex) => Digest::from_hex(&hex)
            .map_err(|_| StoreError::InvalidData("tip record has malformed file_hash".to_string())),
        None => Ok(Digest::ZERO),
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn append(&self, record: NewRecord) -> Result<LedgerRecord> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            // Tip re-check inside the transaction: the backstop against
            // interleaved admissions.
            let current_tip = read_tip(&tx)?;
            if record.prev_hash != current_tip {
                return Err(StoreError::TipMismatch {
                    declared: record.prev_hash.to_hex(),
                    current: current_tip.to_hex(),
                });
            }

            tx.execute(
                "INSERT INTO records (
                    file_name, file_hash, prev_hash, timestamp, signer_key,
                    merkle_root, appended_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.file_name,
                    record.file_hash.to_hex(),
                    record.prev_hash.to_hex(),
                    record.timestamp,
                    record.signer_key.to_hex(),
                    record.merkle_root.to_hex(),
                    now_millis(),
                ],
            )?;

            let sequence_id = tx.last_insert_rowid() as u64;
            tx.commit()?;

            tracing::debug!(sequence_id, "record appended");
            Ok(record.into_record(sequence_id))
        })
        .await
    }

    async fn list_records(&self) -> Result<Vec<LedgerRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM records ORDER BY sequence_id ASC"
            ))?;
            let raws = stmt
                .query_map([], read_raw)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            raws.into_iter().map(decode_record).collect()
        })
        .await
    }

    async fn tip(&self) -> Result<Digest> {
        self.with_conn(|conn| read_tip(conn)).await
    }

    async fn find_by_file_hash(&self, file_hash: &Digest) -> Result<Option<LedgerRecord>> {
        let hex = file_hash.to_hex();
        self.with_conn(move |conn| {
            let raw = conn
                .query_row(
                    &format!(
                        "SELECT {SELECT_COLUMNS} FROM records
                         WHERE file_hash = ?1 ORDER BY sequence_id ASC LIMIT 1"
                    ),
                    params![hex],
                    read_raw,
                )
                .optional()?;

            raw.map(decode_record).transpose()
        })
        .await
    }

    async fn file_hashes(&self) -> Result<Vec<Digest>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT file_hash FROM records ORDER BY sequence_id ASC")?;
            let hexes = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            hexes
                .iter()
                .map(|h| {
                    Digest::from_hex(h).map_err(|_| {
                        StoreError::InvalidData(format!("malformed file_hash in leaf view: {h:?}"))
                    })
                })
                .collect()
        })
        .await
    }

    async fn chain_entries(&self) -> Result<Vec<ChainEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM records ORDER BY sequence_id ASC"
            ))?;
            let raws = stmt
                .query_map([], read_raw)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(raws.iter().map(decode_entry).collect())
        })
        .await
    }

    async fn len(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_ledger_core::Keypair;

    fn new_record(name: &str, prev: Digest) -> NewRecord {
        let file_hash = Digest::hash(name.as_bytes());
        NewRecord {
            file_name: name.to_string(),
            file_hash,
            prev_hash: prev,
            timestamp: "2026-08-07T10:00:00+00:00".to_string(),
            signer_key: Keypair::from_seed(&[0x11; 32]).public_key(),
            merkle_root: file_hash,
        }
    }

    #[tokio::test]
    async fn test_append_and_list() {
        let store = SqliteStore::open_memory().unwrap();

        let r1 = store.append(new_record("a", Digest::ZERO)).await.unwrap();
        assert_eq!(r1.sequence_id, 1);
        let r2 = store.append(new_record("b", r1.file_hash)).await.unwrap();
        assert_eq!(r2.sequence_id, 2);

        let all = store.list_records().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], r1);
        assert_eq!(all[1], r2);
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_tip_progression() {
        let store = SqliteStore::open_memory().unwrap();
        assert_eq!(store.tip().await.unwrap(), Digest::ZERO);

        let r1 = store.append(new_record("a", Digest::ZERO)).await.unwrap();
        assert_eq!(store.tip().await.unwrap(), r1.file_hash);

        let r2 = store.append(new_record("b", r1.file_hash)).await.unwrap();
        assert_eq!(store.tip().await.unwrap(), r2.file_hash);
    }

    #[tokio::test]
    async fn test_append_rejects_stale_tip() {
        let store = SqliteStore::open_memory().unwrap();
        store.append(new_record("a", Digest::ZERO)).await.unwrap();

        let err = store.append(new_record("b", Digest::ZERO)).await.unwrap_err();
        assert!(matches!(err, StoreError::TipMismatch { .. }));
        // The failed append must not have inserted anything.
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_file_hash() {
        let store = SqliteStore::open_memory().unwrap();
        let r1 = store.append(new_record("a", Digest::ZERO)).await.unwrap();

        let found = store.find_by_file_hash(&r1.file_hash).await.unwrap();
        assert_eq!(found.unwrap(), r1);

        assert!(store
            .find_by_file_hash(&Digest::hash(b"absent"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_file_hashes_ordered() {
        let store = SqliteStore::open_memory().unwrap();
        let r1 = store.append(new_record("a", Digest::ZERO)).await.unwrap();
        let r2 = store.append(new_record("b", r1.file_hash)).await.unwrap();

        let leaves = store.file_hashes().await.unwrap();
        assert_eq!(leaves, vec![r1.file_hash, r2.file_hash]);
    }

    #[tokio::test]
    async fn test_chain_entries_tolerate_corrupt_rows() {
        let store = SqliteStore::open_memory().unwrap();
        let r1 = store.append(new_record("a", Digest::ZERO)).await.unwrap();
        store.append(new_record("b", r1.file_hash)).await.unwrap();

        // Corrupt record 2's prev_hash behind the store's back.
        store
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE records SET prev_hash = 'garbage' WHERE sequence_id = 2",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let entries = store.chain_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].prev_hash.is_some());
        assert!(entries[1].prev_hash.is_none());

        // The strict views refuse the corruption instead of guessing.
        assert!(matches!(
            store.list_records().await,
            Err(StoreError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        let r1 = {
            let store = SqliteStore::open(&path).unwrap();
            store.append(new_record("a", Digest::ZERO)).await.unwrap()
        };

        let reopened = SqliteStore::open(&path).unwrap();
        let all = reopened.list_records().await.unwrap();
        assert_eq!(all, vec![r1]);
    }
}
