//! In-memory implementation of the store trait.
//!
//! Primarily for testing. Same semantics as the SQLite store, no
//! persistence. Thread-safe via RwLock.

use std::sync::RwLock;

use async_trait::async_trait;
use vault_ledger_core::{ChainEntry, Digest, LedgerRecord, NewRecord};

use crate::error::{Result, StoreError};
use crate::traits::LedgerStore;

/// In-memory store: an ordered vector of records behind a lock.
pub struct MemoryStore {
    records: RwLock<Vec<LedgerRecord>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-seeded with records, bypassing the tip check.
    ///
    /// Only useful for constructing pathological ledgers (broken chains,
    /// tampered rows) in tests; `append` never produces such a state.
    pub fn with_records(records: Vec<LedgerRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_poisoned() -> StoreError {
    StoreError::Blocking("memory store lock poisoned".to_string())
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn append(&self, record: NewRecord) -> Result<LedgerRecord> {
        let mut records = self.records.write().map_err(|_| lock_poisoned())?;

        let current_tip = records
            .last()
            .map(|r| r.file_hash)
            .unwrap_or(Digest::ZERO);
        if record.prev_hash != current_tip {
            return Err(StoreError::TipMismatch {
                declared: record.prev_hash.to_hex(),
                current: current_tip.to_hex(),
            });
        }

        let sequence_id = records.last().map(|r| r.sequence_id + 1).unwrap_or(1);
        let persisted = record.into_record(sequence_id);
        records.push(persisted.clone());
        Ok(persisted)
    }

    async fn list_records(&self) -> Result<Vec<LedgerRecord>> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.clone())
    }

    async fn tip(&self) -> Result<Digest> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.last().map(|r| r.file_hash).unwrap_or(Digest::ZERO))
    }

    async fn find_by_file_hash(&self, file_hash: &Digest) -> Result<Option<LedgerRecord>> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.iter().find(|r| r.file_hash == *file_hash).cloned())
    }

    async fn file_hashes(&self) -> Result<Vec<Digest>> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.iter().map(|r| r.file_hash).collect())
    }

    async fn chain_entries(&self) -> Result<Vec<ChainEntry>> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.iter().map(|r| r.chain_entry()).collect())
    }

    async fn len(&self) -> Result<u64> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.len() as u64)
    }
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
    async fn test_append_assigns_increasing_ids() {
        let store = MemoryStore::new();

        let r1 = store.append(new_record("a", Digest::ZERO)).await.unwrap();
        assert_eq!(r1.sequence_id, 1);

        let r2 = store.append(new_record("b", r1.file_hash)).await.unwrap();
        assert_eq!(r2.sequence_id, 2);

        let all = store.list_records().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].sequence_id, 1);
        assert_eq!(all[1].sequence_id, 2);
    }

    #[tokio::test]
    async fn test_tip_tracks_last_file_hash() {
        let store = MemoryStore::new();
        assert_eq!(store.tip().await.unwrap(), Digest::ZERO);

        let r1 = store.append(new_record("a", Digest::ZERO)).await.unwrap();
        assert_eq!(store.tip().await.unwrap(), r1.file_hash);
    }

    #[tokio::test]
    async fn test_append_rejects_stale_tip() {
        let store = MemoryStore::new();
        store.append(new_record("a", Digest::ZERO)).await.unwrap();

        // Second append still claims the genesis tip.
        let err = store.append(new_record("b", Digest::ZERO)).await.unwrap_err();
        assert!(matches!(err, StoreError::TipMismatch { .. }));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_file_hash() {
        let store = MemoryStore::new();
        let r1 = store.append(new_record("a", Digest::ZERO)).await.unwrap();

        let found = store.find_by_file_hash(&r1.file_hash).await.unwrap();
        assert_eq!(found.unwrap().file_name, "a");

        let missing = store.find_by_file_hash(&Digest::hash(b"zzz")).await.unwrap();
        assert!(missing.is_none());
    }
}
