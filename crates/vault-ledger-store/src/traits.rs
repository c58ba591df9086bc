//! Store trait: the abstract interface for ledger persistence.
//!
//! The engine consumes an ordered view of the ledger and proposes new
//! rows; this trait is that boundary. Implementations include SQLite
//! (primary) and in-memory (for tests).

use async_trait::async_trait;
use vault_ledger_core::{ChainEntry, Digest, LedgerRecord, NewRecord};

use crate::error::Result;

/// The store trait: async interface for ledger persistence.
///
/// All methods are async so the SQLite backend can hop to a blocking
/// thread without stalling the runtime.
///
/// # Design Notes
///
/// - **Ordering**: `list_records`, `file_hashes`, and `chain_entries`
///   return rows by `sequence_id` ascending, which equals insertion
///   order.
/// - **Append is guarded**: `append` re-checks that the record's declared
///   predecessor equals the current tip inside its own transaction, so a
///   bypassed admission lock surfaces as `TipMismatch` rather than a
///   silently forked chain.
/// - **Decode tolerance**: `chain_entries` never fails on a corrupt
///   digest column; it degrades that field to `None` for the validator
///   to flag.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append a proposed record, assigning the next sequence id.
    ///
    /// Atomic and serialized with respect to `tip` reads: the tip check
    /// and the insert happen in one transaction.
    async fn append(&self, record: NewRecord) -> Result<LedgerRecord>;

    /// All records, ordered by sequence id ascending.
    async fn list_records(&self) -> Result<Vec<LedgerRecord>>;

    /// The current chain tip: the last record's `file_hash`, or
    /// [`Digest::ZERO`] when the ledger is empty.
    async fn tip(&self) -> Result<Digest>;

    /// Look up a record by its registered file hash.
    async fn find_by_file_hash(&self, file_hash: &Digest) -> Result<Option<LedgerRecord>>;

    /// The ordered Merkle leaf view: every record's `file_hash`.
    async fn file_hashes(&self) -> Result<Vec<Digest>>;

    /// The decode-tolerant audit view of the ledger.
    async fn chain_entries(&self) -> Result<Vec<ChainEntry>>;

    /// Number of records in the ledger.
    async fn len(&self) -> Result<u64>;
}
