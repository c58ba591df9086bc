//! Ledger records: the immutable rows of the integrity ledger.
//!
//! A record is created exactly once at admission and never mutated after
//! persistence. Ordering is by `sequence_id` ascending, which equals
//! insertion order. The chain invariant: every record's `prev_hash`
//! equals the preceding record's `file_hash`; the first record points at
//! [`Digest::ZERO`].

use serde::{Deserialize, Serialize};

use crate::crypto::SignerKey;
use crate::digest::Digest;

/// A persisted ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Store-assigned, monotonically increasing.
    pub sequence_id: u64,

    /// The registered file's display name.
    pub file_name: String,

    /// Content digest of the registered file.
    pub file_hash: Digest,

    /// The chain tip at admission time ([`Digest::ZERO`] for the first record).
    pub prev_hash: Digest,

    /// RFC 3339 timestamp issued at the prepare step, stored verbatim
    /// because the signing contract is byte-exact.
    pub timestamp: String,

    /// Public key the registration envelope verified against.
    pub signer_key: SignerKey,

    /// Merkle root over all registered file hashes including this one.
    pub merkle_root: Digest,
}

impl LedgerRecord {
    /// The outbound projection returned to callers.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            sequence_id: self.sequence_id,
            file_name: self.file_name.clone(),
            file_hash: self.file_hash,
            prev_hash: self.prev_hash,
            timestamp: self.timestamp.clone(),
        }
    }

    /// Decode-tolerant view for chain validation.
    pub fn chain_entry(&self) -> ChainEntry {
        ChainEntry {
            sequence_id: self.sequence_id,
            file_hash: Some(self.file_hash),
            prev_hash: Some(self.prev_hash),
        }
    }
}

/// A record as proposed by the engine, before the store assigns its
/// sequence id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub file_name: String,
    pub file_hash: Digest,
    pub prev_hash: Digest,
    pub timestamp: String,
    pub signer_key: SignerKey,
    pub merkle_root: Digest,
}

impl NewRecord {
    /// Attach a store-assigned sequence id.
    pub fn into_record(self, sequence_id: u64) -> LedgerRecord {
        LedgerRecord {
            sequence_id,
            file_name: self.file_name,
            file_hash: self.file_hash,
            prev_hash: self.prev_hash,
            timestamp: self.timestamp,
            signer_key: self.signer_key,
            merkle_root: self.merkle_root,
        }
    }
}

/// Outbound record shape: what admission and audit responses carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub sequence_id: u64,
    pub file_name: String,
    pub file_hash: Digest,
    pub prev_hash: Digest,
    pub timestamp: String,
}

/// The minimal view the chain validator scans.
///
/// A `None` digest marks a row whose stored column was missing or could
/// not be decoded; the validator flags such entries instead of aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainEntry {
    pub sequence_id: u64,
    pub file_hash: Option<Digest>,
    pub prev_hash: Option<Digest>,
}
